use serde::Deserialize;
use std::io::Read;

use super::CatalogError;

#[derive(Debug)]
pub(crate) struct EmbassyRow {
    pub(crate) line: u64,
    pub(crate) country: String,
    pub(crate) major_consulates: Vec<String>,
    pub(crate) booking_url: String,
    pub(crate) processing_time: String,
}

#[derive(Debug, Deserialize)]
struct RawEmbassyRow {
    country_code: String,
    #[serde(default)]
    major_consulates: String,
    #[serde(default)]
    booking_url: String,
    #[serde(default)]
    processing_time: String,
}

/// Parse `country_code,major_consulates,booking_url,processing_time` rows.
/// Consulate cities are `;`-separated.
pub(crate) fn parse_embassy_rows<R: Read>(reader: R) -> Result<Vec<EmbassyRow>, CatalogError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();

    for record in csv_reader.deserialize::<RawEmbassyRow>() {
        let raw = record?;
        let line = rows.len() as u64 + 2;

        if raw.country_code.is_empty() {
            return Err(CatalogError::InvalidEmbassyRow {
                line,
                reason: "missing country_code".to_string(),
            });
        }
        if raw.processing_time.is_empty() {
            return Err(CatalogError::InvalidEmbassyRow {
                line,
                reason: "missing processing_time".to_string(),
            });
        }

        let major_consulates = raw
            .major_consulates
            .split(';')
            .map(str::trim)
            .filter(|city| !city.is_empty())
            .map(str::to_string)
            .collect();

        rows.push(EmbassyRow {
            line,
            country: raw.country_code,
            major_consulates,
            booking_url: raw.booking_url,
            processing_time: raw.processing_time,
        });
    }

    Ok(rows)
}
