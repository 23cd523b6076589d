//! Versioned country and visa rule tables.
//!
//! The catalog is built once, validated, and shared read-only by the evaluator, the
//! itinerary aggregator, and the consulate recommender. The built-in table is
//! available through [`RuleCatalog::standard`]; replacement tables use the same JSON
//! schema and can be loaded with [`RuleCatalog::from_path`].

mod embassy_import;
mod standard;

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{Country, CountryCode, EmbassyInfo, TravelPurpose, VisaType};

pub use standard::standard_catalog_data;

/// Raw, serializable rule table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogData {
    pub version: String,
    pub effective_date: NaiveDate,
    pub countries: Vec<Country>,
    pub schengen_exempt: BTreeSet<CountryCode>,
    #[serde(default)]
    pub embassies: Vec<EmbassyInfo>,
    #[serde(default)]
    pub destination_rules: Vec<DestinationRule>,
    #[serde(default)]
    pub strong_passports: BTreeSet<CountryCode>,
    #[serde(default)]
    pub common_visa_free_destinations: BTreeSet<CountryCode>,
    #[serde(default)]
    pub transit_risk: TransitRiskLists,
    pub schengen: SchengenTables,
}

/// Processing times and document checklists for Schengen applications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchengenTables {
    pub short_stay_max_days: u16,
    pub short_stay_processing_time: String,
    pub long_stay_processing_time: String,
    pub default_consulate_processing_time: String,
    pub short_stay_documents: Vec<String>,
    pub long_stay_documents: Vec<String>,
    pub transit_documents: Vec<String>,
    #[serde(default)]
    pub national_visa_categories: BTreeMap<TravelPurpose, Vec<String>>,
}

/// Nationalities flagged for transit-visa advisories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitRiskLists {
    /// Nationalities needing a Schengen airport transit visa (Type A).
    #[serde(default)]
    pub schengen_airport_transit: BTreeSet<CountryCode>,
    /// Nationalities likely to need a visa to connect through the USA or Canada.
    #[serde(default)]
    pub north_america: BTreeSet<CountryCode>,
}

/// Country-specific rule applied ahead of the generic fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationRule {
    pub destination: CountryCode,
    #[serde(default)]
    pub exempt_nationalities: BTreeSet<CountryCode>,
    pub exempt_visa_type: VisaType,
    pub exempt_max_stay_days: u16,
    #[serde(default)]
    pub exempt_note: Option<String>,
    pub visitor_visa_type: VisaType,
    pub visitor_processing_time: String,
    #[serde(default)]
    pub visitor_documents: Vec<String>,
    #[serde(default)]
    pub transit: Option<TransitRule>,
    pub long_stay_visa_type: VisaType,
    pub long_stay_processing_time: String,
    #[serde(default)]
    pub long_stay_categories: Vec<String>,
    #[serde(default)]
    pub free_movement: Option<FreeMovementBloc>,
}

/// Transit handling for a destination-specific rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitRule {
    pub visa_type: VisaType,
    /// `None` means every non-exempt nationality needs the transit visa.
    #[serde(default)]
    pub required_nationalities: Option<BTreeSet<CountryCode>>,
}

/// Regional bloc whose members move freely into the destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeMovementBloc {
    pub bloc: String,
    pub visa_type: VisaType,
    pub members: BTreeSet<CountryCode>,
    pub max_stay_days: u16,
    pub note: String,
}

/// Validation and loading errors for rule tables.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate country code {0}")]
    DuplicateCountry(CountryCode),
    #[error("lookup key '{key}' is claimed by both {first} and {second}")]
    AmbiguousKey {
        key: String,
        first: CountryCode,
        second: CountryCode,
    },
    #[error("{context} references unknown country {code}")]
    UnknownCountry { context: String, code: CountryCode },
    #[error("embassy record for {0} but it is not a Schengen member")]
    EmbassyForNonSchengen(CountryCode),
    #[error("failed to read rule table {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid rule table JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid embassy CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("embassy CSV row {line}: {reason}")]
    InvalidEmbassyRow { line: u64, reason: String },
}

/// Validated, indexed rule table.
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    data: CatalogData,
    keys: HashMap<String, usize>,
}

impl RuleCatalog {
    /// Built-in rule table shipped with the crate.
    pub fn standard() -> Self {
        Self::indexed(standard_catalog_data())
    }

    /// Validate and index a rule table.
    pub fn from_data(data: CatalogData) -> Result<Self, CatalogError> {
        let catalog = Self::indexed(data);
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let data: CatalogData = serde_json::from_reader(reader)?;
        Self::from_data(data)
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let file = File::open(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    /// Overlay embassy records from a CSV export, returning the number of rows applied.
    ///
    /// Every row is validated before any record is replaced, so a failing export
    /// leaves the catalog untouched.
    pub fn merge_embassies_csv<R: Read>(&mut self, reader: R) -> Result<usize, CatalogError> {
        let rows = embassy_import::parse_embassy_rows(reader)?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let country = self
                .lookup_country(&row.country)
                .ok_or_else(|| CatalogError::InvalidEmbassyRow {
                    line: row.line,
                    reason: format!("unknown country '{}'", row.country),
                })?;
            if !country.is_schengen {
                return Err(CatalogError::EmbassyForNonSchengen(country.code.clone()));
            }

            records.push(EmbassyInfo {
                country_code: country.code.clone(),
                major_consulates: row.major_consulates,
                booking_url: row.booking_url,
                processing_time: row.processing_time,
            });
        }

        let applied = records.len();
        for info in records {
            match self
                .data
                .embassies
                .iter_mut()
                .find(|existing| existing.country_code == info.country_code)
            {
                Some(existing) => *existing = info,
                None => self.data.embassies.push(info),
            }
        }

        Ok(applied)
    }

    pub fn data(&self) -> &CatalogData {
        &self.data
    }

    pub fn version(&self) -> &str {
        &self.data.version
    }

    pub fn effective_date(&self) -> NaiveDate {
        self.data.effective_date
    }

    pub fn countries(&self) -> &[Country] {
        &self.data.countries
    }

    pub fn schengen_members(&self) -> impl Iterator<Item = &Country> {
        self.data
            .countries
            .iter()
            .filter(|country| country.is_schengen)
    }

    /// Resolve an ISO code, slug, display name, or alias.
    pub fn lookup_country(&self, raw: &str) -> Option<&Country> {
        self.keys
            .get(&fold_key(raw))
            .and_then(|index| self.data.countries.get(*index))
    }

    pub fn is_schengen_member(&self, raw: &str) -> bool {
        self.lookup_country(raw)
            .map(|country| country.is_schengen)
            .unwrap_or(false)
    }

    pub fn embassy_info(&self, raw: &str) -> Option<&EmbassyInfo> {
        let country = self.lookup_country(raw)?;
        self.data
            .embassies
            .iter()
            .find(|info| info.country_code == country.code)
    }

    pub fn is_schengen_exempt(&self, code: &CountryCode) -> bool {
        self.data.schengen_exempt.contains(code)
    }

    pub fn destination_rule(&self, code: &CountryCode) -> Option<&DestinationRule> {
        self.data
            .destination_rules
            .iter()
            .find(|rule| &rule.destination == code)
    }

    pub fn schengen_tables(&self) -> &SchengenTables {
        &self.data.schengen
    }

    pub fn transit_risk(&self) -> &TransitRiskLists {
        &self.data.transit_risk
    }

    pub fn is_strong_passport(&self, code: &CountryCode) -> bool {
        self.data.strong_passports.contains(code)
    }

    pub fn is_common_visa_free_destination(&self, code: &CountryCode) -> bool {
        self.data.common_visa_free_destinations.contains(code)
    }

    fn indexed(mut data: CatalogData) -> Self {
        for country in &mut data.countries {
            country.code = CountryCode::new(country.code.as_str());
            if country.slug.trim().is_empty() {
                country.slug = fold_key(&country.name);
            }
        }

        let mut keys = HashMap::new();
        for (index, country) in data.countries.iter().enumerate() {
            for key in lookup_keys(country) {
                keys.entry(key).or_insert(index);
            }
        }

        Self { data, keys }
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = BTreeSet::new();
        for country in &self.data.countries {
            if !seen.insert(country.code.clone()) {
                return Err(CatalogError::DuplicateCountry(country.code.clone()));
            }
        }

        for (index, country) in self.data.countries.iter().enumerate() {
            for key in lookup_keys(country) {
                let owner = self.keys.get(&key).copied().unwrap_or(index);
                if owner != index {
                    return Err(CatalogError::AmbiguousKey {
                        key,
                        first: self.data.countries[owner].code.clone(),
                        second: country.code.clone(),
                    });
                }
            }
        }

        let known = |context: &str, code: &CountryCode| -> Result<(), CatalogError> {
            if seen.contains(code) {
                Ok(())
            } else {
                Err(CatalogError::UnknownCountry {
                    context: context.to_string(),
                    code: code.clone(),
                })
            }
        };

        for code in &self.data.schengen_exempt {
            known("schengen exemption list", code)?;
        }
        for code in &self.data.strong_passports {
            known("strong passport list", code)?;
        }
        for code in &self.data.common_visa_free_destinations {
            known("visa-free destination list", code)?;
        }
        for code in self
            .data
            .transit_risk
            .schengen_airport_transit
            .iter()
            .chain(&self.data.transit_risk.north_america)
        {
            known("transit risk list", code)?;
        }

        for rule in &self.data.destination_rules {
            let context = format!("destination rule {}", rule.destination);
            known(&context, &rule.destination)?;
            for code in &rule.exempt_nationalities {
                known(&context, code)?;
            }
            if let Some(bloc) = &rule.free_movement {
                for code in &bloc.members {
                    known(&context, code)?;
                }
            }
            if let Some(required) = rule
                .transit
                .as_ref()
                .and_then(|transit| transit.required_nationalities.as_ref())
            {
                for code in required {
                    known(&context, code)?;
                }
            }
        }

        for embassy in &self.data.embassies {
            known("embassy table", &embassy.country_code)?;
            if !self.is_schengen_member(embassy.country_code.as_str()) {
                return Err(CatalogError::EmbassyForNonSchengen(
                    embassy.country_code.clone(),
                ));
            }
        }

        Ok(())
    }
}

impl Default for RuleCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn lookup_keys(country: &Country) -> BTreeSet<String> {
    let mut keys = BTreeSet::new();
    keys.insert(fold_key(country.code.as_str()));
    keys.insert(fold_key(&country.slug));
    keys.insert(fold_key(&country.name));
    for alias in &country.aliases {
        keys.insert(fold_key(alias));
    }
    keys.remove("");
    keys
}

/// Fold user input into a lookup key: trimmed, lowercase, words joined by `-`.
pub(crate) fn fold_key(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned
        .split(|ch: char| ch.is_whitespace() || ch == '_' || ch == '-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}
