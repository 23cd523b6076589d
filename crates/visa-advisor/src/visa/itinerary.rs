use serde::{Deserialize, Serialize};

use super::catalog::RuleCatalog;
use super::domain::{Country, Requirement, StayDuration, TravelPurpose, VisaQuery, VisaResult};
use super::evaluation::VisaEvaluator;

const NORTH_AMERICA: [&str; 2] = ["US", "CA"];

/// One nationality travelling to several destinations in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItineraryRequest {
    pub nationality: String,
    pub destinations: Vec<String>,
    /// `purposes[i]` applies to `destinations[i]`; missing entries reuse the last purpose.
    #[serde(default)]
    pub purposes: Vec<TravelPurpose>,
    #[serde(default = "default_duration")]
    pub duration: StayDuration,
}

fn default_duration() -> StayDuration {
    StayDuration::SingleShort
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationAssessment {
    pub destination_name: String,
    pub flag: String,
    #[serde(flatten)]
    pub result: VisaResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransitRegion {
    NorthAmerica,
    Schengen,
}

/// Advisory only; never changes a destination result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitWarning {
    pub region: TransitRegion,
    pub countries: Vec<String>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItineraryAssessment {
    pub nationality: String,
    pub destinations: Vec<DestinationAssessment>,
    pub transit_warnings: Vec<TransitWarning>,
    pub has_visa_required: bool,
    pub all_visa_free: bool,
    pub has_schengen_countries: bool,
    pub has_unknown: bool,
}

impl VisaEvaluator {
    /// Evaluate every destination of an itinerary and collect transit advisories.
    pub fn evaluate_multiple(&self, request: &ItineraryRequest) -> ItineraryAssessment {
        let catalog = self.catalog();
        let destinations: Vec<DestinationAssessment> = request
            .destinations
            .iter()
            .enumerate()
            .map(|(index, destination)| {
                let query = VisaQuery {
                    nationality: request.nationality.clone(),
                    destination: destination.clone(),
                    purpose: purpose_for(&request.purposes, index),
                    duration: request.duration,
                };
                let country = catalog.lookup_country(destination);
                DestinationAssessment {
                    destination_name: country
                        .map(|country| country.name.clone())
                        .unwrap_or_else(|| destination.trim().to_string()),
                    flag: country
                        .map(|country| country.flag.clone())
                        .unwrap_or_default(),
                    result: self.evaluate(&query),
                }
            })
            .collect();

        let mut touched: Vec<&Country> = Vec::new();
        for country in request
            .destinations
            .iter()
            .filter_map(|destination| catalog.lookup_country(destination))
        {
            if !touched.iter().any(|seen| seen.code == country.code) {
                touched.push(country);
            }
        }
        let transit_warnings = transit_warnings(catalog, &request.nationality, &touched);

        let has_visa_required = destinations.iter().any(|entry| entry.result.required);
        let has_unknown = destinations
            .iter()
            .any(|entry| entry.result.requirement == Requirement::Unknown);
        let all_visa_free = !destinations.is_empty()
            && destinations
                .iter()
                .all(|entry| entry.result.requirement == Requirement::NotRequired);
        let has_schengen_countries = touched.iter().any(|country| country.is_schengen);

        ItineraryAssessment {
            nationality: catalog
                .lookup_country(&request.nationality)
                .map(|country| country.name.clone())
                .unwrap_or_else(|| request.nationality.trim().to_string()),
            destinations,
            transit_warnings,
            has_visa_required,
            all_visa_free,
            has_schengen_countries,
            has_unknown,
        }
    }
}

fn purpose_for(purposes: &[TravelPurpose], index: usize) -> TravelPurpose {
    purposes
        .get(index)
        .or_else(|| purposes.last())
        .copied()
        .unwrap_or(TravelPurpose::Tourism)
}

fn transit_warnings(
    catalog: &RuleCatalog,
    nationality: &str,
    touched: &[&Country],
) -> Vec<TransitWarning> {
    let Some(nationality) = catalog.lookup_country(nationality) else {
        return Vec::new();
    };
    let risk = catalog.transit_risk();
    let mut warnings = Vec::new();

    let north_america: Vec<String> = touched
        .iter()
        .filter(|country| NORTH_AMERICA.contains(&country.code.as_str()))
        .filter(|country| country.code != nationality.code)
        .map(|country| country.name.clone())
        .collect();
    if !north_america.is_empty() && risk.north_america.contains(&nationality.code) {
        warnings.push(TransitWarning {
            region: TransitRegion::NorthAmerica,
            message: format!(
                "Citizens of {} usually need a transit visa to connect through {}, even without leaving the airport. Check transit rules before booking connecting flights.",
                nationality.name,
                north_america.join(" or ")
            ),
            countries: north_america,
        });
    }

    let schengen: Vec<String> = touched
        .iter()
        .filter(|country| country.is_schengen)
        .map(|country| country.name.clone())
        .collect();
    if !schengen.is_empty() && risk.schengen_airport_transit.contains(&nationality.code) {
        warnings.push(TransitWarning {
            region: TransitRegion::Schengen,
            message: format!(
                "Citizens of {} need an airport transit visa (Type A) to change planes at Schengen airports such as those in {}.",
                nationality.name,
                schengen.join(", ")
            ),
            countries: schengen,
        });
    }

    warnings
}
