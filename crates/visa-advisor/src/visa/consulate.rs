//! Schengen consulate-of-competence selection.
//!
//! Priority order: a single country wins outright; a business location overrides the
//! nights distribution for business and conference trips; otherwise the country with
//! the most nights wins and ties fall back to the first port of entry.

use tracing::warn;

use super::catalog::RuleCatalog;
use super::domain::{
    ConsulateChoice, ConsulateRecommendation, Country, CountryCode, SchengenTripData,
    TravelPurpose,
};

/// Trip data the recommender cannot turn into a Schengen consulate.
#[derive(Debug, thiserror::Error)]
pub enum ConsulateError {
    #[error("select at least one Schengen country")]
    EmptyItinerary,
    #[error("entry point is required when several countries are selected")]
    MissingEntryPoint,
    #[error("{field} '{value}' is not a Schengen member state")]
    NotSchengenMember { field: &'static str, value: String },
}

/// Resolved country entry used during ranking.
#[derive(Debug, Clone)]
struct Candidate {
    code: CountryCode,
    name: String,
    nights: u32,
}

/// Recommends which member state's consulate should process a Schengen application.
#[derive(Debug, Clone, Copy)]
pub struct ConsulateRecommender<'a> {
    catalog: &'a RuleCatalog,
}

impl<'a> ConsulateRecommender<'a> {
    pub fn new(catalog: &'a RuleCatalog) -> Self {
        Self { catalog }
    }

    /// Selections that are unknown or outside Schengen are ignored. The entry point
    /// and business location must be Schengen members whenever they decide the result.
    pub fn recommend(
        &self,
        trip: &SchengenTripData,
    ) -> Result<ConsulateRecommendation, ConsulateError> {
        let candidates = self.candidates(trip);

        match candidates.as_slice() {
            [] => return Err(ConsulateError::EmptyItinerary),
            [only] => {
                return Ok(ConsulateRecommendation {
                    primary_consulate: self.choice(
                        only,
                        format!(
                            "{} is the only Schengen country on your itinerary, so apply at its consulate.",
                            only.name
                        ),
                    ),
                    alternatives: Vec::new(),
                    expert_consultation_needed: false,
                });
            }
            _ => {}
        }

        if trip.purpose.is_business() {
            if let Some(location) = trip
                .business_location
                .as_deref()
                .filter(|location| !location.trim().is_empty())
            {
                let candidate = self.member("business location", location, trip)?;
                return Ok(ConsulateRecommendation {
                    primary_consulate: self.choice(
                        &candidate,
                        format!(
                            "Your {} activities take place in {}, so its consulate is responsible regardless of how nights are distributed.",
                            purpose_noun(trip.purpose),
                            candidate.name
                        ),
                    ),
                    alternatives: Vec::new(),
                    expert_consultation_needed: false,
                });
            }
        }

        if trip.entry_point.trim().is_empty() {
            return Err(ConsulateError::MissingEntryPoint);
        }
        let entry = self.member("entry point", &trip.entry_point, trip)?;

        let mut ranked = candidates;
        // Stable sort keeps selection order among equal night counts.
        ranked.sort_by(|left, right| right.nights.cmp(&left.nights));

        let Some(leader) = ranked.first().filter(|leader| leader.nights > 0) else {
            return Ok(ConsulateRecommendation {
                primary_consulate: self.choice(
                    &entry,
                    format!(
                        "No nights distribution was provided, so we suggest the consulate of {}, your first point of entry. An expert consultation is recommended to confirm the responsible consulate.",
                        entry.name
                    ),
                ),
                alternatives: Vec::new(),
                expert_consultation_needed: true,
            });
        };

        let tied: Vec<&Candidate> = ranked
            .iter()
            .filter(|candidate| candidate.nights == leader.nights)
            .collect();

        if tied.len() == 1 {
            let runner_up = ranked.get(1).map(|candidate| candidate.nights).unwrap_or(0);
            return Ok(ConsulateRecommendation {
                primary_consulate: self.choice(
                    leader,
                    format!(
                        "You will spend the most nights in {} ({} nights versus {} in the next country), making it your main destination.",
                        leader.name, leader.nights, runner_up
                    ),
                ),
                alternatives: Vec::new(),
                expert_consultation_needed: false,
            });
        }

        let tied_names: Vec<&str> = tied.iter().map(|candidate| candidate.name.as_str()).collect();
        let alternatives = tied
            .iter()
            .map(|candidate| {
                self.choice(
                    candidate,
                    format!(
                        "{} shares the longest stay ({} nights).",
                        candidate.name, candidate.nights
                    ),
                )
            })
            .collect();

        Ok(ConsulateRecommendation {
            primary_consulate: self.choice(
                &entry,
                format!(
                    "You will spend the same number of nights ({}) in {}, so the consulate of {}, your first point of entry, is responsible.",
                    leader.nights,
                    tied_names.join(" and "),
                    entry.name
                ),
            ),
            alternatives,
            expert_consultation_needed: false,
        })
    }

    fn candidates(&self, trip: &SchengenTripData) -> Vec<Candidate> {
        let mut candidates: Vec<Candidate> = Vec::new();
        for country in trip
            .selected_countries
            .iter()
            .filter_map(|raw| self.catalog.lookup_country(raw))
            .filter(|country| country.is_schengen)
        {
            if !candidates.iter().any(|seen| seen.code == country.code) {
                candidates.push(self.candidate(country, trip));
            }
        }
        candidates
    }

    fn member(
        &self,
        field: &'static str,
        raw: &str,
        trip: &SchengenTripData,
    ) -> Result<Candidate, ConsulateError> {
        self.catalog
            .lookup_country(raw)
            .filter(|country| country.is_schengen)
            .map(|country| self.candidate(country, trip))
            .ok_or_else(|| ConsulateError::NotSchengenMember {
                field,
                value: raw.trim().to_string(),
            })
    }

    fn candidate(&self, country: &Country, trip: &SchengenTripData) -> Candidate {
        let nights = trip
            .nights_distribution
            .iter()
            .filter(|(key, _)| {
                self.catalog
                    .lookup_country(key)
                    .is_some_and(|resolved| resolved.code == country.code)
            })
            .map(|(_, nights)| *nights)
            .sum();
        Candidate {
            code: country.code.clone(),
            name: country.name.clone(),
            nights,
        }
    }

    fn choice(&self, candidate: &Candidate, reasoning: String) -> ConsulateChoice {
        let tables = self.catalog.schengen_tables();
        match self.catalog.embassy_info(candidate.code.as_str()) {
            Some(info) => ConsulateChoice {
                country: candidate.code.clone(),
                country_name: candidate.name.clone(),
                reasoning,
                booking_url: info.booking_url.clone(),
                processing_time: info.processing_time.clone(),
                embassy_data_missing: false,
            },
            None => {
                warn!(country = %candidate.code, "no embassy record; using default processing time");
                ConsulateChoice {
                    country: candidate.code.clone(),
                    country_name: candidate.name.clone(),
                    reasoning,
                    booking_url: String::new(),
                    processing_time: tables.default_consulate_processing_time.clone(),
                    embassy_data_missing: true,
                }
            }
        }
    }
}

fn purpose_noun(purpose: TravelPurpose) -> &'static str {
    match purpose {
        TravelPurpose::Conference => "conference",
        _ => "business",
    }
}
