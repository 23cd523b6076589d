use crate::visa::catalog::{DestinationRule, RuleCatalog};
use crate::visa::domain::{
    Confidence, Country, CountryCode, RegionalMovement, Requirement, StayCategory, VisaQuery,
    VisaResult, VisaType,
};

use super::config::EvaluationConfig;

/// Rule-table outcome before purpose policy is applied.
pub(crate) struct RuleOutcome {
    pub result: VisaResult,
    /// Visa type to report if purpose policy escalates a visa-free answer.
    pub escalate_to: Option<VisaType>,
}

impl RuleOutcome {
    fn fixed(result: VisaResult) -> Self {
        Self {
            result,
            escalate_to: None,
        }
    }

    fn escalatable(result: VisaResult, escalate_to: VisaType) -> Self {
        Self {
            result,
            escalate_to: Some(escalate_to),
        }
    }
}

struct Subject<'a> {
    nationality: Option<&'a Country>,
    nationality_name: String,
    destination: &'a Country,
    category: StayCategory,
    query: &'a VisaQuery,
}

impl Subject<'_> {
    fn nationality_code(&self) -> Option<&CountryCode> {
        self.nationality.map(|country| &country.code)
    }

    fn is_national_in(&self, list: &std::collections::BTreeSet<CountryCode>) -> bool {
        self.nationality_code()
            .map(|code| list.contains(code))
            .unwrap_or(false)
    }

    fn result(&self, requirement: Requirement, visa_type: VisaType, message: String) -> VisaResult {
        let mut result = VisaResult::new(
            self.nationality_name.clone(),
            self.destination.name.clone(),
            requirement,
            visa_type,
            message,
        );
        result.is_schengen = self.destination.is_schengen;
        if self.nationality.is_none() && requirement != Requirement::Unknown {
            result.confidence = Confidence::Low;
            result.message.push_str(&format!(
                " The nationality '{}' is not in our reference data; verify current requirements.",
                self.nationality_name
            ));
        }
        result
    }
}

pub(crate) fn evaluate_rules(
    catalog: &RuleCatalog,
    config: &EvaluationConfig,
    query: &VisaQuery,
) -> RuleOutcome {
    let nationality_input = query.nationality.trim();
    let destination_input = query.destination.trim();

    if nationality_input.is_empty() || destination_input.is_empty() {
        return RuleOutcome::fixed(unknown_result(
            nationality_input,
            destination_input,
            "Nationality and destination are both needed to check visa requirements.".to_string(),
        ));
    }

    let Some(destination) = catalog.lookup_country(destination_input) else {
        return RuleOutcome::fixed(unknown_result(
            nationality_input,
            destination_input,
            format!(
                "We do not have visa rules for '{destination_input}'. Verify current requirements with the destination's embassy or consulate."
            ),
        ));
    };

    let nationality = catalog.lookup_country(nationality_input);
    let subject = Subject {
        nationality,
        nationality_name: nationality
            .map(|country| country.name.clone())
            .unwrap_or_else(|| nationality_input.to_string()),
        destination,
        category: query.duration.category(),
        query,
    };

    if subject.nationality_code() == Some(&destination.code) {
        return RuleOutcome::fixed(subject.result(
            Requirement::NotRequired,
            VisaType::VisaFree,
            format!(
                "Citizens of {} do not need a visa to enter their own country.",
                destination.name
            ),
        ));
    }

    if destination.is_schengen {
        return schengen_rule(catalog, &subject);
    }

    if let Some(rule) = catalog.destination_rule(&destination.code) {
        return destination_specific_rule(rule, &subject);
    }

    strong_passport_heuristic(catalog, config, &subject)
}

fn unknown_result(nationality: &str, destination: &str, message: String) -> VisaResult {
    let mut result = VisaResult::new(
        nationality,
        destination,
        Requirement::Unknown,
        VisaType::Unknown,
        message,
    );
    result.fallback = true;
    result
}

fn schengen_rule(catalog: &RuleCatalog, subject: &Subject<'_>) -> RuleOutcome {
    let tables = catalog.schengen_tables();
    let destination = subject.destination;
    let nationality = &subject.nationality_name;
    let free_movement = subject
        .nationality
        .map(|country| country.is_eea)
        .unwrap_or(false);
    let exempt = subject
        .nationality_code()
        .map(|code| catalog.is_schengen_exempt(code))
        .unwrap_or(false);

    if free_movement {
        let mut result = subject.result(
            Requirement::NotRequired,
            VisaType::FreeMovement,
            format!(
                "As a citizen of {nationality}, you can travel to {} without a visa and move freely within the Schengen area.",
                destination.name
            ),
        );
        result.regional_movement = Some(RegionalMovement {
            bloc: "EU/EEA".to_string(),
            unrestricted: true,
            note: "EU/EEA and Swiss citizens need only a valid passport or national ID card; stays beyond 3 months may require residence registration.".to_string(),
        });
        return RuleOutcome::fixed(result);
    }

    match subject.category {
        StayCategory::ShortStay if exempt => {
            let entries = if subject.query.duration.multiple_entries() {
                "Multiple entries are permitted as long as the total stay stays within the 90-day limit."
            } else {
                "Your single entry is covered as long as the stay does not exceed 90 days."
            };
            let mut result = subject.result(
                Requirement::NotRequired,
                VisaType::VisaFree,
                format!(
                    "Citizens of {nationality} can visit {} without a visa for up to 90 days within any 180-day period. {entries}",
                    destination.name
                ),
            );
            result.max_stay_days = Some(tables.short_stay_max_days);
            RuleOutcome::escalatable(result, VisaType::SchengenVisa)
        }
        StayCategory::ShortStay => {
            let mut result = subject.result(
                Requirement::Required,
                VisaType::SchengenVisa,
                format!(
                    "Citizens of {nationality} need a Schengen visa (Type C) to visit {}. Apply at the consulate of your main destination (where you will spend the most nights); if stays are equal, apply where you first enter the Schengen area.",
                    destination.name
                ),
            );
            result.max_stay_days = Some(tables.short_stay_max_days);
            result.processing_time = Some(
                catalog
                    .embassy_info(destination.code.as_str())
                    .map(|info| info.processing_time.clone())
                    .unwrap_or_else(|| tables.short_stay_processing_time.clone()),
            );
            result.documents = Some(tables.short_stay_documents.clone());
            RuleOutcome::fixed(result)
        }
        StayCategory::LongStay => {
            let mut result = subject.result(
                Requirement::Required,
                VisaType::NationalVisa,
                format!(
                    "Stays longer than 90 days in {} require a national visa (Type D) issued by {}, including for visa-exempt nationals.",
                    destination.name, destination.name
                ),
            );
            result.processing_time = Some(tables.long_stay_processing_time.clone());
            result.documents = Some(tables.long_stay_documents.clone());
            result.national_visa_categories = tables
                .national_visa_categories
                .get(&subject.query.purpose)
                .cloned();
            RuleOutcome::fixed(result)
        }
        StayCategory::Transit
            if subject.is_national_in(&catalog.transit_risk().schengen_airport_transit) =>
        {
            let mut result = subject.result(
                Requirement::Required,
                VisaType::AirportTransitVisa,
                format!(
                    "Citizens of {nationality} need an airport transit visa (Type A) even to change planes in {} without leaving the international transit area.",
                    destination.name
                ),
            );
            result.processing_time = Some(tables.short_stay_processing_time.clone());
            result.documents = Some(tables.transit_documents.clone());
            RuleOutcome::fixed(result)
        }
        StayCategory::Transit => {
            let leaving = if exempt {
                "You may also leave the airport visa-free for up to 90 days."
            } else {
                "Leaving the airport requires a Schengen visa (Type C)."
            };
            let mut result = subject.result(
                Requirement::NotRequired,
                VisaType::VisaFree,
                format!(
                    "Citizens of {nationality} can transit through the international area of airports in {} without a visa. {leaving}",
                    destination.name
                ),
            );
            result.documents = Some(tables.transit_documents.clone());
            RuleOutcome::fixed(result)
        }
    }
}

fn destination_specific_rule(rule: &DestinationRule, subject: &Subject<'_>) -> RuleOutcome {
    let destination = &subject.destination.name;
    let nationality = &subject.nationality_name;

    if let Some(bloc) = rule
        .free_movement
        .as_ref()
        .filter(|bloc| subject.is_national_in(&bloc.members))
    {
        let message = match subject.category {
            StayCategory::LongStay => format!(
                "Citizens of {nationality} ({}) enter {destination} without a visa; stays beyond {} days require a residence permit after arrival.",
                bloc.bloc, bloc.max_stay_days
            ),
            _ => format!(
                "Citizens of {nationality} ({}) can visit {destination} without a visa for up to {} days.",
                bloc.bloc, bloc.max_stay_days
            ),
        };
        let mut result = subject.result(Requirement::NotRequired, bloc.visa_type, message);
        result.max_stay_days = Some(bloc.max_stay_days);
        result.regional_movement = Some(RegionalMovement {
            bloc: bloc.bloc.clone(),
            unrestricted: true,
            note: bloc.note.clone(),
        });
        return RuleOutcome::fixed(result);
    }

    let exempt = subject.is_national_in(&rule.exempt_nationalities);

    match (subject.category, rule.transit.as_ref()) {
        (StayCategory::LongStay, _) => {
            let mut result = subject.result(
                Requirement::Required,
                rule.long_stay_visa_type,
                format!(
                    "Long stays in {destination} require a {} for citizens of {nationality}.",
                    rule.long_stay_visa_type.display_name()
                ),
            );
            result.processing_time = Some(rule.long_stay_processing_time.clone());
            if !rule.long_stay_categories.is_empty() {
                result.national_visa_categories = Some(rule.long_stay_categories.clone());
            }
            RuleOutcome::fixed(result)
        }
        (StayCategory::Transit, Some(transit)) if !exempt => {
            let needs_visa = transit
                .required_nationalities
                .as_ref()
                .map(|required| subject.is_national_in(required))
                .unwrap_or(true);
            if needs_visa {
                let mut result = subject.result(
                    Requirement::Required,
                    transit.visa_type,
                    format!(
                        "Citizens of {nationality} need a {} to transit through {destination}.",
                        transit.visa_type.display_name()
                    ),
                );
                result.processing_time = Some(rule.visitor_processing_time.clone());
                RuleOutcome::fixed(result)
            } else {
                RuleOutcome::fixed(subject.result(
                    Requirement::NotRequired,
                    VisaType::VisaFree,
                    format!(
                        "Citizens of {nationality} can transit airside through {destination} without a visa if they stay in the international area."
                    ),
                ))
            }
        }
        (_, _) if exempt => {
            let mut message = format!(
                "Citizens of {nationality} do not need a visa for short visits to {destination}. {} applies for stays up to {} days.",
                rule.exempt_visa_type.display_name(),
                rule.exempt_max_stay_days
            );
            if let Some(note) = &rule.exempt_note {
                message.push(' ');
                message.push_str(note);
            }
            let mut result = subject.result(Requirement::NotRequired, rule.exempt_visa_type, message);
            result.max_stay_days = Some(rule.exempt_max_stay_days);
            if subject.category == StayCategory::ShortStay {
                RuleOutcome::escalatable(result, rule.visitor_visa_type)
            } else {
                RuleOutcome::fixed(result)
            }
        }
        (_, _) => {
            let mut result = subject.result(
                Requirement::Required,
                rule.visitor_visa_type,
                format!(
                    "Citizens of {nationality} need a {} to visit {destination}.",
                    rule.visitor_visa_type.display_name()
                ),
            );
            result.processing_time = Some(rule.visitor_processing_time.clone());
            if !rule.visitor_documents.is_empty() {
                result.documents = Some(rule.visitor_documents.clone());
            }
            RuleOutcome::fixed(result)
        }
    }
}

fn strong_passport_heuristic(
    catalog: &RuleCatalog,
    config: &EvaluationConfig,
    subject: &Subject<'_>,
) -> RuleOutcome {
    let destination = subject.destination;
    let nationality = &subject.nationality_name;

    let qualifies = config.strong_passport_heuristic
        && subject.category == StayCategory::ShortStay
        && subject
            .nationality_code()
            .map(|code| catalog.is_strong_passport(code))
            .unwrap_or(false)
        && catalog.is_common_visa_free_destination(&destination.code);

    if qualifies {
        let mut result = subject.result(
            Requirement::NotRequired,
            VisaType::VisaFree,
            format!(
                "Citizens of {nationality} can usually visit {} visa-free for short stays. Verify current requirements with the official embassy before travel.",
                destination.name
            ),
        );
        result.confidence = Confidence::Low;
        return RuleOutcome::fixed(result);
    }

    let mut result = subject.result(
        Requirement::Unknown,
        VisaType::Unknown,
        format!(
            "We could not determine visa requirements for citizens of {nationality} travelling to {}. Verify current requirements with the embassy or consulate of {}.",
            destination.name, destination.name
        ),
    );
    result.fallback = true;
    RuleOutcome::fixed(result)
}
