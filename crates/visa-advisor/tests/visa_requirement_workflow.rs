//! End-to-end checks of the public advisor facade: catalog loading, single lookups,
//! and itinerary aggregation.

use std::fs::File;
use std::sync::Arc;

use visa_advisor::visa::{
    EvaluationConfig, ItineraryRequest, Requirement, RuleCatalog, StayDuration, TravelPurpose,
    VisaAdvisorService, VisaQuery, VisaType,
};

fn service_with(config: EvaluationConfig) -> VisaAdvisorService {
    VisaAdvisorService::new(Arc::new(RuleCatalog::standard()), config)
}

fn query(nationality: &str, destination: &str) -> VisaQuery {
    VisaQuery {
        nationality: nationality.to_string(),
        destination: destination.to_string(),
        purpose: TravelPurpose::Tourism,
        duration: StayDuration::SingleShort,
    }
}

#[test]
fn us_traveller_to_france_is_visa_free() {
    let service = service_with(EvaluationConfig::default());
    let result = service.check(&query("United States", "france"));

    assert!(!result.required);
    assert!(result.is_schengen);
}

#[test]
fn nigerian_traveller_to_germany_needs_schengen_visa() {
    let service = service_with(EvaluationConfig::default());
    let result = service.check(&query("Nigeria", "germany"));

    assert!(result.required);
    assert!(result.is_schengen);
    assert_eq!(result.visa_type.label(), "schengen-visa");
}

#[test]
fn query_json_accepts_kebab_case_enums() {
    let query: VisaQuery = serde_json::from_str(
        r#"{"nationality":"Japan","destination":"Italy","purpose":"conference","duration":"multiple-long"}"#,
    )
    .expect("query parses");

    assert_eq!(query.purpose, TravelPurpose::Conference);
    assert_eq!(query.duration, StayDuration::MultipleLong);

    let result = service_with(EvaluationConfig::default()).check(&query);
    assert_eq!(result.visa_type, VisaType::VisaFree);
}

#[test]
fn embassy_csv_overlay_feeds_processing_times() {
    let mut catalog = RuleCatalog::standard();
    let file = File::open(concat!(env!("CARGO_MANIFEST_DIR"), "/data/embassies.csv"))
        .expect("sample csv present");
    let applied = catalog.merge_embassies_csv(file).expect("csv merges");
    assert_eq!(applied, 4);

    let service = VisaAdvisorService::new(Arc::new(catalog), EvaluationConfig::default());
    let result = service.check(&query("India", "Austria"));

    assert!(result.required);
    assert_eq!(result.processing_time.as_deref(), Some("15 business days"));
}

#[test]
fn itinerary_mixes_rules_and_unknowns() {
    let service = service_with(EvaluationConfig::default());
    let assessment = service.check_itinerary(&ItineraryRequest {
        nationality: "Ghana".to_string(),
        destinations: vec![
            "Nigeria".to_string(),
            "United Kingdom".to_string(),
            "Atlantis".to_string(),
        ],
        purposes: vec![TravelPurpose::Business],
        duration: StayDuration::SingleShort,
    });

    let requirements: Vec<Requirement> = assessment
        .destinations
        .iter()
        .map(|entry| entry.result.requirement)
        .collect();
    assert_eq!(
        requirements,
        vec![
            Requirement::NotRequired,
            Requirement::Required,
            Requirement::Unknown
        ]
    );
    assert_eq!(assessment.destinations[2].destination_name, "Atlantis");
    assert!(assessment.destinations[2].flag.is_empty());
    assert!(assessment.has_visa_required);
    assert!(assessment.has_unknown);
    assert!(!assessment.has_schengen_countries);
}

#[test]
fn escalation_policy_is_injected_through_config() {
    let service = service_with(EvaluationConfig {
        escalated_purposes: [TravelPurpose::Study].into_iter().collect(),
        strong_passport_heuristic: true,
    });

    let mut study = query("Canada", "Portugal");
    study.purpose = TravelPurpose::Study;
    let result = service.check(&study);

    assert!(result.required);
    assert!(result.escalated_by_purpose);
    assert_eq!(result.visa_type, VisaType::SchengenVisa);
}
