use super::common::*;
use crate::visa::consulate::{ConsulateError, ConsulateRecommender};
use crate::visa::domain::TravelPurpose;
use crate::visa::service::AdvisorServiceError;

#[test]
fn single_country_trip_returns_that_country() {
    let catalog = catalog();
    let recommendation = ConsulateRecommender::new(&catalog)
        .recommend(&trip(
            &["italy"],
            &[],
            "",
            TravelPurpose::Tourism,
        ))
        .expect("recommendation");

    assert_eq!(recommendation.primary_consulate.country.as_str(), "IT");
    assert!(!recommendation.expert_consultation_needed);
    assert!(recommendation.alternatives.is_empty());
    assert_eq!(
        recommendation.primary_consulate.booking_url,
        "https://vistoperitalia.esteri.it"
    );
}

#[test]
fn tie_breaks_on_entry_point_and_lists_both_countries() {
    let catalog = catalog();
    let recommendation = ConsulateRecommender::new(&catalog)
        .recommend(&trip(
            &["france", "germany"],
            &[("france", 5), ("germany", 5)],
            "france",
            TravelPurpose::Tourism,
        ))
        .expect("recommendation");

    assert_eq!(recommendation.primary_consulate.country.as_str(), "FR");
    assert!(!recommendation.expert_consultation_needed);
    let alternatives: Vec<&str> = recommendation
        .alternatives
        .iter()
        .map(|choice| choice.country.as_str())
        .collect();
    assert_eq!(alternatives, vec!["FR", "DE"]);
    assert!(recommendation.primary_consulate.reasoning.contains("first point of entry"));
}

#[test]
fn clear_leader_wins() {
    let catalog = catalog();
    let recommendation = ConsulateRecommender::new(&catalog)
        .recommend(&trip(
            &["france", "germany", "spain"],
            &[("france", 2), ("Germany", 6), ("ES", 3)],
            "france",
            TravelPurpose::Tourism,
        ))
        .expect("recommendation");

    assert_eq!(recommendation.primary_consulate.country.as_str(), "DE");
    assert_eq!(recommendation.primary_consulate.country_name, "Germany");
    assert!(recommendation.alternatives.is_empty());
    assert!(!recommendation.expert_consultation_needed);
    assert!(recommendation.primary_consulate.reasoning.contains("6 nights"));
}

#[test]
fn business_location_overrides_nights() {
    let catalog = catalog();
    let mut data = trip(
        &["france", "netherlands"],
        &[("france", 10), ("netherlands", 1)],
        "france",
        TravelPurpose::Conference,
    );
    data.business_location = Some("netherlands".to_string());

    let recommendation = ConsulateRecommender::new(&catalog)
        .recommend(&data)
        .expect("recommendation");

    assert_eq!(recommendation.primary_consulate.country.as_str(), "NL");
    assert!(!recommendation.expert_consultation_needed);
    assert!(recommendation.primary_consulate.reasoning.contains("conference"));
}

#[test]
fn business_location_is_ignored_for_tourism() {
    let catalog = catalog();
    let mut data = trip(
        &["france", "netherlands"],
        &[("france", 10), ("netherlands", 1)],
        "netherlands",
        TravelPurpose::Tourism,
    );
    data.business_location = Some("netherlands".to_string());

    let recommendation = ConsulateRecommender::new(&catalog)
        .recommend(&data)
        .expect("recommendation");

    assert_eq!(recommendation.primary_consulate.country.as_str(), "FR");
}

#[test]
fn missing_nights_falls_back_to_entry_point_with_expert_flag() {
    let catalog = catalog();
    let recommendation = ConsulateRecommender::new(&catalog)
        .recommend(&trip(
            &["france", "greece"],
            &[],
            "greece",
            TravelPurpose::Tourism,
        ))
        .expect("recommendation");

    assert_eq!(recommendation.primary_consulate.country.as_str(), "GR");
    assert!(recommendation.expert_consultation_needed);
}

#[test]
fn missing_embassy_record_uses_generic_processing_time() {
    let catalog = catalog();
    let recommendation = ConsulateRecommender::new(&catalog)
        .recommend(&trip(
            &["austria", "france"],
            &[("austria", 7), ("france", 2)],
            "france",
            TravelPurpose::Tourism,
        ))
        .expect("recommendation");

    let primary = recommendation.primary_consulate;
    assert_eq!(primary.country.as_str(), "AT");
    assert_eq!(primary.booking_url, "");
    assert_eq!(primary.processing_time, "15-20 business days");
    assert!(primary.embassy_data_missing);
}

#[test]
fn non_schengen_selections_are_ignored() {
    let catalog = catalog();
    let recommendation = ConsulateRecommender::new(&catalog)
        .recommend(&trip(
            &["United Kingdom", "spain"],
            &[("United Kingdom", 9), ("spain", 2)],
            "spain",
            TravelPurpose::Tourism,
        ))
        .expect("recommendation");

    assert_eq!(recommendation.primary_consulate.country.as_str(), "ES");
    assert!(!recommendation.expert_consultation_needed);
}

#[test]
fn service_rejects_unusable_trips() {
    let service = service();

    let empty = service.recommend_consulate(&trip(&[], &[], "france", TravelPurpose::Tourism));
    assert!(matches!(
        empty,
        Err(AdvisorServiceError::Consulate(ConsulateError::EmptyItinerary))
    ));

    let no_entry = service.recommend_consulate(&trip(
        &["france", "italy"],
        &[("france", 3)],
        "  ",
        TravelPurpose::Tourism,
    ));
    assert!(matches!(
        no_entry,
        Err(AdvisorServiceError::Consulate(
            ConsulateError::MissingEntryPoint
        ))
    ));

    let single = service
        .recommend_consulate(&trip(&["italy"], &[], "", TravelPurpose::Tourism))
        .expect("single-country trip needs no entry point");
    assert_eq!(single.primary_consulate.country.as_str(), "IT");
}

#[test]
fn trips_without_schengen_countries_are_rejected() {
    let service = service();

    let outside = service.recommend_consulate(&trip(
        &["United Kingdom"],
        &[("United Kingdom", 4)],
        "",
        TravelPurpose::Tourism,
    ));
    assert!(matches!(
        outside,
        Err(AdvisorServiceError::Consulate(ConsulateError::EmptyItinerary))
    ));

    let transatlantic = service.recommend_consulate(&trip(
        &["US", "GB"],
        &[],
        "US",
        TravelPurpose::Tourism,
    ));
    assert!(matches!(
        transatlantic,
        Err(AdvisorServiceError::Consulate(ConsulateError::EmptyItinerary))
    ));

    let unknown = service.recommend_consulate(&trip(
        &["Atlantis"],
        &[],
        "Atlantis",
        TravelPurpose::Tourism,
    ));
    assert!(matches!(
        unknown,
        Err(AdvisorServiceError::Consulate(ConsulateError::EmptyItinerary))
    ));
}

#[test]
fn entry_point_outside_schengen_is_rejected() {
    let catalog = catalog();
    let err = ConsulateRecommender::new(&catalog)
        .recommend(&trip(
            &["france", "germany"],
            &[("france", 5), ("germany", 5)],
            "United States",
            TravelPurpose::Tourism,
        ))
        .expect_err("non-member entry point rejected");

    match err {
        ConsulateError::NotSchengenMember { field, value } => {
            assert_eq!(field, "entry point");
            assert_eq!(value, "United States");
        }
        other => panic!("expected non-member error, got {other:?}"),
    }
}

#[test]
fn unknown_business_location_is_rejected() {
    let catalog = catalog();
    let mut data = trip(
        &["france", "netherlands"],
        &[("france", 4), ("netherlands", 2)],
        "france",
        TravelPurpose::Business,
    );
    data.business_location = Some("Atlantis".to_string());

    let err = ConsulateRecommender::new(&catalog)
        .recommend(&data)
        .expect_err("unknown business location rejected");

    assert!(matches!(
        err,
        ConsulateError::NotSchengenMember { field: "business location", .. }
    ));
    assert!(err.to_string().contains("Atlantis"));
}

#[test]
fn single_schengen_country_among_other_stops_needs_no_entry_point() {
    let catalog = catalog();
    let recommendation = ConsulateRecommender::new(&catalog)
        .recommend(&trip(
            &["United Kingdom", "portugal"],
            &[("United Kingdom", 6), ("portugal", 2)],
            "",
            TravelPurpose::Tourism,
        ))
        .expect("recommendation");

    assert_eq!(recommendation.primary_consulate.country.as_str(), "PT");
    assert!(!recommendation.expert_consultation_needed);
}
