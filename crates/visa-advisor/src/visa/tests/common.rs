use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::visa::catalog::RuleCatalog;
use crate::visa::domain::{SchengenTripData, StayDuration, TravelPurpose, VisaQuery, VisaResult};
use crate::visa::evaluation::{EvaluationConfig, VisaEvaluator};
use crate::visa::service::VisaAdvisorService;
use crate::visa::visa_router;

pub(super) fn catalog() -> Arc<RuleCatalog> {
    Arc::new(RuleCatalog::standard())
}

pub(super) fn evaluator() -> VisaEvaluator {
    VisaEvaluator::new(catalog(), EvaluationConfig::default())
}

pub(super) fn evaluator_with(config: EvaluationConfig) -> VisaEvaluator {
    VisaEvaluator::new(catalog(), config)
}

pub(super) fn escalating(purposes: &[TravelPurpose]) -> EvaluationConfig {
    EvaluationConfig {
        escalated_purposes: purposes.iter().copied().collect::<BTreeSet<_>>(),
        ..EvaluationConfig::default()
    }
}

pub(super) fn query(
    nationality: &str,
    destination: &str,
    purpose: TravelPurpose,
    duration: StayDuration,
) -> VisaQuery {
    VisaQuery {
        nationality: nationality.to_string(),
        destination: destination.to_string(),
        purpose,
        duration,
    }
}

pub(super) fn tourist_visit(nationality: &str, destination: &str) -> VisaResult {
    evaluator().evaluate(&query(
        nationality,
        destination,
        TravelPurpose::Tourism,
        StayDuration::SingleShort,
    ))
}

pub(super) fn trip(
    countries: &[&str],
    nights: &[(&str, u32)],
    entry_point: &str,
    purpose: TravelPurpose,
) -> SchengenTripData {
    SchengenTripData {
        selected_countries: countries.iter().map(|country| country.to_string()).collect(),
        nights_distribution: nights
            .iter()
            .map(|(country, count)| (country.to_string(), *count))
            .collect::<BTreeMap<_, _>>(),
        business_location: None,
        entry_point: entry_point.to_string(),
        purpose,
    }
}

pub(super) fn service() -> VisaAdvisorService {
    VisaAdvisorService::new(catalog(), EvaluationConfig::default())
}

pub(super) fn router() -> axum::Router {
    visa_router(Arc::new(service()))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
