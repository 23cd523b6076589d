use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::{SchengenTripData, VisaQuery};
use super::itinerary::ItineraryRequest;
use super::service::{AdvisorServiceError, VisaAdvisorService};

/// Router builder exposing the visa lookup endpoints.
pub fn visa_router(service: Arc<VisaAdvisorService>) -> Router {
    Router::new()
        .route("/api/v1/visa/requirements", post(requirements_handler))
        .route("/api/v1/visa/itinerary", post(itinerary_handler))
        .route("/api/v1/visa/consulate", post(consulate_handler))
        .route("/api/v1/countries", get(countries_handler))
        .route("/api/v1/countries/:code", get(country_handler))
        .with_state(service)
}

pub(crate) async fn requirements_handler(
    State(service): State<Arc<VisaAdvisorService>>,
    axum::Json(query): axum::Json<VisaQuery>,
) -> Response {
    let result = service.check(&query);
    (StatusCode::OK, axum::Json(result)).into_response()
}

pub(crate) async fn itinerary_handler(
    State(service): State<Arc<VisaAdvisorService>>,
    axum::Json(request): axum::Json<ItineraryRequest>,
) -> Response {
    let assessment = service.check_itinerary(&request);
    (StatusCode::OK, axum::Json(assessment)).into_response()
}

pub(crate) async fn consulate_handler(
    State(service): State<Arc<VisaAdvisorService>>,
    axum::Json(trip): axum::Json<SchengenTripData>,
) -> Response {
    match service.recommend_consulate(&trip) {
        Ok(recommendation) => (StatusCode::OK, axum::Json(recommendation)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn countries_handler(
    State(service): State<Arc<VisaAdvisorService>>,
) -> Response {
    (StatusCode::OK, axum::Json(service.countries())).into_response()
}

pub(crate) async fn country_handler(
    State(service): State<Arc<VisaAdvisorService>>,
    Path(code): Path<String>,
) -> Response {
    match service.country(&code) {
        Ok(profile) => (StatusCode::OK, axum::Json(profile)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: AdvisorServiceError) -> Response {
    let status = match error {
        AdvisorServiceError::UnknownCountry(_) => StatusCode::NOT_FOUND,
        AdvisorServiceError::Consulate(_) => StatusCode::UNPROCESSABLE_ENTITY,
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
