use super::common::*;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::visa::router::{consulate_handler, country_handler};

fn post_json(uri: &str, body: Value) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::post(uri)
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(body.to_string()))
        .expect("request builds")
}

#[tokio::test]
async fn requirements_route_returns_visa_result() {
    let response = router()
        .oneshot(post_json(
            "/api/v1/visa/requirements",
            json!({
                "nationality": "Nigeria",
                "destination": "germany",
                "purpose": "tourism",
                "duration": "single-short"
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("required").and_then(Value::as_bool), Some(true));
    assert_eq!(payload.get("is_schengen").and_then(Value::as_bool), Some(true));
    assert_eq!(
        payload.get("type").and_then(Value::as_str),
        Some("schengen-visa")
    );
    assert_eq!(
        payload.get("requirement").and_then(Value::as_str),
        Some("required")
    );
}

#[tokio::test]
async fn requirements_route_rejects_unknown_purpose() {
    let response = router()
        .oneshot(post_json(
            "/api/v1/visa/requirements",
            json!({
                "nationality": "Nigeria",
                "destination": "germany",
                "purpose": "pilgrimage",
                "duration": "single-short"
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn itinerary_route_aggregates_destinations() {
    let response = router()
        .oneshot(post_json(
            "/api/v1/visa/itinerary",
            json!({
                "nationality": "India",
                "destinations": ["Canada", "France"],
                "purposes": ["tourism"]
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload
            .get("destinations")
            .and_then(Value::as_array)
            .map(Vec::len),
        Some(2)
    );
    assert_eq!(
        payload.get("has_visa_required").and_then(Value::as_bool),
        Some(true)
    );
    assert_eq!(
        payload.get("has_unknown").and_then(Value::as_bool),
        Some(true)
    );
    assert!(payload
        .get("transit_warnings")
        .and_then(Value::as_array)
        .is_some_and(|warnings| !warnings.is_empty()));
}

#[tokio::test]
async fn consulate_route_returns_recommendation() {
    let response = router()
        .oneshot(post_json(
            "/api/v1/visa/consulate",
            json!({
                "selected_countries": ["france", "germany"],
                "nights_distribution": { "france": 5, "germany": 5 },
                "entry_point": "france",
                "purpose": "tourism"
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload
            .pointer("/primary_consulate/country")
            .and_then(Value::as_str),
        Some("FR")
    );
    assert_eq!(
        payload
            .get("alternatives")
            .and_then(Value::as_array)
            .map(Vec::len),
        Some(2)
    );
    assert_eq!(
        payload
            .get("expert_consultation_needed")
            .and_then(Value::as_bool),
        Some(false)
    );
}

#[tokio::test]
async fn consulate_handler_rejects_missing_entry_point() {
    let trip = trip(
        &["france", "italy"],
        &[("france", 2), ("italy", 2)],
        "",
        crate::visa::domain::TravelPurpose::Tourism,
    );

    let response = consulate_handler(State(Arc::new(service())), axum::Json(trip)).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload
        .get("error")
        .and_then(Value::as_str)
        .is_some_and(|message| message.contains("entry point")));
}

#[tokio::test]
async fn country_handler_returns_profile_with_embassy() {
    let response = country_handler(
        State(Arc::new(service())),
        Path("germany".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload.pointer("/country/code").and_then(Value::as_str),
        Some("DE")
    );
    assert_eq!(
        payload.pointer("/country/is_schengen").and_then(Value::as_bool),
        Some(true)
    );
    assert!(payload.pointer("/embassy/booking_url").is_some());
}

#[tokio::test]
async fn country_route_returns_not_found_for_unknown_code() {
    let response = router()
        .oneshot(
            axum::http::Request::get("/api/v1/countries/XX")
                .body(axum::body::Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn countries_route_lists_catalog() {
    let response = router()
        .oneshot(
            axum::http::Request::get("/api/v1/countries")
                .body(axum::body::Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("version").and_then(Value::as_str), Some("2025.2"));
    assert!(payload
        .get("countries")
        .and_then(Value::as_array)
        .is_some_and(|countries| countries.len() > 29));
}
