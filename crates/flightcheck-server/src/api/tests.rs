//! Tests for the tool API

#![cfg(test)]

use super::router::create_router;
use super::types::AppState;
use crate::snapshot::NoopSnapshotStore;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use flightcheck_providers::{AirspaceClient, NwsClient, TfrClient};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn test_router() -> Router {
    let state = AppState::new(Arc::new(NoopSnapshotStore));
    create_router(state, &["http://localhost:3000".to_string()])
}

/// Router whose upstream clients point at a closed local port, so every
/// provider fetch fails immediately
fn unreachable_upstream_router() -> Router {
    let dead = "http://127.0.0.1:9";
    let state = AppState {
        airspace: Arc::new(AirspaceClient::new().with_layer_urls(dead, dead)),
        weather: Arc::new(NwsClient::with_base_url(dead)),
        tfr: Arc::new(TfrClient::new().with_urls(dead, dead)),
        snapshots: Arc::new(NoopSnapshotStore),
    };
    create_router(state, &["http://localhost:3000".to_string()])
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_healthz() {
    let response = test_router()
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["ok"], json!(true));
    assert!(body["service"].as_str().unwrap().contains("FlightCheck"));
}

#[tokio::test]
async fn test_version_reports_package_version() {
    let response = test_router()
        .oneshot(Request::builder().uri("/version").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["version"], json!(env!("CARGO_PKG_VERSION")));
    assert!(body["git_commit"].is_string());
}

#[tokio::test]
async fn test_checklist_all_clear_is_go() {
    let payload = json!({
        "mission_type": "recreational",
        "airspace_data": {
            "airspace_class": "Class G",
            "laanc_required": false,
            "laanc_available": null
        },
        "weather_data": {
            "part107_compliance": {
                "visibility_ok": true,
                "cloud_clearance_ok": true,
                "overall_status": "GOOD"
            }
        },
        "tfr_data": {"status": "CLEAR", "tfr_count": 0}
    });

    let response = test_router()
        .oneshot(post_json("/tools/generate_preflight_checklist", &payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["result"]["overall_status"], json!("GO"));
    assert_eq!(body["meta"]["coverage"]["snapshot"], json!("skipped_or_failed"));
}

#[tokio::test]
async fn test_checklist_empty_inputs_is_insufficient_data() {
    let payload = json!({"mission_type": "part107_commercial"});

    let response = test_router()
        .oneshot(post_json("/tools/generate_preflight_checklist", &payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["result"]["overall_status"], json!("INSUFFICIENT_DATA"));
}

#[tokio::test]
async fn test_checklist_active_tfr_is_no_go() {
    let payload = json!({
        "mission_type": "part107_commercial",
        "airspace_data": {
            "airspace_class": "Class G",
            "laanc_required": false,
            "laanc_available": null
        },
        "weather_data": {
            "part107_compliance": {
                "visibility_ok": true,
                "cloud_clearance_ok": true,
                "overall_status": "GOOD"
            }
        },
        "tfr_data": {"status": "DO_NOT_FLY", "tfr_count": 2}
    });

    let response = test_router()
        .oneshot(post_json("/tools/generate_preflight_checklist", &payload))
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["result"]["overall_status"], json!("NO_GO"));
}

#[tokio::test]
async fn test_checklist_laanc_required_but_unavailable_is_no_go() {
    let payload = json!({
        "mission_type": "part107_commercial",
        "airspace_data": {
            "airspace_class": "Class B",
            "laanc_required": true,
            "laanc_available": false
        },
        "weather_data": {
            "part107_compliance": {
                "visibility_ok": true,
                "cloud_clearance_ok": true,
                "overall_status": "GOOD"
            }
        },
        "tfr_data": {"status": "CLEAR", "tfr_count": 0}
    });

    let response = test_router()
        .oneshot(post_json("/tools/generate_preflight_checklist", &payload))
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["result"]["overall_status"], json!("NO_GO"));
}

#[tokio::test]
async fn test_checklist_invalid_json_is_400() {
    let request = Request::builder()
        .method("POST")
        .uri("/tools/generate_preflight_checklist")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = test_router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["status"], json!(400));
    assert_eq!(body["result"]["status"], json!("ERROR"));
    assert!(body["result"]["message"].is_string());
}

#[tokio::test]
async fn test_checklist_missing_mission_type_is_400() {
    let payload = json!({"airspace_data": {"airspace_class": "Class G"}});

    let response = test_router()
        .oneshot(post_json("/tools/generate_preflight_checklist", &payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_laanc_deep_link_returns_official_links() {
    let payload = json!({
        "latitude": 40.7484,
        "longitude": -73.9857,
        "altitude_ft_agl": 200,
        "start_datetime": "2025-06-01T14:00:00Z",
        "duration_minutes": 45
    });

    let response = test_router()
        .oneshot(post_json("/tools/generate_laanc_deep_link", &payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    let links = body["result"]["official_links"].as_array().unwrap();
    assert_eq!(links.len(), 2);
    for link in links {
        assert!(link["url"].as_str().unwrap().contains("faa.gov"));
    }
    assert!(body["result"]["disclaimer"].as_str().unwrap().contains("Advisory only"));
}

#[tokio::test]
async fn test_check_airspace_absorbs_upstream_failure() {
    let payload = json!({"latitude": 47.6, "longitude": -122.3, "altitude_ft_agl": 200});

    let response = unreachable_upstream_router()
        .oneshot(post_json("/tools/check_airspace", &payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["result"]["status"], json!("UNKNOWN"));
    assert_eq!(body["result"]["laanc_required"], Value::Null);
    assert_eq!(body["result"]["laanc_available"], Value::Null);
    assert!(!body["meta"]["errors"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_analyze_weather_absorbs_upstream_failure() {
    let payload = json!({"latitude": 47.6, "longitude": -122.3});

    let response = unreachable_upstream_router()
        .oneshot(post_json("/tools/analyze_weather_conditions", &payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let compliance = &body["result"]["part107_compliance"];
    assert_eq!(compliance["visibility_ok"], Value::Null);
    assert_eq!(compliance["cloud_clearance_ok"], Value::Null);
    assert_eq!(compliance["overall_status"], json!("UNKNOWN"));
    assert!(!body["meta"]["errors"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_check_tfrs_absorbs_upstream_failure() {
    let payload = json!({"latitude": 47.6, "longitude": -122.3, "radius_nm": 5.0});

    let response = unreachable_upstream_router()
        .oneshot(post_json("/tools/check_tfrs", &payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["result"]["status"], json!("UNKNOWN"));
    assert_eq!(body["result"]["tfr_count"], json!(0));
    assert!(body["result"]["advisory"].as_str().unwrap().contains("tfr.faa.gov"));
    assert!(!body["meta"]["errors"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let response = test_router()
        .oneshot(Request::builder().uri("/tools/nonexistent").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
