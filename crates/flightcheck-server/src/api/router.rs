//! Router creation and configuration
//!
//! Creates the Axum router for the tool endpoints.

use super::handlers::*;
use super::types::AppState;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Create the tool API router with a restrictive CORS allowlist
pub fn create_router(state: AppState, allowed_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin, "skipping unparseable CORS origin");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/healthz", get(healthz))
        .route("/version", get(version))
        .route("/tools/check_airspace", post(check_airspace))
        .route("/tools/analyze_weather_conditions", post(analyze_weather_conditions))
        .route("/tools/check_tfrs", post(check_tfrs))
        .route("/tools/generate_preflight_checklist", post(generate_preflight_checklist))
        .route("/tools/generate_laanc_deep_link", post(generate_laanc_deep_link))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
