//! Request/response type definitions and application state

use crate::snapshot::SnapshotStore;
use crate::utc_now_iso;
use flightcheck_core::{AirspaceSummary, MissionType, TfrSummary, WeatherSummary};
use flightcheck_providers::{AirspaceClient, NwsClient, TfrClient};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub airspace: Arc<AirspaceClient>,
    pub weather: Arc<NwsClient>,
    pub tfr: Arc<TfrClient>,
    pub snapshots: Arc<dyn SnapshotStore>,
}

impl AppState {
    /// State with default upstream clients and the given snapshot store
    pub fn new(snapshots: Arc<dyn SnapshotStore>) -> Self {
        Self {
            airspace: Arc::new(AirspaceClient::new()),
            weather: Arc::new(NwsClient::new()),
            tfr: Arc::new(TfrClient::new()),
            snapshots,
        }
    }
}

/// Provenance metadata attached to every tool response
#[derive(Debug, Clone, Serialize)]
pub struct ToolMeta {
    pub data_timestamp_utc: String,
    pub sources: Vec<String>,
    pub coverage: BTreeMap<String, String>,
    pub errors: Vec<String>,
    pub request_id: Option<String>,
}

impl ToolMeta {
    pub fn new(sources: &[&str], request_id: &str) -> Self {
        Self {
            data_timestamp_utc: utc_now_iso(),
            sources: sources.iter().map(|s| s.to_string()).collect(),
            coverage: BTreeMap::new(),
            errors: Vec::new(),
            request_id: Some(request_id.to_string()),
        }
    }

    pub fn with_coverage(mut self, key: &str, value: impl Into<String>) -> Self {
        self.coverage.insert(key.to_string(), value.into());
        self
    }

    pub fn with_errors(mut self, errors: Vec<String>) -> Self {
        self.errors = errors;
        self
    }
}

/// Standard tool response envelope
#[derive(Debug, Clone, Serialize)]
pub struct ToolResponse<T: Serialize> {
    pub result: T,
    pub meta: ToolMeta,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: String,
    pub timestamp_utc: String,
}

/// Version response
#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub service: String,
    pub version: String,
    pub git_commit: String,
    pub timestamp_utc: String,
}

/// Airspace check request
#[derive(Debug, Deserialize)]
pub struct CheckAirspaceInput {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude_ft_agl: f64,
    /// ISO 8601 datetime for the planned flight
    #[serde(default)]
    pub flight_datetime: Option<String>,
}

/// Weather analysis request
#[derive(Debug, Deserialize)]
pub struct AnalyzeWeatherInput {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub flight_datetime: Option<String>,
}

/// TFR check request
#[derive(Debug, Deserialize)]
pub struct CheckTfrsInput {
    pub latitude: f64,
    pub longitude: f64,
    /// Search radius in nautical miles (accepted but not applied yet;
    /// relevance is state-level only)
    #[serde(default = "default_radius_nm")]
    pub radius_nm: f64,
    #[serde(default)]
    pub flight_datetime: Option<String>,
}

fn default_radius_nm() -> f64 {
    5.0
}

/// Coordinates embedded in the airspace payload, used for snapshot logging
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

/// Airspace input to the checklist tool: the engine summary plus the
/// context fields carried along for logging
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AirspaceData {
    #[serde(flatten)]
    pub summary: AirspaceSummary,

    #[serde(default)]
    pub coordinates: Coordinates,

    #[serde(default)]
    pub altitude_ft_agl: Option<f64>,
}

/// Weather input to the checklist tool. The compliance block is what the
/// engine consumes; anything else in the payload is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherData {
    #[serde(default)]
    pub part107_compliance: Option<WeatherSummary>,
}

/// Checklist generation request
#[derive(Debug, Deserialize)]
pub struct GenerateChecklistInput {
    pub mission_type: MissionType,
    #[serde(default)]
    pub airspace_data: AirspaceData,
    #[serde(default)]
    pub weather_data: WeatherData,
    #[serde(default)]
    pub tfr_data: TfrSummary,
}

/// LAANC deep-link request
#[derive(Debug, Deserialize)]
pub struct GenerateLaancLinksInput {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude_ft_agl: f64,
    pub start_datetime: String,
    pub duration_minutes: u32,
    #[serde(default)]
    pub operation_description: Option<String>,
}
