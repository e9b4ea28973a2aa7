//! Tool endpoint handlers
//!
//! Each tool is best-effort: upstream failures are absorbed into
//! `UNKNOWN`-tagged fields plus an entry in `meta.errors`, so clients
//! always get a well-formed advisory envelope.

use super::extractors::JsonExtractor;
use super::types::*;
use crate::snapshot::AdvisorySnapshot;
use crate::{utc_now_iso, SERVICE_NAME};
use axum::{extract::State, Json};
use flightcheck_core::{decide_preflight, Decision, TriState, WeatherSummary};
use flightcheck_providers::tfr::filter_by_state;
use flightcheck_providers::weather::part107_assessment;
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

const AIRSPACE_SOURCES: [&str; 2] = [
    "FAA UAS Data Delivery System (ArcGIS) - Class_Airspace",
    "FAA UAS Data Delivery System (ArcGIS) - UAS Facility Map Data (UASFM)",
];
const WEATHER_SOURCES: [&str; 1] = ["NOAA/NWS API (api.weather.gov)"];
const TFR_SOURCES: [&str; 2] = [
    "FAA TFR (tfr.faa.gov export/json)",
    "NOAA/NWS points API (api.weather.gov)",
];

/// Health check endpoint
pub(super) async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        service: SERVICE_NAME.to_string(),
        timestamp_utc: utc_now_iso(),
    })
}

/// Version endpoint
pub(super) async fn version() -> Json<VersionResponse> {
    Json(VersionResponse {
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        git_commit: std::env::var("GIT_COMMIT").unwrap_or_else(|_| "unknown".to_string()),
        timestamp_utc: utc_now_iso(),
    })
}

/// Airspace lookup tool
pub(super) async fn check_airspace(
    State(state): State<AppState>,
    JsonExtractor(inp): JsonExtractor<CheckAirspaceInput>,
) -> Json<ToolResponse<Value>> {
    let request_id = Uuid::new_v4().to_string();

    match state
        .airspace
        .analyze_airspace(inp.latitude, inp.longitude, inp.altitude_ft_agl)
        .await
    {
        Ok(res) => {
            let status = match res.laanc_required {
                TriState::Yes => "AUTHORIZATION_REQUIRED",
                TriState::No => "CLEAR",
                TriState::Unknown => "UNKNOWN",
            };
            Json(ToolResponse {
                result: json!({
                    "airspace_class": res.airspace_class,
                    "facility": res.facility.clone().or(res.airspace_name.clone()),
                    "laanc_required": res.laanc_required,
                    "laanc_available": res.laanc_available,
                    "max_altitude_ft": res.max_altitude_ft,
                    "restrictions": res.restrictions,
                    "coordinates": {"lat": inp.latitude, "lon": inp.longitude},
                    "status": status,
                }),
                meta: ToolMeta::new(&AIRSPACE_SOURCES, &request_id)
                    .with_coverage("airspace", "best_effort"),
            })
        }
        Err(e) => {
            warn!(error = %e, "airspace lookup failed, returning unknowns");
            Json(ToolResponse {
                result: json!({
                    "airspace_class": "Unknown",
                    "facility": null,
                    "laanc_required": null,
                    "laanc_available": null,
                    "max_altitude_ft": null,
                    "restrictions": ["Airspace could not be determined; verify in an FAA-approved provider app."],
                    "coordinates": {"lat": inp.latitude, "lon": inp.longitude},
                    "status": "UNKNOWN",
                }),
                meta: ToolMeta::new(&AIRSPACE_SOURCES, &request_id)
                    .with_coverage("airspace", "unavailable")
                    .with_errors(vec![e.to_string()]),
            })
        }
    }
}

/// Weather analysis tool
pub(super) async fn analyze_weather_conditions(
    State(state): State<AppState>,
    JsonExtractor(inp): JsonExtractor<AnalyzeWeatherInput>,
) -> Json<ToolResponse<Value>> {
    let request_id = Uuid::new_v4().to_string();

    match state
        .weather
        .fetch_latest_observation(inp.latitude, inp.longitude)
        .await
    {
        Ok((obs, obs_meta)) => {
            let compliance = part107_assessment(obs.visibility_sm, obs.cloud_ceiling_ft);
            let station_id = obs.station_id.clone();
            Json(ToolResponse {
                result: json!({
                    "current_conditions": obs,
                    "part107_compliance": compliance,
                    "station_id": station_id,
                }),
                meta: ToolMeta::new(&WEATHER_SOURCES, &request_id)
                    .with_coverage("selected_station", obs_meta.selected_station_id.as_str())
                    .with_coverage(
                        "stations_attempted",
                        obs_meta.stations_attempted.join(","),
                    )
                    .with_errors(obs_meta.station_errors),
            })
        }
        Err(e) => {
            warn!(error = %e, "weather lookup failed, returning unknowns");
            Json(ToolResponse {
                result: json!({
                    "current_conditions": null,
                    "part107_compliance": WeatherSummary::default(),
                    "station_id": null,
                }),
                meta: ToolMeta::new(&WEATHER_SOURCES, &request_id)
                    .with_coverage("weather", "unavailable")
                    .with_errors(vec![e.to_string()]),
            })
        }
    }
}

/// TFR check tool. Relevance is a state-level filter only; no polygon
/// geometry is applied, and the status reflects that.
pub(super) async fn check_tfrs(
    State(state): State<AppState>,
    JsonExtractor(inp): JsonExtractor<CheckTfrsInput>,
) -> Json<ToolResponse<Value>> {
    let request_id = Uuid::new_v4().to_string();
    let mut errors: Vec<String> = Vec::new();

    let state_code = match state.tfr.determine_us_state(inp.latitude, inp.longitude).await {
        Ok(code) => Some(code),
        Err(e) => {
            errors.push(e.to_string());
            None
        }
    };

    let mut status = "UNKNOWN";
    let mut advisory =
        "TFR lookup failed. Verify manually at tfr.faa.gov before flight.".to_string();
    let mut matches = Vec::new();
    let mut meta = ToolMeta::new(&TFR_SOURCES, &request_id).with_coverage("tfr", "attempted");

    if let Some(code) = &state_code {
        match state.tfr.fetch_tfr_list().await {
            Ok(full_list) => {
                matches = filter_by_state(&full_list, code);
                status = if matches.is_empty() { "CLEAR" } else { "UNKNOWN" };
                advisory = "This check uses a state-level filter. Verify exact TFR boundaries and timing at tfr.faa.gov or an FAA-approved provider before flight."
                    .to_string();
                meta = meta
                    .with_coverage("tfr", "faa_export_json")
                    .with_coverage("relevance", "state_filter_only_no_geometry")
                    .with_coverage("radius_nm", "accepted_but_not_applied");
            }
            Err(e) => errors.push(e.to_string()),
        }
    }

    Json(ToolResponse {
        result: json!({
            "query": {
                "latitude": inp.latitude,
                "longitude": inp.longitude,
                "radius_nm_requested": inp.radius_nm,
                "flight_datetime": inp.flight_datetime,
            },
            "relevance_method": "STATE_FILTER_ONLY",
            "state": state_code,
            "active_tfrs": matches,
            "tfr_count": matches.len(),
            "status": status,
            "advisory": advisory,
        }),
        meta: meta.with_errors(errors),
    })
}

/// Checklist generation tool: runs the decision engine over the supplied
/// summaries, then logs a best-effort advisory snapshot.
pub(super) async fn generate_preflight_checklist(
    State(state): State<AppState>,
    JsonExtractor(inp): JsonExtractor<GenerateChecklistInput>,
) -> Json<ToolResponse<Decision>> {
    let request_id = Uuid::new_v4().to_string();

    let weather_summary = inp.weather_data.part107_compliance.clone().unwrap_or_default();
    let decision = decide_preflight(
        inp.mission_type,
        &inp.airspace_data.summary,
        &weather_summary,
        &inp.tfr_data,
    );
    info!(
        request_id = %request_id,
        status = %decision.overall_status,
        "preflight checklist generated"
    );

    // Best-effort snapshot; failures are logged and never break the
    // response.
    let mut snapshot_inserted = false;
    if let (Some(lat), Some(lon)) = (inp.airspace_data.coordinates.lat, inp.airspace_data.coordinates.lon) {
        if state.snapshots.is_enabled() {
            let snapshot = AdvisorySnapshot {
                request_id: request_id.clone(),
                user_id: None,
                timestamp_utc: chrono::Utc::now(),
                location_lat: lat,
                location_lon: lon,
                altitude_ft: inp.airspace_data.altitude_ft_agl,
                mission_type: inp.mission_type.to_string(),
                advisory_result: decision.overall_status.to_string(),
                full_response: json!({
                    "result": decision,
                    "inputs": {
                        "airspace_data": inp.airspace_data,
                        "weather_data": inp.weather_data,
                        "tfr_data": inp.tfr_data,
                    },
                }),
                tool_version: env!("CARGO_PKG_VERSION").to_string(),
                source: "web".to_string(),
            };
            match state.snapshots.insert(snapshot).await {
                Ok(_) => snapshot_inserted = true,
                Err(e) => warn!(error = %e, "failed to log advisory snapshot"),
            }
        }
    }

    Json(ToolResponse {
        result: decision,
        meta: ToolMeta::new(&["Internal rules engine (flightcheck-core)"], &request_id)
            .with_coverage("checklist", "generated")
            .with_coverage(
                "snapshot",
                if snapshot_inserted { "inserted" } else { "skipped_or_failed" },
            ),
    })
}

/// LAANC deep-link tool: official FAA links only, no provider names
pub(super) async fn generate_laanc_deep_link(
    JsonExtractor(inp): JsonExtractor<GenerateLaancLinksInput>,
) -> Json<ToolResponse<Value>> {
    let request_id = Uuid::new_v4().to_string();
    Json(ToolResponse {
        result: json!({
            "flight_summary": {
                "location": format!("{}°, {}°", inp.latitude, inp.longitude),
                "altitude": format!("{} feet AGL", inp.altitude_ft_agl),
                "start_time": inp.start_datetime,
                "duration": format!("{} minutes", inp.duration_minutes),
            },
            "official_links": [
                {"name": "FAA LAANC Program", "url": "https://www.faa.gov/uas/programs_partnerships/data_exchange/laanc"},
                {"name": "FAA DroneZone", "url": "https://faadronezone-access.faa.gov/"},
            ],
            "next_steps": [
                "1. Verify the location and altitude in an FAA-approved LAANC provider.",
                "2. Request authorization for the planned time window (if eligible).",
                "3. If LAANC is unavailable, submit a request via FAA DroneZone.",
            ],
            "disclaimer": "Advisory only; this does not submit any authorization request.",
        }),
        meta: ToolMeta::new(&["FAA public guidance (faa.gov)"], &request_id)
            .with_coverage("links", "official_only"),
    })
}
