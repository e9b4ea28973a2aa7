//! NWS weather adapter
//!
//! Fetches the most complete recent observation near a coordinate and
//! booleanizes it against Part 107 minimums. The thresholds live here,
//! not in the decision engine: the engine only ever sees the resulting
//! tri-state fields.

use crate::error::{ProviderError, Result};
use flightcheck_core::{TriState, WeatherStatus, WeatherSummary};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const NWS_BASE: &str = "https://api.weather.gov";

/// Stations to probe before settling for the best observation seen
const MAX_STATION_CANDIDATES: usize = 8;

/// Completeness score at which probing stops early
const GOOD_ENOUGH_SCORE: i32 = 8;

/// Part 107 minimum visibility in statute miles
const MIN_VISIBILITY_SM: f64 = 3.0;

/// Conservative minimum usable cloud ceiling in feet AGL
const MIN_CLOUD_CEILING_FT: f64 = 500.0;

/// Parsed surface observation with aviation-relevant fields
#[derive(Debug, Clone, Default, Serialize)]
pub struct Observation {
    pub wind_speed_kt: Option<f64>,
    pub wind_gust_kt: Option<f64>,
    pub wind_direction_deg: Option<f64>,
    pub visibility_sm: Option<f64>,
    pub cloud_ceiling_ft: Option<f64>,
    pub temperature_f: Option<f64>,
    pub conditions: String,
    pub timestamp: Option<String>,
    pub station_id: String,
}

/// Fetch provenance for an observation lookup
#[derive(Debug, Clone, Default, Serialize)]
pub struct ObservationMeta {
    pub stations_attempted: Vec<String>,
    pub station_errors: Vec<String>,
    pub selected_station_id: String,
    pub selected_score: i32,
}

/// NWS API client
pub struct NwsClient {
    client: reqwest::Client,
    base_url: String,
}

impl NwsClient {
    pub fn new() -> Self {
        Self::with_base_url(NWS_BASE)
    }

    /// Point the client at a different base URL (test servers)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(crate::USER_AGENT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Fetch the best available observation near a coordinate.
    ///
    /// Walks the nearest observation stations and keeps the observation
    /// with the highest completeness score, stopping early once coverage
    /// is good enough.
    pub async fn fetch_latest_observation(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<(Observation, ObservationMeta)> {
        let points_url = format!("{}/points/{:.4},{:.4}", self.base_url, latitude, longitude);
        let points: Value = self
            .client
            .get(&points_url)
            .header("Accept", "application/geo+json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let stations_url = points["properties"]["observationStations"]
            .as_str()
            .ok_or_else(|| {
                ProviderError::Decode("NWS points response missing observationStations".into())
            })?
            .to_string();

        let stations: Value = self
            .client
            .get(&stations_url)
            .header("Accept", "application/geo+json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let features = stations["features"].as_array().cloned().unwrap_or_default();
        if features.is_empty() {
            return Err(ProviderError::NoData(
                "No observation stations returned by NWS for this location".into(),
            ));
        }

        let mut meta = ObservationMeta::default();
        let mut best: Option<Observation> = None;
        let mut best_score = -1;

        for feature in features.iter().take(MAX_STATION_CANDIDATES) {
            let Some(station_id) = feature["properties"]["stationIdentifier"].as_str() else {
                continue;
            };
            meta.stations_attempted.push(station_id.to_string());

            match self.fetch_station_observation(station_id).await {
                Ok(observation) => {
                    let score = score_observation(&observation);
                    debug!(station_id, score, "probed NWS station");
                    if score > best_score {
                        best_score = score;
                        best = Some(observation);
                    }
                    if best_score >= GOOD_ENOUGH_SCORE {
                        break;
                    }
                }
                Err(e) => meta.station_errors.push(format!("{}: {}", station_id, e)),
            }
        }

        let best = best.ok_or_else(|| {
            ProviderError::NoData(
                "Unable to retrieve a usable observation from nearby NWS stations".into(),
            )
        })?;
        meta.selected_station_id = best.station_id.clone();
        meta.selected_score = best_score;
        Ok((best, meta))
    }

    async fn fetch_station_observation(&self, station_id: &str) -> Result<Observation> {
        let url = format!(
            "{}/stations/{}/observations/latest",
            self.base_url, station_id
        );
        let payload: Value = self
            .client
            .get(&url)
            .header("Accept", "application/geo+json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(parse_observation(&payload, station_id))
    }
}

impl Default for NwsClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Reduce a raw NWS observation payload to the fields we care about
fn parse_observation(payload: &Value, station_id: &str) -> Observation {
    let props = &payload["properties"];

    let quantity = |key: &str| props[key]["value"].as_f64();

    let cloud_ceiling_ft = props["cloudLayers"]
        .as_array()
        .map(|layers| {
            layers
                .iter()
                .filter_map(|layer| layer["base"]["value"].as_f64())
                .fold(f64::INFINITY, f64::min)
        })
        .filter(|lowest| lowest.is_finite())
        .map(meters_to_feet);

    Observation {
        wind_speed_kt: quantity("windSpeed").map(mps_to_knots).map(round1),
        wind_gust_kt: quantity("windGust").map(mps_to_knots).map(round1),
        wind_direction_deg: quantity("windDirection"),
        visibility_sm: quantity("visibility").map(meters_to_miles).map(round2),
        cloud_ceiling_ft: cloud_ceiling_ft.map(f64::round),
        temperature_f: quantity("temperature").map(celsius_to_fahrenheit).map(round1),
        conditions: props["textDescription"].as_str().unwrap_or("").to_string(),
        timestamp: props["timestamp"].as_str().map(String::from),
        station_id: station_id.to_string(),
    }
}

/// Prefer stations with more complete aviation-relevant fields
fn score_observation(obs: &Observation) -> i32 {
    let mut score = 0;
    if obs.visibility_sm.is_some() {
        score += 3;
    }
    if obs.wind_speed_kt.is_some() {
        score += 2;
    }
    if obs.wind_direction_deg.is_some() {
        score += 1;
    }
    if obs.wind_gust_kt.is_some() {
        score += 1;
    }
    if obs.cloud_ceiling_ft.is_some() {
        score += 2;
    }
    if obs.temperature_f.is_some() {
        score += 1;
    }
    if !obs.conditions.trim().is_empty() {
        score += 1;
    }
    if obs.timestamp.is_some() {
        score += 1;
    }
    score
}

/// Booleanize an observation against Part 107 minimums.
///
/// Missing inputs yield `Unknown`, never a guess. Cloud clearance is
/// context-dependent; the ceiling heuristic only applies when a ceiling
/// was actually reported.
pub fn part107_assessment(
    visibility_sm: Option<f64>,
    cloud_ceiling_ft: Option<f64>,
) -> WeatherSummary {
    let visibility_ok = TriState::from(visibility_sm.map(|v| v >= MIN_VISIBILITY_SM));
    let cloud_clearance_ok = TriState::from(cloud_ceiling_ft.map(|c| c >= MIN_CLOUD_CEILING_FT));

    // An unreported ceiling with confirmed visibility still reads as good;
    // clear skies produce no cloud layers at all.
    let overall_status = if visibility_ok == TriState::No || cloud_clearance_ok == TriState::No {
        WeatherStatus::Poor
    } else if visibility_ok == TriState::Yes {
        WeatherStatus::Good
    } else {
        WeatherStatus::Unknown
    };

    WeatherSummary {
        visibility_ok,
        cloud_clearance_ok,
        overall_status,
    }
}

fn mps_to_knots(mps: f64) -> f64 {
    mps * 1.9438444924406
}

fn meters_to_miles(m: f64) -> f64 {
    m / 1609.344
}

fn celsius_to_fahrenheit(c: f64) -> f64 {
    c * 9.0 / 5.0 + 32.0
}

fn meters_to_feet(m: f64) -> f64 {
    m * 3.280839895
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
