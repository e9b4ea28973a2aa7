//! FAA airspace adapter
//!
//! Queries the FAA UAS Data Delivery System (ArcGIS) Class Airspace and
//! UAS Facility Map (UASFM) layers for a point, then walks an ordered,
//! conservative fallback ladder when the polygons are inconclusive:
//! UASFM presence, "Mode C" name hints, and finally airport proximity.

use crate::airports::classify_by_proximity;
use crate::error::Result;
use flightcheck_core::{AirspaceSummary, TriState};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const CLASS_AIRSPACE_LAYER_URL: &str =
    "https://services6.arcgis.com/ssFJjBXIUyZDrSYZ/arcgis/rest/services/Class_Airspace/FeatureServer/0/query";
const UASFM_LAYER_URL: &str =
    "https://services6.arcgis.com/ssFJjBXIUyZDrSYZ/arcgis/rest/services/FAA_UAS_FacilityMap_Data_V5/FeatureServer/0/query";

const CLASS_OUT_FIELDS: &str = "CLASS,NAME,IDENT,ICAO_ID,LOWER_DESC,LOWER_VAL,LOWER_UOM,LOWER_CODE,UPPER_DESC,UPPER_VAL,UPPER_UOM,UPPER_CODE";
const UASFM_OUT_FIELDS: &str = "CEILING,CEILING_FT,MAX_ALT,MAX_ALT_FT,UNIT,MAP_EFF,LAST_EDIT,ARPT_COUNT,APT1_NAME,APT1_ICAO,APT1_LAANC,APT2_LAANC,APT3_LAANC,APT4_LAANC,APT5_LAANC,REGION";

/// Analyzed airspace state for a point and planned altitude
#[derive(Debug, Clone, Serialize)]
pub struct AirspaceResult {
    pub airspace_class: String,
    pub airspace_name: Option<String>,
    pub laanc_required: TriState,
    pub laanc_available: TriState,
    pub max_altitude_ft: Option<i64>,
    pub facility: Option<String>,
    pub restrictions: Vec<String>,
    pub debug: AirspaceDebug,
}

impl AirspaceResult {
    /// Reduce to the summary record the decision engine consumes
    pub fn summary(&self) -> AirspaceSummary {
        AirspaceSummary {
            airspace_class: Some(self.airspace_class.clone()),
            laanc_required: self.laanc_required,
            laanc_available: self.laanc_available,
        }
    }
}

/// Lookup provenance, surfaced in response metadata
#[derive(Debug, Clone, Default, Serialize)]
pub struct AirspaceDebug {
    pub class_features_count: usize,
    pub uasfm_features_count: usize,
    pub class_letter_found: bool,
    pub fallback_used: String,
    pub uasfm_query_mode: String,
    pub airport_proximity_distance_nm: Option<f64>,
    pub airport_proximity_facility: Option<String>,
}

/// FAA ArcGIS layer client
pub struct AirspaceClient {
    client: reqwest::Client,
    class_layer_url: String,
    uasfm_layer_url: String,
}

impl AirspaceClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent(crate::USER_AGENT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            class_layer_url: CLASS_AIRSPACE_LAYER_URL.to_string(),
            uasfm_layer_url: UASFM_LAYER_URL.to_string(),
        }
    }

    /// Point the client at different layer URLs (test servers)
    pub fn with_layer_urls(
        mut self,
        class_layer_url: impl Into<String>,
        uasfm_layer_url: impl Into<String>,
    ) -> Self {
        self.class_layer_url = class_layer_url.into();
        self.uasfm_layer_url = uasfm_layer_url.into();
        self
    }

    async fn arcgis_query(
        &self,
        url: &str,
        latitude: f64,
        longitude: f64,
        out_fields: &str,
        distance_m: Option<u32>,
    ) -> Result<Value> {
        let geometry = format!(
            r#"{{"x":{},"y":{},"spatialReference":{{"wkid":4326}}}}"#,
            longitude, latitude
        );
        let mut params: Vec<(&str, String)> = vec![
            ("f", "json".to_string()),
            ("where", "1=1".to_string()),
            ("geometryType", "esriGeometryPoint".to_string()),
            ("geometry", geometry),
            ("inSR", "4326".to_string()),
            ("outSR", "4326".to_string()),
            ("spatialRel", "esriSpatialRelIntersects".to_string()),
            ("outFields", out_fields.to_string()),
            ("returnGeometry", "false".to_string()),
            ("resultRecordCount", "10".to_string()),
        ];
        if let Some(distance) = distance_m {
            params.push(("distance", distance.to_string()));
            params.push(("units", "esriSRUnit_Meter".to_string()));
        }

        let payload = self
            .client
            .get(url)
            .query(&params)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(payload)
    }

    /// Analyze the airspace at a point for a planned altitude.
    ///
    /// Both layer queries are best-effort: ladder steps that cannot run
    /// leave their fields unknown rather than failing the analysis.
    pub async fn analyze_airspace(
        &self,
        latitude: f64,
        longitude: f64,
        altitude_ft_agl: f64,
    ) -> Result<AirspaceResult> {
        let mut debug = AirspaceDebug {
            fallback_used: "none".to_string(),
            uasfm_query_mode: "intersects".to_string(),
            ..Default::default()
        };

        // 1) Class Airspace polygons
        let class_resp = self
            .arcgis_query(
                &self.class_layer_url,
                latitude,
                longitude,
                CLASS_OUT_FIELDS,
                None,
            )
            .await?;
        let class_features = features(&class_resp);
        debug.class_features_count = class_features.len();

        let class_attrs = pick_best_feature(&class_features)
            .map(|f| f["attributes"].clone())
            .unwrap_or(Value::Null);

        let mut class_letter = normalize_class_letter(class_attrs["CLASS"].as_str());
        debug.class_letter_found = class_letter.is_some();
        let airspace_name = class_attrs["NAME"].as_str().map(String::from);

        // 2) UASFM grid, with a nearby-distance retry when intersects is empty
        let mut uasfm_resp = self
            .arcgis_query(
                &self.uasfm_layer_url,
                latitude,
                longitude,
                UASFM_OUT_FIELDS,
                None,
            )
            .await?;
        let mut uasfm_features = features(&uasfm_resp);
        if uasfm_features.is_empty() {
            debug.uasfm_query_mode = "distance_2000m".to_string();
            uasfm_resp = self
                .arcgis_query(
                    &self.uasfm_layer_url,
                    latitude,
                    longitude,
                    UASFM_OUT_FIELDS,
                    Some(2000),
                )
                .await?;
            uasfm_features = features(&uasfm_resp);
        }
        debug.uasfm_features_count = uasfm_features.len();

        let uasfm_feature_exists = !uasfm_features.is_empty();
        let uasfm_attrs = pick_best_feature(&uasfm_features)
            .map(|f| f["attributes"].clone())
            .unwrap_or(Value::Null);

        let mut ceiling = extract_uasfm_ceiling(&uasfm_attrs);
        let laanc_available = extract_laanc_available(&uasfm_attrs);
        let mut facility = extract_primary_facility(&uasfm_attrs).or_else(|| airspace_name.clone());

        // 3) LAANC requirement from the class letter
        let mut laanc_required = match class_letter {
            Some('B') | Some('C') | Some('D') => TriState::Yes,
            Some('E') => TriState::from(Some(is_surface_area(&class_attrs))),
            Some('G') => TriState::No,
            _ => TriState::Unknown,
        };

        // 4) Ordered conservative fallbacks
        if laanc_required == TriState::Unknown && uasfm_feature_exists {
            laanc_required = TriState::Yes;
            debug.fallback_used = "uasfm_feature_or_nearby".to_string();
        }
        if laanc_required == TriState::Unknown && name_implies_controlled(airspace_name.as_deref()) {
            laanc_required = TriState::Yes;
            debug.fallback_used = "mode_c_name".to_string();
        }

        let mut proximity_class: Option<String> = None;
        if laanc_required == TriState::Unknown || class_letter.is_none() {
            let proximity = classify_by_proximity(latitude, longitude, altitude_ft_agl);
            debug!(?proximity, "airport proximity fallback consulted");

            if class_letter.is_none() {
                class_letter = proximity
                    .airspace_class
                    .strip_prefix("Class ")
                    .and_then(|s| s.chars().next());
                proximity_class = Some(proximity.airspace_class.clone());
            }
            if laanc_required == TriState::Unknown {
                laanc_required = proximity.laanc_required;
            }
            if ceiling.is_none() {
                ceiling = proximity.ceiling_ft.map(i64::from);
            }
            if facility.is_none() {
                facility = Some(proximity.facility.clone());
            }
            debug.fallback_used = "airport_proximity".to_string();
            debug.airport_proximity_distance_nm =
                proximity.distance_nm.map(|d| (d * 100.0).round() / 100.0);
            debug.airport_proximity_facility = Some(proximity.facility);
        }

        // 5) Display class string
        let airspace_class = match (class_letter, proximity_class) {
            (Some(letter), _) => format!("Class {}", letter),
            (None, Some(label)) => label,
            (None, None) if laanc_required == TriState::Yes => "Controlled (heuristic)".to_string(),
            (None, None) => "Unknown".to_string(),
        };

        // 6) Operator-facing restriction notes
        let mut restrictions = Vec::new();
        match laanc_required {
            TriState::Yes => {
                restrictions.push(
                    "Controlled airspace indicated: authorization required prior to flight (often via LAANC)."
                        .to_string(),
                );
                if let Some(name) = &airspace_name {
                    restrictions.push(format!("Airspace context name: {}.", name));
                }
                match ceiling {
                    Some(ceiling_ft) => {
                        restrictions.push(format!(
                            "UAS Facility Map (UASFM) ceiling guideline: {} ft AGL.",
                            ceiling_ft
                        ));
                        if altitude_ft_agl > ceiling_ft as f64 {
                            restrictions.push(
                                "Planned altitude exceeds UASFM value; approval may require additional coordination (not instant)."
                                    .to_string(),
                            );
                        }
                    }
                    None => restrictions.push(
                        "UASFM ceiling not available; verify limits in an FAA-approved provider app."
                            .to_string(),
                    ),
                }
            }
            TriState::No => restrictions.push(
                "No controlled airspace indicated by this checker; still verify local restrictions and TFRs."
                    .to_string(),
            ),
            TriState::Unknown => restrictions.push(
                "Airspace could not be determined confidently; verify in an FAA-approved provider app."
                    .to_string(),
            ),
        }

        Ok(AirspaceResult {
            airspace_class,
            airspace_name,
            laanc_required,
            laanc_available,
            max_altitude_ft: ceiling,
            facility,
            restrictions,
            debug,
        })
    }
}

impl Default for AirspaceClient {
    fn default() -> Self {
        Self::new()
    }
}

fn features(resp: &Value) -> Vec<Value> {
    resp["features"].as_array().cloned().unwrap_or_default()
}

/// Prefer a named feature when several polygons intersect
fn pick_best_feature(features: &[Value]) -> Option<&Value> {
    if features.len() <= 1 {
        return features.first();
    }
    features
        .iter()
        .find(|f| f["attributes"]["NAME"].is_string())
        .or_else(|| features.first())
}

/// Reduce a CLASS attribute to a single letter in B/C/D/E/G
fn normalize_class_letter(value: Option<&str>) -> Option<char> {
    let v = value?.trim().to_uppercase();
    if v.len() == 1 {
        let letter = v.chars().next()?;
        if matches!(letter, 'B' | 'C' | 'D' | 'E' | 'G') {
            return Some(letter);
        }
        return None;
    }
    for letter in ['B', 'C', 'D', 'E', 'G'] {
        if v.contains(&format!("CLASS {}", letter)) || v.ends_with(&format!(" {}", letter)) {
            return Some(letter);
        }
    }
    None
}

/// Class E matters only when it starts at the surface
fn is_surface_area(attrs: &Value) -> bool {
    for key in ["LOWER_DESC", "LOWER_CODE"] {
        if let Some(v) = attrs[key].as_str() {
            if v.to_uppercase().contains("SFC") {
                return true;
            }
        }
    }
    attrs["LOWER_VAL"].as_f64() == Some(0.0)
}

/// UASFM grid ceiling. Values over 1000 ft are discarded as bad data
/// (aviation altitudes, not UAS grid ceilings).
fn extract_uasfm_ceiling(attrs: &Value) -> Option<i64> {
    for key in ["CEILING", "CEILING_FT", "MAX_ALT", "MAX_ALT_FT"] {
        if let Some(ceiling) = attrs[key].as_f64() {
            let ceiling = ceiling as i64;
            if ceiling > 1000 {
                return None;
            }
            return Some(ceiling);
        }
    }
    None
}

/// LAANC availability from the per-airport APTn_LAANC flags
fn extract_laanc_available(attrs: &Value) -> TriState {
    let mut found_any = false;
    let mut any_ready = false;
    for i in 1..=5 {
        let val = &attrs[format!("APT{}_LAANC", i)];
        if val.is_null() {
            continue;
        }
        found_any = true;
        if val.as_i64() == Some(1) || val.as_str().map(str::trim) == Some("1") {
            any_ready = true;
        }
    }
    if found_any {
        TriState::from(Some(any_ready))
    } else {
        TriState::Unknown
    }
}

fn extract_primary_facility(attrs: &Value) -> Option<String> {
    for key in ["APT1_NAME", "APT1_ICAO"] {
        if let Some(name) = attrs[key].as_str() {
            let name = name.trim();
            if !name.is_empty() {
                return Some(name.to_string());
            }
        }
    }
    None
}

/// A "Mode C" veil name is a strong hint of controlled airspace
fn name_implies_controlled(airspace_name: Option<&str>) -> bool {
    let Some(name) = airspace_name else {
        return false;
    };
    let n = name.to_uppercase();
    n.contains("MODE C") || n.contains("MODE-C") || n.contains("MODEC")
}
