//! Summary and decision types for the preflight engine
//!
//! Upstream adapters reduce their raw payloads to these records before the
//! engine ever sees them. Fields that an adapter could not determine are
//! explicit `Unknown` variants rather than missing keys, so the engine never
//! has to reason about absent data mid-evaluation.

use crate::error::CoreError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Tri-state boolean distinguishing confirmed-negative from unverifiable.
///
/// Serializes as `true` / `false` / `null` so the wire shape stays a plain
/// optional boolean. Anything that is not a boolean deserializes to
/// `Unknown` rather than failing the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriState {
    Yes,
    No,
    #[default]
    Unknown,
}

impl TriState {
    /// True when the value is confirmed either way
    pub fn is_known(&self) -> bool {
        !matches!(self, TriState::Unknown)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TriState::Yes => Some(true),
            TriState::No => Some(false),
            TriState::Unknown => None,
        }
    }
}

impl From<Option<bool>> for TriState {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => TriState::Yes,
            Some(false) => TriState::No,
            None => TriState::Unknown,
        }
    }
}

impl Serialize for TriState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_bool() {
            Some(b) => serializer.serialize_bool(b),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for TriState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Lenient: malformed values degrade to Unknown instead of erroring.
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match value {
            serde_json::Value::Bool(b) => TriState::from(Some(b)),
            _ => TriState::Unknown,
        })
    }
}

/// Mission type tag. Pass-through input today; the engine does not branch
/// on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionType {
    Recreational,
    Part107Commercial,
    PublicSafety,
    Educational,
}

impl fmt::Display for MissionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MissionType::Recreational => "recreational",
            MissionType::Part107Commercial => "part107_commercial",
            MissionType::PublicSafety => "public_safety",
            MissionType::Educational => "educational",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for MissionType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recreational" => Ok(MissionType::Recreational),
            "part107_commercial" => Ok(MissionType::Part107Commercial),
            "public_safety" => Ok(MissionType::PublicSafety),
            "educational" => Ok(MissionType::Educational),
            other => Err(CoreError::InvalidValue(format!(
                "unknown mission type: {}",
                other
            ))),
        }
    }
}

/// Airspace lookup result, reduced to the fields the engine cares about
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AirspaceSummary {
    /// Display label, e.g. "Class G", "Controlled (heuristic)", "Unknown"
    #[serde(default)]
    pub airspace_class: Option<String>,

    /// Whether LAANC authorization is required at this location
    #[serde(default)]
    pub laanc_required: TriState,

    /// Whether LAANC is available here (meaningful only when required)
    #[serde(default)]
    pub laanc_available: TriState,
}

impl AirspaceSummary {
    /// True when the lookup produced nothing at all
    pub fn is_empty(&self) -> bool {
        self.airspace_class.is_none()
            && self.laanc_required == TriState::Unknown
            && self.laanc_available == TriState::Unknown
    }
}

/// Coarse weather verdict carried alongside the booleanized fields.
/// Display/meta only; the engine branches on the tri-state booleans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WeatherStatus {
    Good,
    Marginal,
    Poor,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Weather compliance summary. Thresholds (3 sm visibility, 500 ft ceiling)
/// are applied upstream; the engine only sees the booleanized outcome.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherSummary {
    #[serde(default)]
    pub visibility_ok: TriState,

    #[serde(default)]
    pub cloud_clearance_ok: TriState,

    #[serde(default)]
    pub overall_status: WeatherStatus,
}

impl WeatherSummary {
    pub fn is_empty(&self) -> bool {
        self.visibility_ok == TriState::Unknown
            && self.cloud_clearance_ok == TriState::Unknown
            && self.overall_status == WeatherStatus::Unknown
    }
}

/// TFR check outcome.
///
/// The legacy `DO_NOT_FLY` vocabulary maps onto `Restricted`; any other
/// unrecognized status degrades to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TfrStatus {
    Clear,
    #[serde(alias = "DO_NOT_FLY")]
    Restricted,
    #[serde(other)]
    Unknown,
}

impl FromStr for TfrStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CLEAR" => Ok(TfrStatus::Clear),
            "RESTRICTED" | "DO_NOT_FLY" => Ok(TfrStatus::Restricted),
            "UNKNOWN" => Ok(TfrStatus::Unknown),
            other => Err(CoreError::InvalidValue(format!(
                "unknown TFR status: {}",
                other
            ))),
        }
    }
}

/// TFR lookup summary.
///
/// `status: None` means the check was never performed (distinct from a
/// check that ran and came back `Unknown`); the completeness gate treats
/// the former as missing data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TfrSummary {
    #[serde(default)]
    pub status: Option<TfrStatus>,

    #[serde(default)]
    pub tfr_count: u32,
}

impl TfrSummary {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.tfr_count == 0
    }
}

/// Per-item checklist status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChecklistStatus {
    Ok,
    Unknown,
    ActionNeeded,
    Blocking,
}

/// One rendered checklist row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub category: String,
    pub item: String,
    pub required: bool,
    pub status: ChecklistStatus,
}

impl ChecklistItem {
    pub fn new(
        category: impl Into<String>,
        item: impl Into<String>,
        status: ChecklistStatus,
    ) -> Self {
        Self {
            category: category.into(),
            item: item.into(),
            required: true,
            status,
        }
    }
}

/// Overall advisory verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverallStatus {
    Go,
    GoWithConditions,
    NoGo,
    InsufficientData,
}

impl OverallStatus {
    /// Strictness rank for fail-safe comparisons. `NoGo` and
    /// `InsufficientData` both advise against flying and rank equal.
    pub fn strictness(&self) -> u8 {
        match self {
            OverallStatus::Go => 0,
            OverallStatus::GoWithConditions => 1,
            OverallStatus::NoGo | OverallStatus::InsufficientData => 2,
        }
    }
}

impl fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OverallStatus::Go => "GO",
            OverallStatus::GoWithConditions => "GO_WITH_CONDITIONS",
            OverallStatus::NoGo => "NO_GO",
            OverallStatus::InsufficientData => "INSUFFICIENT_DATA",
        };
        write!(f, "{}", s)
    }
}

/// Engine output: one verdict plus its structured rationale.
///
/// Fully determined by the input summaries; contains no timestamps, ids,
/// or other per-call state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub overall_status: OverallStatus,
    pub required_actions: Vec<String>,
    pub checklist_items: Vec<ChecklistItem>,
    pub rationale: Vec<String>,
    pub disclaimers: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tristate_from_option() {
        assert_eq!(TriState::from(Some(true)), TriState::Yes);
        assert_eq!(TriState::from(Some(false)), TriState::No);
        assert_eq!(TriState::from(None), TriState::Unknown);
    }

    #[test]
    fn test_tristate_serializes_as_optional_bool() {
        assert_eq!(serde_json::to_string(&TriState::Yes).unwrap(), "true");
        assert_eq!(serde_json::to_string(&TriState::No).unwrap(), "false");
        assert_eq!(serde_json::to_string(&TriState::Unknown).unwrap(), "null");
    }

    #[test]
    fn test_tristate_lenient_deserialization() {
        let summary: AirspaceSummary =
            serde_json::from_str(r#"{"laanc_required": "maybe"}"#).unwrap();
        assert_eq!(summary.laanc_required, TriState::Unknown);

        let summary: AirspaceSummary = serde_json::from_str(r#"{"laanc_required": null}"#).unwrap();
        assert_eq!(summary.laanc_required, TriState::Unknown);

        let summary: AirspaceSummary = serde_json::from_str(r#"{"laanc_required": true}"#).unwrap();
        assert_eq!(summary.laanc_required, TriState::Yes);
    }

    #[test]
    fn test_empty_summaries() {
        let airspace: AirspaceSummary = serde_json::from_str("{}").unwrap();
        assert!(airspace.is_empty());

        let weather: WeatherSummary = serde_json::from_str("{}").unwrap();
        assert!(weather.is_empty());

        let tfr: TfrSummary = serde_json::from_str("{}").unwrap();
        assert!(tfr.is_empty());
    }

    #[test]
    fn test_explicit_unknown_tfr_is_not_empty() {
        let tfr: TfrSummary = serde_json::from_str(r#"{"status": "UNKNOWN"}"#).unwrap();
        assert!(!tfr.is_empty());
        assert_eq!(tfr.status, Some(TfrStatus::Unknown));
    }

    #[test]
    fn test_tfr_status_do_not_fly_alias() {
        let tfr: TfrSummary =
            serde_json::from_str(r#"{"status": "DO_NOT_FLY", "tfr_count": 1}"#).unwrap();
        assert_eq!(tfr.status, Some(TfrStatus::Restricted));

        assert_eq!("DO_NOT_FLY".parse::<TfrStatus>().unwrap(), TfrStatus::Restricted);
        assert!("NO_IDEA".parse::<TfrStatus>().is_err());
    }

    #[test]
    fn test_unrecognized_enum_strings_degrade_to_unknown() {
        let tfr: TfrSummary = serde_json::from_str(r#"{"status": "PENDING"}"#).unwrap();
        assert_eq!(tfr.status, Some(TfrStatus::Unknown));

        let weather: WeatherSummary =
            serde_json::from_str(r#"{"overall_status": "SPLENDID"}"#).unwrap();
        assert_eq!(weather.overall_status, WeatherStatus::Unknown);
    }

    #[test]
    fn test_mission_type_round_trip() {
        for s in [
            "recreational",
            "part107_commercial",
            "public_safety",
            "educational",
        ] {
            let mission: MissionType = s.parse().unwrap();
            assert_eq!(mission.to_string(), s);
        }
        assert!("freight".parse::<MissionType>().is_err());
    }

    #[test]
    fn test_overall_status_strictness_ordering() {
        assert!(OverallStatus::Go.strictness() < OverallStatus::GoWithConditions.strictness());
        assert!(OverallStatus::GoWithConditions.strictness() < OverallStatus::NoGo.strictness());
        assert_eq!(
            OverallStatus::NoGo.strictness(),
            OverallStatus::InsufficientData.strictness()
        );
    }

    #[test]
    fn test_overall_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&OverallStatus::GoWithConditions).unwrap(),
            "\"GO_WITH_CONDITIONS\""
        );
        assert_eq!(
            serde_json::to_string(&ChecklistStatus::ActionNeeded).unwrap(),
            "\"ACTION_NEEDED\""
        );
    }
}
