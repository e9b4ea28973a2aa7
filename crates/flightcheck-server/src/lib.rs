//! FlightCheck HTTP tool server
//!
//! Exposes the preflight lookups and the decision engine as JSON tool
//! endpoints. Handlers absorb upstream failures into `UNKNOWN`-tagged
//! summary fields; the decision engine never sees a raw error.

pub mod api;
pub mod config;
pub mod error;
pub mod snapshot;

pub const SERVICE_NAME: &str = "FlightCheck Drone Ops & Compliance Tool Server";

/// ISO-8601 UTC timestamp with a trailing Z
pub fn utc_now_iso() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}
