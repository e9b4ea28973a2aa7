//! FlightCheck Core - Types and decision engine for UAS preflight advisories
//!
//! This crate provides the fundamental pieces shared across FlightCheck:
//! - Summary types describing airspace, weather, and TFR state
//! - The preflight decision engine (pure, deterministic, fail-safe)
//! - Error types
//!
//! Nothing in this crate performs I/O. Upstream lookups live in
//! `flightcheck-providers`; this crate only evaluates their results.

pub mod engine;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use engine::decide_preflight;
pub use error::CoreError;
pub use types::{
    AirspaceSummary, ChecklistItem, ChecklistStatus, Decision, MissionType, OverallStatus,
    TfrStatus, TfrSummary, TriState, WeatherStatus, WeatherSummary,
};
