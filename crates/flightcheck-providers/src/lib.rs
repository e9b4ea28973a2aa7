//! FlightCheck Providers - Upstream data-source adapters
//!
//! Best-effort clients for the external services FlightCheck consults:
//! - FAA UAS Data Delivery System (ArcGIS) for airspace and UASFM layers
//! - NOAA/NWS for weather observations
//! - FAA TFR export for temporary flight restrictions
//!
//! Every adapter returns either typed data or a [`ProviderError`]. Callers
//! (the server handlers) translate failures into `Unknown`-tagged summary
//! fields before anything reaches the decision engine; no raw error ever
//! crosses that boundary.

pub mod airports;
pub mod airspace;
pub mod error;
pub mod tfr;
pub mod weather;

pub use airports::{classify_by_proximity, haversine_nm, ProximityClassification};
pub use airspace::{AirspaceClient, AirspaceResult};
pub use error::ProviderError;
pub use tfr::{Clock, SystemClock, TfrClient, TfrItem};
pub use weather::{NwsClient, Observation, ObservationMeta};

/// User-Agent sent on every upstream request. NWS requires a descriptive
/// value; the FAA endpoints tolerate it.
pub const USER_AGENT: &str = "flightcheck/0.1 (contact: ops@flightcheck.example)";
