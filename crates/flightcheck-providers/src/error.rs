//! Provider error types

use thiserror::Error;

/// Error from an upstream data-source adapter
#[derive(Error, Debug)]
pub enum ProviderError {
    /// HTTP transport or status failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream payload could not be decoded
    #[error("Failed to decode upstream payload: {0}")]
    Decode(String),

    /// JSON parse failure
    #[error("Invalid JSON from upstream: {0}")]
    Json(#[from] serde_json::Error),

    /// Upstream responded but contained nothing usable
    #[error("No usable data: {0}")]
    NoData(String),
}

/// Result type for provider operations
pub type Result<T> = std::result::Result<T, ProviderError>;
