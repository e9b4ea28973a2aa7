//! Server configuration

use anyhow::Result;
use serde::Deserialize;

/// Server configuration, loaded from `FLIGHTCHECK_*` environment
/// variables (with `.env` support via dotenvy in `main`).
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind host (default: 0.0.0.0)
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port (default: 8080)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Postgres URL for advisory snapshots. Unset disables persistence;
    /// the server still answers normally.
    #[serde(default)]
    pub snapshot_database_url: Option<String>,

    /// Comma-separated CORS origins; unset falls back to the dev/prod
    /// frontend defaults.
    #[serde(default)]
    pub cors_allowed_origins: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

const DEFAULT_CORS_ORIGINS: [&str; 2] = [
    "http://localhost:3000",
    "https://flightcheck.example",
];

impl ServerConfig {
    /// Load configuration from the environment
    pub fn load() -> Result<Self> {
        let config_result = config::Config::builder()
            .add_source(config::Environment::with_prefix("FLIGHTCHECK").try_parsing(true))
            .build();

        match config_result {
            Ok(cfg) => cfg
                .try_deserialize()
                .map_err(|e| anyhow::anyhow!("Failed to deserialize config: {}", e)),
            Err(_) => {
                tracing::info!("No environment overrides found, using default configuration");
                Ok(Self::default())
            }
        }
    }

    /// Configured CORS origins, falling back to the defaults
    pub fn allowed_origins(&self) -> Vec<String> {
        match &self.cors_allowed_origins {
            Some(raw) => raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            None => DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            snapshot_database_url: None,
            cors_allowed_origins: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert!(config.snapshot_database_url.is_none());
        assert_eq!(config.allowed_origins().len(), 2);
    }

    #[test]
    fn test_allowed_origins_parsing() {
        let config = ServerConfig {
            cors_allowed_origins: Some("http://a.example, http://b.example ,".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.allowed_origins(),
            vec!["http://a.example", "http://b.example"]
        );
    }
}
