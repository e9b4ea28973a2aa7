//! Advisory snapshot persistence
//!
//! Best-effort storage of issued advisories for later review. Writes are
//! informational only - not a compliance record or flight log - and a
//! failed or unconfigured store must never affect the advisory response.
//! Callers log and discard insert failures.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One advisory snapshot row
#[derive(Debug, Clone, Serialize)]
pub struct AdvisorySnapshot {
    pub request_id: String,
    /// Anonymous requests carry no user id
    pub user_id: Option<String>,
    pub timestamp_utc: DateTime<Utc>,
    pub location_lat: f64,
    pub location_lon: f64,
    pub altitude_ft: Option<f64>,
    pub mission_type: String,
    /// GO | GO_WITH_CONDITIONS | NO_GO | INSUFFICIENT_DATA
    pub advisory_result: String,
    /// Full decision plus the inputs that produced it
    pub full_response: serde_json::Value,
    pub tool_version: String,
    pub source: String,
}

/// Capability for persisting advisory snapshots
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Insert a snapshot, returning its request id
    async fn insert(&self, snapshot: AdvisorySnapshot) -> Result<String>;

    /// Whether inserts can actually land anywhere
    fn is_enabled(&self) -> bool {
        true
    }
}

/// No-op store used when no database is configured
pub struct NoopSnapshotStore;

#[async_trait]
impl SnapshotStore for NoopSnapshotStore {
    async fn insert(&self, snapshot: AdvisorySnapshot) -> Result<String> {
        tracing::debug!(
            request_id = %snapshot.request_id,
            "snapshot store not configured, dropping advisory snapshot"
        );
        Ok(snapshot.request_id)
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

/// Postgres-backed store for the `advisory_snapshots` table
#[cfg(feature = "sqlx")]
pub struct PgSnapshotStore {
    pool: sqlx::PgPool,
}

#[cfg(feature = "sqlx")]
impl PgSnapshotStore {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }
}

#[cfg(feature = "sqlx")]
#[async_trait]
impl SnapshotStore for PgSnapshotStore {
    async fn insert(&self, snapshot: AdvisorySnapshot) -> Result<String> {
        sqlx::query(
            r#"
            INSERT INTO advisory_snapshots
                (request_id, user_id, timestamp_utc, location_lat, location_lon,
                 altitude_ft, mission_type, advisory_result, full_response,
                 tool_version, source)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(&snapshot.request_id)
        .bind(&snapshot.user_id)
        .bind(snapshot.timestamp_utc)
        .bind(snapshot.location_lat)
        .bind(snapshot.location_lon)
        .bind(snapshot.altitude_ft)
        .bind(&snapshot.mission_type)
        .bind(&snapshot.advisory_result)
        .bind(&snapshot.full_response)
        .bind(&snapshot.tool_version)
        .bind(&snapshot.source)
        .execute(&self.pool)
        .await?;

        tracing::info!(request_id = %snapshot.request_id, "advisory snapshot logged");
        Ok(snapshot.request_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_snapshot() -> AdvisorySnapshot {
        AdvisorySnapshot {
            request_id: "req-1".to_string(),
            user_id: None,
            timestamp_utc: Utc::now(),
            location_lat: 47.6,
            location_lon: -122.3,
            altitude_ft: Some(200.0),
            mission_type: "recreational".to_string(),
            advisory_result: "GO".to_string(),
            full_response: serde_json::json!({"overall_status": "GO"}),
            tool_version: "0.1.0".to_string(),
            source: "web".to_string(),
        }
    }

    #[tokio::test]
    async fn test_noop_store_accepts_and_reports_disabled() {
        let store = NoopSnapshotStore;
        assert!(!store.is_enabled());
        let id = store.insert(sample_snapshot()).await.unwrap();
        assert_eq!(id, "req-1");
    }
}
