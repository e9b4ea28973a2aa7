//! FlightCheck Drone Ops & Compliance Tool Server
//!
//! HTTP server exposing the preflight tool endpoints.

use anyhow::Result;
use flightcheck_server::api::{create_router, AppState};
use flightcheck_server::config::ServerConfig;
use flightcheck_server::snapshot::{NoopSnapshotStore, SnapshotStore};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present, then tracing, then config
    dotenvy::dotenv().ok();
    init_tracing()?;

    let config = ServerConfig::load()?;
    info!("Loaded configuration: host={} port={}", config.host, config.port);

    let snapshots = init_snapshot_store(&config).await;
    let state = AppState::new(snapshots);
    let app = create_router(state, &config.allowed_origins());

    let addr = format!("{}:{}", config.host, config.port);
    info!("Starting server on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    info!("✓ Server listening on http://{}", addr);
    info!("  Health check: http://{}/healthz", addr);
    info!("  Airspace: POST http://{}/tools/check_airspace", addr);
    info!("  Weather: POST http://{}/tools/analyze_weather_conditions", addr);
    info!("  TFRs: POST http://{}/tools/check_tfrs", addr);
    info!(
        "  Checklist: POST http://{}/tools/generate_preflight_checklist",
        addr
    );
    info!(
        "  LAANC links: POST http://{}/tools/generate_laanc_deep_link",
        addr
    );

    axum::serve(listener, app).await?;

    Ok(())
}

/// Initialize tracing subscriber
fn init_tracing() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "flightcheck_server=info,flightcheck_providers=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    Ok(())
}

/// Select the snapshot store. Postgres when configured and compiled in,
/// otherwise a no-op store so the server keeps working without storage.
async fn init_snapshot_store(config: &ServerConfig) -> Arc<dyn SnapshotStore> {
    #[cfg(feature = "sqlx")]
    if let Some(url) = &config.snapshot_database_url {
        match flightcheck_server::snapshot::PgSnapshotStore::connect(url).await {
            Ok(store) => {
                info!("Snapshot logging enabled (postgres)");
                return Arc::new(store);
            }
            Err(e) => {
                tracing::warn!(error = %e, "snapshot store unavailable, continuing without it");
            }
        }
    }

    #[cfg(not(feature = "sqlx"))]
    if config.snapshot_database_url.is_some() {
        tracing::warn!("snapshot_database_url set but server built without the sqlx feature");
    }

    info!("Snapshot logging disabled");
    Arc::new(NoopSnapshotStore)
}
