//! GamePlan API server entry point.
//!
//! Initializes logging, loads configuration from environment variables,
//! prepares the data directories, and serves the HTTP API until the
//! process is terminated.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gameplan_api::config::ApiConfig;
use gameplan_api::server::{ServerConfig, start_server};
use gameplan_api::state::AppState;
use gameplan_store::GamePlanStore;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if initialization fails or the server exits
/// abnormally.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("gameplan-api starting");

    let config = ApiConfig::from_env().context("loading configuration")?;
    info!(
        data_dir = config.data_dir,
        host = config.host,
        port = config.port,
        "configuration loaded"
    );

    let store = GamePlanStore::new(&config.data_dir);
    store
        .init_data_dirs()
        .await
        .context("initializing data directories")?;

    let state = Arc::new(AppState::new(store));
    let server_config = ServerConfig {
        host: config.host,
        port: config.port,
    };

    start_server(&server_config, state)
        .await
        .context("running the API server")?;

    Ok(())
}
