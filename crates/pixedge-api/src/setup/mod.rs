//! Application setup and initialization

pub mod routes;
pub mod server;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use pixedge_core::Config;

use crate::provider::HttpImageProvider;
use crate::state::AppState;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry().context("Failed to initialize telemetry")?;

    tracing::info!("Configuration loaded and validated successfully");

    let provider = HttpImageProvider::new(
        config.provider_url(),
        Duration::from_secs(config.provider_timeout_secs()),
    )?;
    tracing::info!(endpoint = %provider.endpoint(), "Image provider configured");

    let state = Arc::new(AppState::new(config.clone(), Arc::new(provider)));
    let router = routes::setup_routes(&config, state.clone());

    Ok((state, router))
}
