//! Application setup and initialization
//!
//! Everything `main` needs to go from a [`Config`] to a running server.

pub mod routes;
pub mod server;
pub mod storage;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use sheetvault_core::{AllowList, Config};
use sheetvault_services::FileStore;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    validation::validate_config(&config).context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(&config.environment);

    tracing::info!("Configuration loaded and validated successfully");

    let storage = storage::setup_storage(&config).await?;
    let files = FileStore::new(storage, AllowList::spreadsheets());

    let state = Arc::new(AppState::new(files));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
