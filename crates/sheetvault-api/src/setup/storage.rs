//! Storage setup and initialization

use anyhow::{Context, Result};
use sheetvault_core::Config;
use sheetvault_services::{create_storage, Storage};
use std::sync::Arc;

/// Build the configured storage backend and verify it answers.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!("Initializing storage abstraction...");
    let storage = create_storage(config)
        .await
        .context("Failed to create storage backend")?;

    storage
        .health_check()
        .await
        .context("Storage backend is not reachable")?;

    tracing::info!(
        backend = %storage.backend_type(),
        "Storage abstraction initialized successfully"
    );

    Ok(storage)
}
