//! Configuration validation
//!
//! Validates critical configuration values at startup to catch misconfigurations early.

use anyhow::Result;
use sheetvault_core::{Config, StorageBackend};

/// Validate critical configuration values
///
/// Fails fast on settings that would be a security problem or make every
/// request fail at runtime.
pub fn validate_config(config: &Config) -> Result<()> {
    if config.is_production() && config.cors_origins.iter().any(|o| o == "*") {
        return Err(anyhow::anyhow!(
            "CORS configured to allow all origins (*) in production - this is a security risk. \
            Please set specific allowed origins via CORS_ORIGINS environment variable."
        ));
    }

    if config.max_upload_size_bytes == 0 {
        return Err(anyhow::anyhow!("Max upload size cannot be 0"));
    }

    match config.storage_backend {
        StorageBackend::Local => {
            if config.local_storage_path.trim().is_empty() {
                return Err(anyhow::anyhow!(
                    "LOCAL_STORAGE_PATH cannot be empty when using local storage backend"
                ));
            }
        }
        StorageBackend::S3 => {
            if config.s3_bucket.as_deref().map_or(true, str::is_empty) {
                return Err(anyhow::anyhow!(
                    "S3_BUCKET must be set when using S3 storage backend"
                ));
            }
            if config.s3_region().is_none() {
                return Err(anyhow::anyhow!(
                    "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                ));
            }
            if config.storage_prefix().is_empty() {
                tracing::warn!("STORAGE_PREFIX is empty - files will be stored at the bucket root");
            }
        }
    }

    Ok(())
}
