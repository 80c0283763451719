//! Configuration module
//!
//! Service configuration is read once from the environment (optionally via a
//! `.env` file) and passed explicitly to every component that needs it. The
//! storage root in particular is a value here, never a global.

use std::env;

use crate::constants::{DEFAULT_LOCAL_STORAGE_PATH, DEFAULT_STORAGE_PREFIX};
use crate::storage_types::StorageBackend;

const SERVER_PORT: u16 = 8080;
const MAX_UPLOAD_SIZE_MB: usize = 50;
const REQUEST_TIMEOUT_SECS: u64 = 60;
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub max_upload_size_bytes: usize,
    pub request_timeout_secs: u64,
    pub http_concurrency_limit: usize,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub local_storage_path: String,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, etc.)
    pub aws_region: Option<String>,
    pub storage_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: SERVER_PORT,
            environment: "development".to_string(),
            cors_origins: vec!["*".to_string()],
            max_upload_size_bytes: MAX_UPLOAD_SIZE_MB * 1024 * 1024,
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
            http_concurrency_limit: HTTP_CONCURRENCY_LIMIT,
            storage_backend: StorageBackend::Local,
            local_storage_path: DEFAULT_LOCAL_STORAGE_PATH.to_string(),
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            aws_region: None,
            storage_prefix: DEFAULT_STORAGE_PREFIX.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let defaults = Config::default();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or(defaults.environment);

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => value.parse::<StorageBackend>()?,
            Err(_) => defaults.storage_backend,
        };

        let max_upload_size_mb: usize = env::var("MAX_UPLOAD_SIZE_MB")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(MAX_UPLOAD_SIZE_MB);

        Ok(Config {
            server_port: env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(SERVER_PORT),
            environment,
            cors_origins,
            max_upload_size_bytes: max_upload_size_mb * 1024 * 1024,
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(REQUEST_TIMEOUT_SECS)
                .max(1),
            http_concurrency_limit: env::var("HTTP_CONCURRENCY_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(HTTP_CONCURRENCY_LIMIT)
                .max(1),
            storage_backend,
            local_storage_path: env::var("LOCAL_STORAGE_PATH")
                .unwrap_or(defaults.local_storage_path),
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION").ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            aws_region: env::var("AWS_REGION").ok(),
            storage_prefix: env::var("STORAGE_PREFIX").unwrap_or(defaults.storage_prefix),
        })
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// S3 region, preferring `S3_REGION` over `AWS_REGION`.
    pub fn s3_region(&self) -> Option<&str> {
        self.s3_region.as_deref().or(self.aws_region.as_deref())
    }

    /// Bucket key prefix without leading or trailing slashes.
    pub fn storage_prefix(&self) -> &str {
        self.storage_prefix.trim_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.storage_backend, StorageBackend::Local);
        assert_eq!(config.local_storage_path, "root/excel-files");
        assert_eq!(config.storage_prefix(), "excel-files");
        assert!(!config.is_production());
    }

    #[test]
    fn test_s3_region_prefers_explicit_region() {
        let config = Config {
            s3_region: Some("eu-west-1".to_string()),
            aws_region: Some("us-east-1".to_string()),
            ..Config::default()
        };
        assert_eq!(config.s3_region(), Some("eu-west-1"));

        let config = Config {
            aws_region: Some("us-east-1".to_string()),
            ..Config::default()
        };
        assert_eq!(config.s3_region(), Some("us-east-1"));
    }

    #[test]
    fn test_storage_prefix_is_trimmed() {
        let config = Config {
            storage_prefix: "/excel-files/".to_string(),
            ..Config::default()
        };
        assert_eq!(config.storage_prefix(), "excel-files");
    }

    #[test]
    fn test_production_detection() {
        let config = Config {
            environment: "Production".to_string(),
            ..Config::default()
        };
        assert!(config.is_production());
    }
}
