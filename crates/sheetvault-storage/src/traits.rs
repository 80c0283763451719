//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::Stream;
use sheetvault_core::AppError;
use std::pin::Pin;
use thiserror::Error;
use tokio::io::AsyncRead;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("File already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Chunked file content as produced by [`Storage::open_read_stream`].
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

/// One object directly under the storage root, as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEntry {
    pub name: String,
    pub size_bytes: u64,
    pub last_modified: Option<DateTime<Utc>>,
}

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem) implement this trait so the
/// file service works the same way whichever one is configured. Every method
/// takes a bare file name; backends reject anything that could address an
/// object outside their root.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Check whether an object with this name exists
    async fn exists(&self, name: &str) -> StorageResult<bool>;

    /// Stream `reader` into a new object and return the number of bytes written.
    ///
    /// The object only becomes visible to `exists` and `enumerate` once the
    /// reader is fully consumed. Backends with an atomic create-if-absent
    /// primitive return [`StorageError::AlreadyExists`] instead of replacing an
    /// object that appeared after the name was chosen.
    async fn write(
        &self,
        name: &str,
        content_type: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> StorageResult<u64>;

    /// Open an object for streaming download
    async fn open_read_stream(&self, name: &str) -> StorageResult<ByteStream>;

    /// Delete an object. Deleting a missing object succeeds.
    async fn delete(&self, name: &str) -> StorageResult<()>;

    /// List every object directly under the root with its size and modification time
    async fn enumerate(&self) -> StorageResult<Vec<StorageEntry>>;

    /// Verify the backend is reachable
    async fn health_check(&self) -> StorageResult<()>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(name) => AppError::NotFound(name),
            StorageError::AlreadyExists(name) => AppError::NameConflict(name),
            StorageError::InvalidKey(msg) => AppError::InvalidName(msg),
            other => AppError::StorageFailure(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetvault_core::ErrorMetadata;

    #[test]
    fn test_storage_error_maps_to_app_error() {
        let err: AppError = StorageError::NotFound("a.xlsx".to_string()).into();
        assert_eq!(err.http_status_code(), 404);

        let err: AppError = StorageError::AlreadyExists("a.xlsx".to_string()).into();
        assert_eq!(err.http_status_code(), 409);

        let err: AppError = StorageError::InvalidKey("../a.xlsx".to_string()).into();
        assert_eq!(err.http_status_code(), 400);

        let err: AppError = StorageError::UploadFailed("disk full".to_string()).into();
        assert_eq!(err.http_status_code(), 500);
        assert!(err.to_string().contains("disk full"));
    }
}
