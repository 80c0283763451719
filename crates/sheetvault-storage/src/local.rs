use crate::keys::validate_name;
use crate::traits::{ByteStream, Storage, StorageEntry, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncWriteExt};

/// Directory under the root that holds uploads still in flight.
const STAGING_DIR: &str = ".staging";

/// Local filesystem storage implementation
///
/// Files live directly under `base_path`. Uploads are streamed into a
/// temporary file in `{base_path}/.staging` and published with a hard link,
/// which fails instead of replacing an existing file. A dropped upload leaves
/// nothing behind under its final name.
#[derive(Clone, Debug)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "root/excel-files").
    ///   Created if missing.
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let storage = LocalStorage {
            base_path: base_path.into(),
        };

        storage.ensure_root().await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                storage.base_path.display(),
                e
            ))
        })?;

        Ok(storage)
    }

    /// Convert a file name to its path under the root
    fn name_to_path(&self, name: &str) -> StorageResult<PathBuf> {
        validate_name(name)?;
        Ok(self.base_path.join(name))
    }

    fn staging_path(&self) -> PathBuf {
        self.base_path.join(STAGING_DIR)
    }

    /// Recursive create-if-missing of the root; safe to call before every operation
    async fn ensure_root(&self) -> StorageResult<()> {
        fs::create_dir_all(&self.base_path).await?;
        Ok(())
    }
}

fn system_time_to_utc(time: std::io::Result<std::time::SystemTime>) -> Option<DateTime<Utc>> {
    time.ok().map(DateTime::<Utc>::from)
}

#[async_trait]
impl Storage for LocalStorage {
    async fn exists(&self, name: &str) -> StorageResult<bool> {
        let path = self.name_to_path(name)?;
        // Must agree with the hard-link publish, which does not follow symlinks either.
        match fs::symlink_metadata(&path).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::BackendError(format!(
                "Failed to stat {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn write(
        &self,
        name: &str,
        _content_type: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> StorageResult<u64> {
        let path = self.name_to_path(name)?;
        let start = std::time::Instant::now();

        let staging = self.staging_path();
        fs::create_dir_all(&staging).await?;

        // Removed on drop, including when the request future is cancelled mid-copy.
        let temp_path = tempfile::Builder::new()
            .prefix(".upload-")
            .suffix(".part")
            .tempfile_in(&staging)
            .map_err(|e| {
                StorageError::UploadFailed(format!(
                    "Failed to create staging file in {}: {}",
                    staging.display(),
                    e
                ))
            })?
            .into_temp_path();

        let mut file = fs::OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&temp_path)
            .await
            .map_err(|e| {
                StorageError::UploadFailed(format!(
                    "Failed to open staging file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

        let bytes_copied = tokio::io::copy(reader, &mut file).await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to write stream to file {}: {}",
                temp_path.display(),
                e
            ))
        })?;

        file.flush().await?;
        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to sync file {}: {}",
                temp_path.display(),
                e
            ))
        })?;
        drop(file);

        match fs::hard_link(&temp_path, &path).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                tracing::warn!(
                    path = %path.display(),
                    name = %name,
                    "Local storage publish lost a race for the name"
                );
                return Err(StorageError::AlreadyExists(name.to_string()));
            }
            Err(e) => {
                return Err(StorageError::UploadFailed(format!(
                    "Failed to publish file {}: {}",
                    path.display(),
                    e
                )));
            }
        }

        if let Err(e) = temp_path.close() {
            tracing::warn!(error = %e, "Failed to remove staging file");
        }

        tracing::info!(
            path = %path.display(),
            name = %name,
            size_bytes = bytes_copied,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage stream upload successful"
        );

        Ok(bytes_copied)
    }

    async fn open_read_stream(&self, name: &str) -> StorageResult<ByteStream> {
        let path = self.name_to_path(name)?;
        let start = std::time::Instant::now();

        let file = match fs::File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::NotFound(name.to_string()));
            }
            Err(e) => {
                return Err(StorageError::DownloadFailed(format!(
                    "Failed to open file {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        let metadata = file.metadata().await?;
        if !metadata.is_file() {
            return Err(StorageError::NotFound(name.to_string()));
        }

        let name = name.to_string();
        let path_display = path.display().to_string();
        let stream = tokio_util::io::ReaderStream::new(file).map(move |result| {
            result.map_err(|e| {
                tracing::error!(
                    error = %e,
                    path = %path_display,
                    name = %name,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Local storage stream download error"
                );
                StorageError::DownloadFailed(format!("Failed to read chunk: {}", e))
            })
        });

        Ok(Box::pin(stream))
    }

    async fn delete(&self, name: &str) -> StorageResult<()> {
        let path = self.name_to_path(name)?;
        let start = std::time::Instant::now();

        match fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(name = %name, "Local storage delete of missing file");
                return Ok(());
            }
            Err(e) => {
                return Err(StorageError::DeleteFailed(format!(
                    "Failed to delete file {}: {}",
                    path.display(),
                    e
                )));
            }
        }

        tracing::info!(
            path = %path.display(),
            name = %name,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage delete successful"
        );

        Ok(())
    }

    async fn enumerate(&self) -> StorageResult<Vec<StorageEntry>> {
        self.ensure_root().await?;

        let mut entries = Vec::new();
        let mut dir = fs::read_dir(&self.base_path).await?;

        while let Some(entry) = dir.next_entry().await? {
            // Does not follow symlinks, so links out of the root stay invisible.
            let file_type = entry.file_type().await?;
            if !file_type.is_file() {
                continue;
            }

            let Some(name) = entry.file_name().to_str().map(String::from) else {
                tracing::debug!(path = %entry.path().display(), "Skipping non UTF-8 file name");
                continue;
            };

            let metadata = match entry.metadata().await {
                Ok(metadata) => metadata,
                // Deleted between read_dir and stat
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };

            entries.push(StorageEntry {
                name,
                size_bytes: metadata.len(),
                last_modified: system_time_to_utc(metadata.modified()),
            });
        }

        Ok(entries)
    }

    async fn health_check(&self) -> StorageResult<()> {
        let metadata = fs::metadata(&self.base_path).await?;
        if !metadata.is_dir() {
            return Err(StorageError::BackendError(format!(
                "{} is not a directory",
                self.base_path.display()
            )));
        }
        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
