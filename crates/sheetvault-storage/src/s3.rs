use crate::keys::{name_from_location, object_path};
use crate::traits::{ByteStream, Storage, StorageEntry, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use object_store::aws::AmazonS3Builder;
use object_store::buffered::BufWriter;
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{Attribute, Attributes, ObjectStore, ObjectStoreExt};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWriteExt};

/// S3 storage implementation
///
/// Objects live under a fixed key prefix inside one bucket; the logical file
/// name is the key with the prefix stripped. Only direct children of the
/// prefix are visible.
#[derive(Clone)]
pub struct S3Storage {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    prefix: Path,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    /// * `prefix` - Key prefix all files are stored under (e.g., "excel-files")
    pub async fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
        prefix: &str,
    ) -> StorageResult<Self> {
        // Credentials come from the standard AWS environment variables.
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region)
            .with_bucket_name(bucket.clone());

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(Self::with_store(Arc::new(store), bucket, prefix))
    }

    /// Wrap an existing object store, e.g. an in-memory store in tests.
    pub fn with_store(store: Arc<dyn ObjectStore>, bucket: String, prefix: &str) -> Self {
        S3Storage {
            store,
            bucket,
            prefix: Path::from(prefix.trim_matches('/')),
        }
    }

    fn location(&self, name: &str) -> StorageResult<Path> {
        object_path(&self.prefix, name)
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn exists(&self, name: &str) -> StorageResult<bool> {
        let location = self.location(name)?;
        match self.store.head(&location).await {
            Ok(_) => Ok(true),
            Err(ObjectStoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(StorageError::BackendError(e.to_string())),
        }
    }

    async fn write(
        &self,
        name: &str,
        content_type: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> StorageResult<u64> {
        let location = self.location(name)?;
        let start = std::time::Instant::now();

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());

        // Multipart upload; the object is only created once shutdown completes it.
        let mut writer =
            BufWriter::new(self.store.clone(), location.clone()).with_attributes(attributes);

        let size = match tokio::io::copy(reader, &mut writer).await {
            Ok(size) => size,
            Err(e) => {
                // Discards buffered data or uploaded parts; the object never appears.
                if let Err(abort_err) = writer.abort().await {
                    tracing::warn!(error = %abort_err, key = %location, "S3 upload abort failed");
                }
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %location,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 stream upload failed"
                );
                return Err(StorageError::UploadFailed(e.to_string()));
            }
        };

        // A failed shutdown has already given up on the upload and cannot be aborted.
        if let Err(e) = writer.shutdown().await {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %location,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload completion failed"
            );
            return Err(StorageError::UploadFailed(e.to_string()));
        }

        tracing::info!(
            bucket = %self.bucket,
            key = %location,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 stream upload successful"
        );

        Ok(size)
    }

    async fn open_read_stream(&self, name: &str) -> StorageResult<ByteStream> {
        let location = self.location(name)?;
        let start = std::time::Instant::now();

        let result = self.store.get(&location).await.map_err(|e| match e {
            ObjectStoreError::NotFound { .. } => StorageError::NotFound(name.to_string()),
            other => {
                tracing::error!(
                    error = %other,
                    bucket = %self.bucket,
                    key = %location,
                    "S3 download failed"
                );
                StorageError::DownloadFailed(other.to_string())
            }
        })?;

        let bucket = self.bucket.clone();
        let key = location.to_string();

        let stream = result.into_stream().map(move |res| match res {
            Ok(bytes) => Ok(bytes),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    bucket = %bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 stream download error"
                );
                Err(StorageError::DownloadFailed(e.to_string()))
            }
        });

        Ok(Box::pin(stream))
    }

    async fn delete(&self, name: &str) -> StorageResult<()> {
        let location = self.location(name)?;
        let start = std::time::Instant::now();

        match self.store.delete(&location).await {
            Ok(()) => {}
            // Providers differ on whether deleting a missing key errors.
            Err(ObjectStoreError::NotFound { .. }) => {
                tracing::debug!(key = %location, "S3 delete of missing object");
                return Ok(());
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %location,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 delete failed"
                );
                return Err(StorageError::DeleteFailed(e.to_string()));
            }
        }

        tracing::info!(
            bucket = %self.bucket,
            key = %location,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 delete successful"
        );

        Ok(())
    }

    async fn enumerate(&self) -> StorageResult<Vec<StorageEntry>> {
        let objects: Vec<_> = self
            .store
            .list(Some(&self.prefix))
            .try_collect()
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))?;

        let entries = objects
            .into_iter()
            .filter_map(|meta| {
                let name = name_from_location(&self.prefix, &meta.location)?;
                Some(StorageEntry {
                    name,
                    size_bytes: meta.size,
                    last_modified: Some(meta.last_modified),
                })
            })
            .collect();

        Ok(entries)
    }

    async fn health_check(&self) -> StorageResult<()> {
        let mut listing = self.store.list(Some(&self.prefix));
        match listing.next().await {
            Some(Err(e)) => Err(StorageError::BackendError(e.to_string())),
            _ => Ok(()),
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
