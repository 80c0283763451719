//! File store facade
//!
//! [`FileStore`] is the only entry point the HTTP layer uses. Every name it
//! receives is sanitized and checked against the allow-list before a storage
//! backend sees it, so rejected requests never perform storage I/O.

use std::sync::Arc;

use sheetvault_core::models::StoredFile;
use sheetvault_core::naming::content_type_for;
use sheetvault_core::{sanitize_file_name, AllowList, AppError, StorageBackend};
use sheetvault_storage::{ByteStream, Storage, StorageError};
use tokio::io::AsyncRead;

use crate::lister::list_stored_files;
use crate::resolver::resolve_unique_name;

/// A file opened for download.
pub struct FileDownload {
    /// Sanitized name the content is stored under
    pub name: String,
    pub content_type: &'static str,
    pub stream: ByteStream,
}

impl std::fmt::Debug for FileDownload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileDownload")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct FileStore {
    storage: Arc<dyn Storage>,
    allow_list: AllowList,
}

impl FileStore {
    pub fn new(storage: Arc<dyn Storage>, allow_list: AllowList) -> Self {
        Self {
            storage,
            allow_list,
        }
    }

    pub fn backend_type(&self) -> StorageBackend {
        self.storage.backend_type()
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        Ok(self.storage.health_check().await?)
    }

    /// Sanitize a client-supplied name and gate it on the allow-list.
    pub fn validate_name(&self, raw: &str) -> Result<String, AppError> {
        let name = sanitize_file_name(raw);
        if name.is_empty() {
            return Err(AppError::InvalidName(raw.to_string()));
        }
        if !self.allow_list.is_allowed(&name) {
            return Err(AppError::DisallowedExtension(name));
        }
        Ok(name)
    }

    /// Visible files, newest first.
    pub async fn list(&self) -> Result<Vec<StoredFile>, AppError> {
        Ok(list_stored_files(self.storage.as_ref(), &self.allow_list).await?)
    }

    /// Store the content of `reader` under a collision-free variant of
    /// `raw_name` and return the name actually used. `content_type` is the
    /// client-declared type, recorded by backends that keep object metadata.
    #[tracing::instrument(skip(self, reader), fields(backend = %self.backend_type()))]
    pub async fn upload(
        &self,
        raw_name: &str,
        content_type: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> Result<String, AppError> {
        let desired = self.validate_name(raw_name)?;

        let storage = &self.storage;
        let name = resolve_unique_name(&desired, |candidate| async move {
            storage.exists(&candidate).await
        })
        .await?;

        let size = self
            .storage
            .write(&name, content_type, reader)
            .await
            .map_err(|e| match e {
                StorageError::AlreadyExists(_) => AppError::NameConflict(name.clone()),
                other => AppError::from(other),
            })?;

        tracing::info!(name = %name, size_bytes = size, "File stored");
        Ok(name)
    }

    /// Open a stored file for streaming.
    pub async fn download(&self, raw_name: &str) -> Result<FileDownload, AppError> {
        let name = self.validate_name(raw_name)?;
        let stream = self.storage.open_read_stream(&name).await?;

        Ok(FileDownload {
            content_type: content_type_for(&name),
            name,
            stream,
        })
    }

    /// Remove a stored file. Deleting a missing file succeeds.
    #[tracing::instrument(skip(self), fields(backend = %self.backend_type()))]
    pub async fn delete(&self, raw_name: &str) -> Result<(), AppError> {
        let name = self.validate_name(raw_name)?;
        self.storage.delete(&name).await?;
        tracing::info!(name = %name, "File deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use futures::TryStreamExt;
    use sheetvault_storage::{StorageEntry, StorageResult};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Backend that records every call and stores nothing.
    #[derive(Default)]
    struct CountingStorage {
        calls: AtomicUsize,
    }

    impl CountingStorage {
        fn touch(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl Storage for CountingStorage {
        async fn exists(&self, _name: &str) -> StorageResult<bool> {
            self.touch();
            Ok(true)
        }

        async fn write(
            &self,
            _name: &str,
            _content_type: &str,
            _reader: &mut (dyn AsyncRead + Send + Unpin),
        ) -> StorageResult<u64> {
            self.touch();
            Ok(0)
        }

        async fn open_read_stream(&self, name: &str) -> StorageResult<ByteStream> {
            self.touch();
            Err(StorageError::NotFound(name.to_string()))
        }

        async fn delete(&self, _name: &str) -> StorageResult<()> {
            self.touch();
            Ok(())
        }

        async fn enumerate(&self) -> StorageResult<Vec<StorageEntry>> {
            self.touch();
            Ok(Vec::new())
        }

        async fn health_check(&self) -> StorageResult<()> {
            Ok(())
        }

        fn backend_type(&self) -> StorageBackend {
            StorageBackend::Local
        }
    }

    async fn upload_bytes(store: &FileStore, name: &str, data: &'static [u8]) -> Result<String, AppError> {
        let mut reader: &[u8] = data;
        store.upload(name, "application/vnd.ms-excel", &mut reader).await
    }

    async fn download_bytes(store: &FileStore, name: &str) -> Vec<u8> {
        let download = store.download(name).await.unwrap();
        let chunks: Vec<Bytes> = download.stream.try_collect().await.unwrap();
        chunks.concat()
    }

    #[tokio::test]
    async fn test_rejected_names_never_touch_storage() {
        let counting = Arc::new(CountingStorage::default());
        let store = FileStore::new(counting.clone(), AllowList::spreadsheets());

        assert!(matches!(
            upload_bytes(&store, "malware.exe", b"MZ").await,
            Err(AppError::DisallowedExtension(_))
        ));
        assert!(matches!(
            upload_bytes(&store, "../", b"x").await,
            Err(AppError::InvalidName(_))
        ));
        assert!(matches!(
            store.download("notes.txt").await,
            Err(AppError::DisallowedExtension(_))
        ));
        assert!(matches!(
            store.delete("..").await,
            Err(AppError::InvalidName(_))
        ));
        assert!(matches!(
            store.delete("run.sh").await,
            Err(AppError::DisallowedExtension(_))
        ));

        assert_eq!(counting.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_validate_name_strips_directories() {
        let store = FileStore::new(Arc::new(CountingStorage::default()), AllowList::spreadsheets());
        assert_eq!(
            store.validate_name("../../tmp/Budget.XLSX").unwrap(),
            "Budget.XLSX"
        );
    }

    #[cfg(feature = "storage-local")]
    mod local {
        use super::*;
        use sheetvault_storage::LocalStorage;

        async fn store() -> (tempfile::TempDir, FileStore) {
            let dir = tempfile::tempdir().unwrap();
            let storage = LocalStorage::new(dir.path()).await.unwrap();
            (dir, FileStore::new(Arc::new(storage), AllowList::spreadsheets()))
        }

        #[tokio::test]
        async fn test_repeated_uploads_get_numbered_names() {
            let (_dir, store) = store().await;

            assert_eq!(upload_bytes(&store, "report.xlsx", b"one").await.unwrap(), "report.xlsx");
            assert_eq!(upload_bytes(&store, "report.xlsx", b"two").await.unwrap(), "report (1).xlsx");
            assert_eq!(upload_bytes(&store, "report.xlsx", b"three").await.unwrap(), "report (2).xlsx");

            assert_eq!(download_bytes(&store, "report.xlsx").await, b"one");
            assert_eq!(download_bytes(&store, "report (1).xlsx").await, b"two");
            assert_eq!(download_bytes(&store, "report (2).xlsx").await, b"three");
        }

        #[tokio::test]
        async fn test_upload_strips_path_components() {
            let (dir, store) = store().await;

            let name = upload_bytes(&store, "../../escape.xls", b"data").await.unwrap();
            assert_eq!(name, "escape.xls");
            assert!(dir.path().join("escape.xls").is_file());
        }

        #[tokio::test]
        async fn test_list_hides_foreign_files() {
            let (dir, store) = store().await;
            upload_bytes(&store, "a.xlsx", b"12345").await.unwrap();
            std::fs::write(dir.path().join("readme.txt"), b"hi").unwrap();

            let files = store.list().await.unwrap();
            assert_eq!(files.len(), 1);
            assert_eq!(files[0].name, "a.xlsx");
            assert_eq!(files[0].size_bytes, 5);
            assert!(files[0].last_modified.is_some());
        }

        #[tokio::test]
        async fn test_disallowed_download_is_rejected_even_if_present() {
            let (dir, store) = store().await;
            std::fs::write(dir.path().join("secret.txt"), b"hidden").unwrap();

            assert!(matches!(
                store.download("secret.txt").await,
                Err(AppError::DisallowedExtension(_))
            ));
        }

        #[tokio::test]
        async fn test_download_missing_is_not_found() {
            let (_dir, store) = store().await;
            assert!(matches!(
                store.download("ghost.xlsx").await,
                Err(AppError::NotFound(_))
            ));
        }

        #[tokio::test]
        async fn test_delete_is_idempotent() {
            let (dir, store) = store().await;
            upload_bytes(&store, "gone.xlsb", b"x").await.unwrap();

            store.delete("gone.xlsb").await.unwrap();
            assert!(!dir.path().join("gone.xlsb").exists());
            store.delete("gone.xlsb").await.unwrap();
        }
    }

    #[cfg(feature = "storage-s3")]
    mod bucket {
        use super::*;
        use object_store::memory::InMemory;
        use sheetvault_storage::S3Storage;

        fn store() -> FileStore {
            let storage = S3Storage::with_store(
                Arc::new(InMemory::new()),
                "test-bucket".to_string(),
                "excel-files",
            );
            FileStore::new(Arc::new(storage), AllowList::spreadsheets())
        }

        #[tokio::test]
        async fn test_bucket_round_trip_and_numbering() {
            let store = store();

            assert_eq!(upload_bytes(&store, "Q1.xlsm", b"first").await.unwrap(), "Q1.xlsm");
            assert_eq!(upload_bytes(&store, "Q1.xlsm", b"second").await.unwrap(), "Q1 (1).xlsm");
            assert_eq!(download_bytes(&store, "Q1 (1).xlsm").await, b"second");

            let mut names: Vec<String> = store.list().await.unwrap().into_iter().map(|f| f.name).collect();
            names.sort();
            assert_eq!(names, vec!["Q1 (1).xlsm", "Q1.xlsm"]);
        }

        #[tokio::test]
        async fn test_bucket_delete_missing_is_ok() {
            let store = store();
            store.delete("never-there.xls").await.unwrap();
            assert!(matches!(
                store.download("never-there.xls").await,
                Err(AppError::NotFound(_))
            ));
        }
    }
}
