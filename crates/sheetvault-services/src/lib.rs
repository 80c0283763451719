//! SheetVault Services Layer
//!
//! This crate is the business service layer: it composes the naming rules from
//! `sheetvault-core` with a `sheetvault-storage` backend into the four file
//! operations (list, upload, download, delete) and re-exports the storage API
//! so the HTTP crate depends on a single facade. Keep thin HTTP handling in
//! sheetvault-api.

pub mod file_store;
pub mod lister;
pub mod resolver;

pub use file_store::{FileDownload, FileStore};
pub use lister::{list_stored_files, sort_newest_first};
pub use resolver::resolve_unique_name;
pub use sheetvault_storage::{
    create_storage, ByteStream, Storage, StorageBackend, StorageEntry, StorageError,
    StorageResult,
};
#[cfg(feature = "storage-local")]
pub use sheetvault_storage::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use sheetvault_storage::S3Storage;
