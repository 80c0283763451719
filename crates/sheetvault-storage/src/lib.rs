//! SheetVault Storage Library
//!
//! This crate provides the [`Storage`] abstraction and its two implementations:
//! a local directory and an S3-compatible bucket under a fixed key prefix.
//!
//! # Naming
//!
//! Backends address objects by bare file name (`report (1).xlsx`), never by a
//! path. The local backend maps a name to `{root}/{name}`; the bucket backend
//! maps it to `{prefix}/{name}`. Names containing separators or relative
//! segments are rejected with [`StorageError::InvalidKey`].

pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use sheetvault_core::StorageBackend;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{ByteStream, Storage, StorageEntry, StorageError, StorageResult};
