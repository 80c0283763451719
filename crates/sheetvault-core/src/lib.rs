//! SheetVault Core Library
//!
//! This crate provides the domain models, error types, configuration, and
//! file naming rules shared across all SheetVault components.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod naming;
pub mod storage_types;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use naming::{sanitize_file_name, AllowList};
pub use storage_types::StorageBackend;
// Note: Storage, StorageError, StorageResult live in sheetvault-storage
