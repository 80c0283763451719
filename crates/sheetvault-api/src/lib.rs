//! SheetVault API Library
//!
//! This crate provides the HTTP handlers, error rendering, middleware, and
//! application setup for the spreadsheet file service.

// Module declarations
mod api_doc;
mod handlers;
mod middleware;
pub mod setup;
mod telemetry;

// Public modules
pub mod error;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
