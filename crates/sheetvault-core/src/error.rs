//! Error types module
//!
//! All failures the file service can report are unified under [`AppError`].
//! Each variant describes its own HTTP presentation through [`ErrorMetadata`],
//! so transport layers never match on variants themselves.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like resource limits
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "DISALLOWED_EXTENSION")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden from clients
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid file name: {0}")]
    InvalidName(String),

    #[error("Disallowed extension: {0}")]
    DisallowedExtension(String),

    #[error("No file provided")]
    NoFileProvided,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Name conflict: {0}")]
    NameConflict(String),

    #[error("No free name for {name} after {attempts} attempts")]
    ResourceExhausted { name: String, attempts: u32 },

    #[error("Storage failure: {0}")]
    StorageFailure(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::InvalidName(_) => (
            400,
            "INVALID_NAME",
            false,
            Some("Send a non-empty file name"),
            false,
            LogLevel::Debug,
        ),
        AppError::DisallowedExtension(_) => (
            400,
            "DISALLOWED_EXTENSION",
            false,
            Some("Only .xls, .xlsx, .xlsm and .xlsb files are accepted"),
            false,
            LogLevel::Debug,
        ),
        AppError::NoFileProvided => (
            400,
            "NO_FILE_PROVIDED",
            false,
            Some("Send the spreadsheet in a multipart field named 'excel'"),
            false,
            LogLevel::Debug,
        ),
        AppError::InvalidInput(_) => (
            400,
            "INVALID_INPUT",
            false,
            Some("Check request format and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::NotFound(_) => (
            404,
            "NOT_FOUND",
            false,
            Some("Refresh the file list"),
            false,
            LogLevel::Debug,
        ),
        AppError::NameConflict(_) => (
            409,
            "NAME_CONFLICT",
            true,
            Some("Retry the upload"),
            false,
            LogLevel::Warn,
        ),
        AppError::ResourceExhausted { .. } => (
            507,
            "RESOURCE_EXHAUSTED",
            false,
            Some("Rename the file or delete old copies"),
            false,
            LogLevel::Warn,
        ),
        AppError::StorageFailure(_) => (
            500,
            "STORAGE_FAILURE",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::InvalidName(_) => "InvalidName",
            AppError::DisallowedExtension(_) => "DisallowedExtension",
            AppError::NoFileProvided => "NoFileProvided",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::NotFound(_) => "NotFound",
            AppError::NameConflict(_) => "NameConflict",
            AppError::ResourceExhausted { .. } => "ResourceExhausted",
            AppError::StorageFailure(_) => "StorageFailure",
            AppError::Internal(_) | AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::InvalidName(_) => "File name is empty or invalid".to_string(),
            AppError::DisallowedExtension(_) => "Only spreadsheet files can be stored".to_string(),
            AppError::NoFileProvided => "No file to upload".to_string(),
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::NotFound(_) => "File not found".to_string(),
            AppError::NameConflict(ref name) => {
                format!("Another upload claimed the name {} first", name)
            }
            AppError::ResourceExhausted { ref name, .. } => {
                format!("Too many files named like {}", name)
            }
            AppError::StorageFailure(_) => "Failed to access storage".to_string(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "Internal server error".to_string()
            }
        }
    }
}
