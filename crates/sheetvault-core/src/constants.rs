//! Shared constants

/// Spreadsheet extensions accepted by the service (lower-case, dot included).
pub const ALLOWED_EXTENSIONS: [&str; 4] = [".xls", ".xlsx", ".xlsm", ".xlsb"];

/// Upper bound on candidate names tried while resolving a collision.
pub const MAX_NAME_ATTEMPTS: u32 = 10_000;

/// Multipart field names that carry the uploaded file. `excel` is the primary name.
pub const UPLOAD_FIELD_NAMES: [&str; 2] = ["excel", "file"];

/// Content type used when the client does not send one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Default directory for the local backend.
pub const DEFAULT_LOCAL_STORAGE_PATH: &str = "root/excel-files";

/// Default key prefix for the bucket backend.
pub const DEFAULT_STORAGE_PREFIX: &str = "excel-files";
