use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A spreadsheet held in the storage root. Identity is `name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Bare file name, never contains a directory component
    pub name: String,
    pub size_bytes: u64,
    /// `None` when the backend cannot report a modification time
    pub last_modified: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FileResponse {
    pub name: String,
    pub size: u64,
    /// Human-readable size, e.g. `12.5 KB`
    pub size_label: String,
    pub updated: Option<DateTime<Utc>>,
}

impl From<StoredFile> for FileResponse {
    fn from(file: StoredFile) -> Self {
        FileResponse {
            size_label: format_bytes(file.size_bytes),
            name: file.name,
            size: file.size_bytes,
            updated: file.last_modified,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FileListResponse {
    pub files: Vec<FileResponse>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadedFileRef {
    /// Name the file was stored under, possibly with a ` (n)` suffix
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub ok: bool,
    pub file: UploadedFileRef,
}

impl UploadResponse {
    pub fn stored(name: String) -> Self {
        Self {
            ok: true,
            file: UploadedFileRef { name },
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OkResponse {
    pub ok: bool,
}

/// Format a byte count with binary units: `0 B`, `512 B`, `1.5 KB`, `3.0 MB`.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut index = 0;
    let mut value = bytes as f64;
    while value >= 1024.0 && index < UNITS.len() - 1 {
        value /= 1024.0;
        index += 1;
    }

    if index == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1024), "1.0 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024 * 1024), "3072.0 GB");
    }

    #[test]
    fn test_file_response_serialization() {
        let file = StoredFile {
            name: "report.xlsx".to_string(),
            size_bytes: 2048,
            last_modified: Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()),
        };

        let json = serde_json::to_value(FileResponse::from(file)).unwrap();
        assert_eq!(json["name"], "report.xlsx");
        assert_eq!(json["size"], 2048);
        assert_eq!(json["size_label"], "2.0 KB");
        assert_eq!(json["updated"], "2024-05-01T12:00:00Z");
    }

    #[test]
    fn test_missing_timestamp_serializes_as_null() {
        let file = StoredFile {
            name: "a.xls".to_string(),
            size_bytes: 0,
            last_modified: None,
        };

        let json = serde_json::to_value(FileResponse::from(file)).unwrap();
        assert!(json["updated"].is_null());
    }
}
