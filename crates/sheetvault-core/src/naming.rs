//! File naming rules
//!
//! Every client-supplied name passes through [`sanitize_file_name`] and
//! [`AllowList::is_allowed`] before it reaches a storage backend. Together they
//! keep names inside the storage root and limit the visible namespace to
//! spreadsheet files.

use std::collections::BTreeSet;

use crate::constants::{ALLOWED_EXTENSIONS, DEFAULT_CONTENT_TYPE};

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Reduce an untrusted name to its final path segment.
///
/// Both `/` and `\` count as separators and trailing separators are ignored,
/// so `"a/b/"` yields `"b"`. The relative segments `.` and `..` yield an empty
/// string, which no later check accepts. The result never contains a
/// separator and sanitizing it again returns it unchanged.
pub fn sanitize_file_name(raw: &str) -> String {
    let trimmed = raw.trim_end_matches(is_separator);
    let segment = trimmed.rsplit(is_separator).next().unwrap_or("");

    match segment {
        "." | ".." => String::new(),
        other => other.to_string(),
    }
}

/// Split a bare file name into `(stem, extension)`.
///
/// The extension starts at the last `.` and keeps the dot. A name whose only
/// dot is the leading one (`.xlsx`) is a hidden file with no extension.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        None | Some(0) => (name, ""),
        Some(idx) => name.split_at(idx),
    }
}

/// Build the `counter`-th collision candidate, e.g. `report (2).xlsx`.
pub fn candidate_name(stem: &str, extension: &str, counter: u32) -> String {
    format!("{} ({}){}", stem, counter, extension)
}

/// Spreadsheet MIME type for a file name, falling back to octet-stream.
pub fn content_type_for(name: &str) -> &'static str {
    let (_, extension) = split_extension(final_segment(name));
    match extension.to_lowercase().as_str() {
        ".xls" => "application/vnd.ms-excel",
        ".xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        ".xlsm" => "application/vnd.ms-excel.sheet.macroEnabled.12",
        ".xlsb" => "application/vnd.ms-excel.sheet.binary.macroEnabled.12",
        _ => DEFAULT_CONTENT_TYPE,
    }
}

fn final_segment(name: &str) -> &str {
    name.rsplit(is_separator).next().unwrap_or("")
}

/// Immutable set of permitted extensions, compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowList {
    extensions: BTreeSet<String>,
}

impl AllowList {
    /// The fixed spreadsheet allow-list: `.xls`, `.xlsx`, `.xlsm`, `.xlsb`.
    pub fn spreadsheets() -> Self {
        Self {
            extensions: ALLOWED_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// Whether the extension of the name's final segment is in the list.
    /// Names without an extension are never allowed.
    pub fn is_allowed(&self, name: &str) -> bool {
        let (_, extension) = split_extension(final_segment(name));
        !extension.is_empty() && self.extensions.contains(&extension.to_lowercase())
    }
}

impl Default for AllowList {
    fn default() -> Self {
        Self::spreadsheets()
    }
}
