//! Listing of visible files
//!
//! Only entries whose extension passes the allow-list are visible. The result
//! is sorted newest first; entries without a modification time sort last.

use sheetvault_core::models::StoredFile;
use sheetvault_core::AllowList;
use sheetvault_storage::{Storage, StorageEntry, StorageResult};

/// Enumerate the backend and return the visible files, newest first.
pub async fn list_stored_files(
    storage: &dyn Storage,
    allow_list: &AllowList,
) -> StorageResult<Vec<StoredFile>> {
    let entries = storage.enumerate().await?;
    let total = entries.len();

    let files = sort_newest_first(
        entries
            .into_iter()
            .filter(|entry| allow_list.is_allowed(&entry.name))
            .map(stored_file)
            .collect(),
    );

    tracing::debug!(total, visible = files.len(), "Listed storage root");
    Ok(files)
}

fn stored_file(entry: StorageEntry) -> StoredFile {
    StoredFile {
        name: entry.name,
        size_bytes: entry.size_bytes,
        last_modified: entry.last_modified,
    }
}

/// Stable sort, descending by `last_modified`; `None` orders before every
/// timestamp and therefore ends up last.
pub fn sort_newest_first(mut files: Vec<StoredFile>) -> Vec<StoredFile> {
    files.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
    files
}
