//! Shared name-to-key mapping for storage backends.
//!
//! Backends only ever address objects directly under their root, so a valid
//! name is a single non-empty path segment.

use crate::traits::{StorageError, StorageResult};

/// Reject names that are empty, relative segments, or contain a separator or NUL.
pub fn validate_name(name: &str) -> StorageResult<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\', '\0']) {
        return Err(StorageError::InvalidKey(format!(
            "{:?} is not a bare file name",
            name
        )));
    }
    Ok(())
}

/// Object path for `name` under the bucket prefix.
///
/// The name is used as the literal key segment, matching how listings report
/// keys, so every listed name can be addressed again.
#[cfg(feature = "storage-s3")]
pub fn object_path(
    prefix: &object_store::path::Path,
    name: &str,
) -> StorageResult<object_store::path::Path> {
    validate_name(name)?;
    let key = if prefix.as_ref().is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", prefix, name)
    };
    object_store::path::Path::parse(&key)
        .map_err(|e| StorageError::InvalidKey(format!("{:?} is not a valid object key: {}", name, e)))
}

/// Logical name for an object location, or `None` when the object is not a
/// direct child of the prefix.
#[cfg(feature = "storage-s3")]
pub fn name_from_location(
    prefix: &object_store::path::Path,
    location: &object_store::path::Path,
) -> Option<String> {
    let mut parts = location.prefix_match(prefix)?;
    let part = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    Some(part.as_ref().to_string())
}
