use crate::error::{Result, StoreError};

/// Splits a `/`-separated logical path into segments that stay inside the
/// storage root. Empty segments from leading, trailing or doubled slashes are
/// ignored; `.` and `..` are rejected.
pub fn split_logical_path(logical_path: &str) -> Result<Vec<&str>> {
    let mut segments = Vec::new();
    for segment in logical_path.split('/') {
        if segment.is_empty() {
            continue;
        }
        if segment == "." || segment == ".." || segment.contains('\\') {
            return Err(StoreError::InvalidPath(logical_path.to_string()));
        }
        segments.push(segment);
    }
    if segments.is_empty() {
        return Err(StoreError::InvalidPath(logical_path.to_string()));
    }
    Ok(segments)
}

pub fn validate_file_name(name: &str) -> Result<()> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
    {
        return Err(StoreError::InvalidPath(name.to_string()));
    }
    Ok(())
}
