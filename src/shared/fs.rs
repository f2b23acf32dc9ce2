//! Guarded file access shared by every filesystem adapter.
//!
//! Reads reject symlinks and oversized files; writes go through a temp file
//! in the target directory and are renamed over the target, so a crash
//! never leaves a half-written catalog behind.

use crate::shared::error::CatalogError;
use crate::shared::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::SystemTime;
use tempfile::NamedTempFile;

/// Maximum file size accepted by `read_source` (100 MB)
pub const MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Reads a backing file, returning `None` when it does not exist.
///
/// # Errors
/// Returns `CatalogError::FileReadError` if the path is a symlink, not a
/// regular file, too large, or unreadable.
pub fn read_source(path: &Path) -> Result<Option<String>> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(CatalogError::FileReadError {
                path: path.to_path_buf(),
                details: e.to_string(),
            }
            .into())
        }
    };

    if metadata.is_symlink() {
        return Err(CatalogError::FileReadError {
            path: path.to_path_buf(),
            details: "Security: symbolic links are not allowed".to_string(),
        }
        .into());
    }

    if !metadata.is_file() {
        return Err(CatalogError::FileReadError {
            path: path.to_path_buf(),
            details: "not a regular file".to_string(),
        }
        .into());
    }

    if metadata.len() > MAX_FILE_SIZE {
        return Err(CatalogError::FileReadError {
            path: path.to_path_buf(),
            details: format!(
                "file is too large ({} bytes). Maximum allowed size is {} bytes",
                metadata.len(),
                MAX_FILE_SIZE
            ),
        }
        .into());
    }

    fs::read_to_string(path).map(Some).map_err(|e| {
        CatalogError::FileReadError {
            path: path.to_path_buf(),
            details: e.to_string(),
        }
        .into()
    })
}

/// Parses JSON read from `path`, mapping failures to `MalformedSource`.
pub fn parse_json<T: DeserializeOwned>(path: &Path, content: &str) -> Result<T> {
    serde_json::from_str(content).map_err(|e| {
        CatalogError::MalformedSource {
            path: path.to_path_buf(),
            details: e.to_string(),
        }
        .into()
    })
}

/// Reads and parses a JSON file; `None` when the file is absent.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match read_source(path)? {
        Some(content) => parse_json(path, &content).map(Some),
        None => Ok(None),
    }
}

/// Replaces `path` with `content` via temp-file-and-rename.
///
/// Parent directories are created on demand.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let write_error = |details: String| CatalogError::FileWriteError {
        path: path.to_path_buf(),
        details,
    };

    if let Ok(metadata) = fs::symlink_metadata(path) {
        if metadata.is_symlink() {
            return Err(write_error(
                "Security: writing to symbolic links is not allowed".to_string(),
            )
            .into());
        }
    }

    let parent = match path.parent() {
        Some(parent) if parent != Path::new("") => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| write_error(e.to_string()))?;

    let mut temp = NamedTempFile::new_in(parent).map_err(|e| write_error(e.to_string()))?;
    temp.write_all(content.as_bytes())
        .and_then(|_| temp.flush())
        .map_err(|e| write_error(e.to_string()))?;
    temp.persist(path)
        .map_err(|e| write_error(e.error.to_string()))?;
    Ok(())
}

/// Serializes `value` as pretty JSON and writes it atomically.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut content = serde_json::to_string_pretty(value)?;
    content.push('\n');
    write_atomic(path, &content)
}

/// Modification time of `path`, or `None` if it cannot be read.
pub fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}
