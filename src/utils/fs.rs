use crate::error::{GoupError, Result};
use std::path::Path;

fn map_io(path: &Path, e: std::io::Error) -> GoupError {
    match e.kind() {
        std::io::ErrorKind::PermissionDenied => GoupError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => GoupError::from(e),
    }
}

pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path).map_err(|e| map_io(path, e))?;
    }
    Ok(())
}

pub fn ensure_parent_exists(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir_exists(parent),
        _ => Ok(()),
    }
}

/// Removes a single file. Any failure, missing file included, is an IO error.
pub fn remove_file(path: &Path) -> Result<()> {
    std::fs::remove_file(path)?;
    Ok(())
}
