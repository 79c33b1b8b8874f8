//! Path validation for user-supplied source file paths

use std::path::{Path, PathBuf};

use crate::core::errors::FileError;

/// Validates a user-provided source path and resolves it to a canonical file path
pub fn validate_path(path: &Path) -> Result<PathBuf, FileError> {
    let invalid = || FileError::InvalidPath {
        path: path.display().to_string(),
    };

    let path_str = path.to_str().ok_or_else(invalid)?;
    if path_str.is_empty() || path_str.contains('\0') {
        return Err(invalid());
    }

    let canonical = path
        .canonicalize()
        .map_err(|e| FileError::read_error(path.to_path_buf(), e))?;

    if !canonical.is_file() {
        return Err(invalid());
    }

    Ok(canonical)
}
