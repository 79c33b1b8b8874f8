use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

use crate::core::errors::FileError;
use crate::security::validate_path;

/// Common file operation utilities with standardized error handling
pub struct FileUtils;

impl FileUtils {
    /// Read a Python source file after validating its path and size
    pub async fn read_source(path: &Path, max_size_kb: u64) -> Result<String, FileError> {
        let path = validate_path(path)?;

        let metadata = fs::metadata(&path)
            .await
            .map_err(|e| FileError::read_error(path.clone(), e))?;
        let size_kb = (metadata.len() + 1023) / 1024;
        if size_kb > max_size_kb {
            return Err(FileError::TooLarge {
                path,
                size_kb,
                limit_kb: max_size_kb,
            });
        }

        let source = fs::read_to_string(&path)
            .await
            .map_err(|e| FileError::read_error(path.clone(), e))?;
        tracing::debug!(path = %path.display(), bytes = source.len(), "Read source file");
        Ok(source)
    }

    /// Refuse to overwrite an existing file unless `force` is set
    pub fn ensure_writable(path: &Path, force: bool) -> Result<(), FileError> {
        if path.exists() && !force {
            return Err(FileError::AlreadyExists {
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }
}

/// Common serialization utilities
pub struct SerdeUtils;

impl SerdeUtils {
    /// Serialize to JSON with pretty formatting
    pub fn to_json_pretty<T: serde::Serialize>(value: &T) -> Result<String> {
        serde_json::to_string_pretty(value).context("Failed to serialize to JSON")
    }

    /// Serialize to TOML with pretty formatting
    pub fn to_toml_pretty<T: serde::Serialize>(value: &T) -> Result<String> {
        toml::to_string_pretty(value).context("Failed to serialize to TOML")
    }
}
