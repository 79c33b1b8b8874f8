use anyhow::Result;
use async_trait::async_trait;

pub mod config;
pub mod context;
pub mod explain;

/// Trait for CLI command implementations
#[async_trait]
pub trait Command {
    /// Execute the command with the given arguments
    async fn execute(&self) -> Result<()>;
}

/// Common utilities for command implementations
pub mod utils {
    use anyhow::{Context, Result};
    use std::path::{Path, PathBuf};
    use tokio::io::{AsyncRead, AsyncReadExt};

    use crate::config::paths;
    use crate::core::config::ExplainConfig;
    use crate::core::errors::{ExplainError, FileError};
    use crate::core::utils::FileUtils;

    /// Resolve the configuration path and load it, defaults when absent
    pub async fn load_config(path: Option<&Path>) -> Result<(ExplainConfig, PathBuf)> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => paths::config_file()?,
        };
        let config = ExplainConfig::load_or_default(&path)
            .await
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
        Ok((config, path))
    }

    /// Read the source from `file`, or from piped stdin when no file is given
    pub async fn read_source(file: Option<&Path>, max_size_kb: u64) -> Result<String, ExplainError> {
        if let Some(file) = file {
            return Ok(FileUtils::read_source(file, max_size_kb).await?);
        }

        let stdin = PathBuf::from("<stdin>");
        if atty::is(atty::Stream::Stdin) {
            return Err(FileError::InvalidPath {
                path: "no file given and stdin is a terminal".to_string(),
            }
            .into());
        }

        read_limited(tokio::io::stdin(), stdin, max_size_kb).await
    }

    /// Read at most one byte past `max_size_kb` so oversize input is rejected
    /// without buffering all of it
    pub async fn read_limited<R>(reader: R, name: PathBuf, max_size_kb: u64) -> Result<String, ExplainError>
    where
        R: AsyncRead + Unpin,
    {
        let limit = max_size_kb.saturating_mul(1024);
        let mut bytes = Vec::new();
        reader
            .take(limit.saturating_add(1))
            .read_to_end(&mut bytes)
            .await
            .map_err(|e| FileError::read_error(name.clone(), e))?;

        if bytes.len() as u64 > limit {
            return Err(FileError::TooLarge {
                path: name,
                size_kb: (bytes.len() as u64 + 1023) / 1024,
                limit_kb: max_size_kb,
            }
            .into());
        }

        String::from_utf8(bytes).map_err(|_| FileError::NotUtf8 { path: name }.into())
    }
}
