//! Platform-aware configuration paths for explain-bridge

use std::env;
use std::path::{Path, PathBuf};

use crate::core::constants::paths;
use crate::core::errors::ConfigError;

/// Get the appropriate configuration directory for the current platform
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    if let Ok(custom_dir) = env::var(paths::CONFIG_DIR_ENV) {
        return Ok(PathBuf::from(custom_dir));
    }

    dirs::config_dir()
        .map(|p| p.join(paths::APP_DIR))
        .ok_or(ConfigError::NoConfigDir)
}

/// Default location of the TOML configuration file
pub fn config_file() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join(paths::CONFIG_FILE))
}

/// JSON key file living next to a configuration file
pub fn key_file_for(config_file: &Path) -> PathBuf {
    config_file
        .parent()
        .map(|dir| dir.join(paths::KEY_FILE))
        .unwrap_or_else(|| PathBuf::from(paths::KEY_FILE))
}
