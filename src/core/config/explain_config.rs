/// Configuration for explain-bridge
///
/// One TOML document with an `[inference]`, a `[prompt]` and an `[analysis]`
/// section. Every field has a default, so a partial file is valid.
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::constants::{inference, limits};
use crate::core::errors::{ConfigError, ExplainError, FileError, ParseError};
use crate::core::method_context::PromptTemplate;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplainConfig {
    /// Chat-completions endpoint settings
    pub inference: InferenceConfig,

    /// Wording wrapped around the extracted context
    pub prompt: PromptTemplate,

    /// Source file limits
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub system_prompt: String,
    pub timeout_seconds: u64,
    /// Inline key; prefer `api_key_env` outside of local setups
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Environment variable consulted when `api_key` is unset
    pub api_key_env: String,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: inference::BASE_URL.to_string(),
            model: inference::MODEL.to_string(),
            max_tokens: inference::MAX_TOKENS,
            temperature: inference::TEMPERATURE,
            system_prompt: inference::SYSTEM_PROMPT.to_string(),
            timeout_seconds: inference::TIMEOUT_SECONDS,
            api_key: None,
            api_key_env: inference::API_KEY_ENV.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub max_file_size_kb: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_file_size_kb: limits::MAX_FILE_SIZE_KB,
        }
    }
}

/// Shape of the JSON key file kept next to the configuration
#[derive(Debug, Deserialize)]
struct KeyFile {
    api_key: Option<String>,
}

impl ExplainConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from file, falling back to defaults if file doesn't exist
    pub async fn load_or_default(path: &Path) -> Result<Self, ExplainError> {
        if path.exists() {
            Self::load(path).await
        } else {
            tracing::debug!(path = %path.display(), "No configuration file, using defaults");
            Ok(Self::new())
        }
    }

    /// Load configuration from TOML file
    pub async fn load(path: &Path) -> Result<Self, ExplainError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| FileError::read_error(path.to_path_buf(), e))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| ParseError::toml_error(path.display().to_string(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub async fn save(&self, path: &Path) -> Result<(), ExplainError> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| FileError::write_error(parent.to_path_buf(), e))?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Serialization {
            reason: e.to_string(),
        })?;
        tokio::fs::write(path, content)
            .await
            .map_err(|e| FileError::write_error(path.to_path_buf(), e))?;
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let inference = &self.inference;

        if !(inference.base_url.starts_with("http://") || inference.base_url.starts_with("https://")) {
            return Err(ConfigError::invalid_value(
                "inference.base_url",
                &inference.base_url,
                "must be an http(s) URL",
            ));
        }

        if inference.model.trim().is_empty() {
            return Err(ConfigError::invalid_value("inference.model", &inference.model, "must not be empty"));
        }

        if inference.max_tokens == 0 {
            return Err(ConfigError::invalid_value(
                "inference.max_tokens",
                inference.max_tokens,
                "must be greater than 0",
            ));
        }

        if !(0.0..=2.0).contains(&inference.temperature) {
            return Err(ConfigError::invalid_value(
                "inference.temperature",
                inference.temperature,
                "must be between 0.0 and 2.0",
            ));
        }

        if inference.timeout_seconds == 0 || inference.timeout_seconds > 600 {
            return Err(ConfigError::invalid_value(
                "inference.timeout_seconds",
                inference.timeout_seconds,
                "must be between 1 and 600",
            ));
        }

        if self.analysis.max_file_size_kb == 0 {
            return Err(ConfigError::invalid_value(
                "analysis.max_file_size_kb",
                self.analysis.max_file_size_kb,
                "must be greater than 0",
            ));
        }

        Ok(())
    }

    /// Resolve the API key: inline value, then the configured environment
    /// variable, then the JSON key file. `None` when no source has one.
    pub async fn resolve_api_key(&self, key_file: &Path) -> Option<String> {
        let non_empty = |key: String| (!key.trim().is_empty()).then(|| key.trim().to_string());

        if let Some(key) = self.inference.api_key.clone().and_then(non_empty) {
            tracing::debug!("Using API key from configuration file");
            return Some(key);
        }

        if let Some(key) = std::env::var(&self.inference.api_key_env).ok().and_then(non_empty) {
            tracing::debug!(variable = %self.inference.api_key_env, "Using API key from environment");
            return Some(key);
        }

        let content = tokio::fs::read_to_string(key_file).await.ok()?;
        match serde_json::from_str::<KeyFile>(&content) {
            Ok(KeyFile { api_key }) => {
                let key = api_key.and_then(non_empty);
                if key.is_some() {
                    tracing::debug!(path = %key_file.display(), "Using API key from key file");
                }
                key
            }
            Err(e) => {
                let error = ParseError::json_error(key_file.display().to_string(), e);
                tracing::warn!(error = %error, "Ignoring unreadable key file");
                None
            }
        }
    }

    /// Copy safe to print: the inline API key is masked
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.inference.api_key.is_some() {
            config.inference.api_key = Some("********".to_string());
        }
        config
    }
}
