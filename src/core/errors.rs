/// Domain-specific error types for explain-bridge using thiserror
///
/// The extraction core itself never fails; these cover the outer surfaces:
/// reading source files, parsing, configuration and the inference endpoint.
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for explain-bridge operations
#[derive(Error, Debug)]
pub enum ExplainError {
    #[error("File operation failed")]
    File(#[from] FileError),

    #[error("Parsing failed")]
    Parse(#[from] ParseError),

    #[error("Configuration error")]
    Config(#[from] ConfigError),

    #[error("Inference failed")]
    Inference(#[from] InferenceError),
}

/// File operation errors
#[derive(Error, Debug)]
pub enum FileError {
    #[error("Failed to read file {path}: {reason}")]
    ReadFailed {
        path: PathBuf,
        reason: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write file {path}: {reason}")]
    WriteFailed {
        path: PathBuf,
        reason: String,
        #[source]
        source: io::Error,
    },

    #[error("File not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Invalid file path: {path}")]
    InvalidPath { path: String },

    #[error("File already exists: {path}")]
    AlreadyExists { path: PathBuf },

    #[error("File {path} is {size_kb}KB, limit is {limit_kb}KB")]
    TooLarge {
        path: PathBuf,
        size_kb: u64,
        limit_kb: u64,
    },

    #[error("File {path} is not valid UTF-8")]
    NotUtf8 { path: PathBuf },
}

/// Parsing errors for source files and configuration documents
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to load the Python grammar: {message}")]
    Language { message: String },

    #[error("Parser produced no syntax tree")]
    ParseFailed,

    #[error("JSON parsing failed in {context}: {message}")]
    Json {
        context: String,
        message: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("TOML parsing failed in {context}: {message}")]
    Toml {
        context: String,
        message: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Could not determine the configuration directory")]
    NoConfigDir,

    #[error("Failed to serialize configuration: {reason}")]
    Serialization { reason: String },
}

/// Errors talking to the inference endpoint
#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("No API key configured")]
    MissingApiKey,

    #[error("Request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("Endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {reason}")]
    MalformedResponse { reason: String },

    #[error("Response contained no choices")]
    EmptyResponse,

    #[error("No response within {seconds}s")]
    Timeout { seconds: u64 },
}

/// Opaque marker for a failed inference call; the cause has already been logged
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("inference failed")]
pub struct InferenceFailure;

impl From<InferenceError> for InferenceFailure {
    fn from(err: InferenceError) -> Self {
        tracing::warn!(error = %err, "Inference request failed");
        InferenceFailure
    }
}

/// Helper functions for common error patterns
impl FileError {
    pub fn read_error(path: PathBuf, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => FileError::NotFound { path },
            io::ErrorKind::InvalidData => FileError::NotUtf8 { path },
            _ => FileError::ReadFailed {
                path,
                reason: source.to_string(),
                source,
            },
        }
    }

    pub fn write_error(path: PathBuf, source: io::Error) -> Self {
        FileError::WriteFailed {
            path,
            reason: source.to_string(),
            source,
        }
    }
}

impl ConfigError {
    pub fn invalid_value(field: &str, value: impl ToString, reason: &str) -> Self {
        ConfigError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl ParseError {
    pub fn json_error(context: impl Into<String>, source: serde_json::Error) -> Self {
        ParseError::Json {
            context: context.into(),
            message: source.to_string(),
            source,
        }
    }

    pub fn toml_error(context: impl Into<String>, source: toml::de::Error) -> Self {
        ParseError::Toml {
            context: context.into(),
            message: source.to_string(),
            source,
        }
    }
}
