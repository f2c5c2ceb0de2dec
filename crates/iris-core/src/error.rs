//! Error types for Iris.
//!
//! Every failure a caller can observe maps to a distinct [`ErrorKind`], so
//! a comparison entry or an HTTP response can say exactly what went wrong
//! without string matching.

use crate::types::Provider;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Iris operations.
#[derive(Error, Debug)]
pub enum IrisError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Analysis errors
    #[error("Analysis error: {0}")]
    Vision(#[from] VisionError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors raised while validating input, calling a provider, or persisting results.
#[derive(Error, Debug)]
pub enum VisionError {
    /// No API key is configured for the provider that was invoked
    #[error("{provider} API key not set. Set {env_var} or add it to the config file.")]
    MissingCredential {
        provider: Provider,
        env_var: &'static str,
    },

    /// Analysis type is not in the prompt registry
    #[error("Unknown analysis type: {0}")]
    UnknownAnalysisType(String),

    /// Provider identifier did not match any known provider
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// Custom prompt was empty or whitespace
    #[error("Prompt must not be empty")]
    EmptyPrompt,

    /// File extension or content is not a supported image format
    #[error("Unsupported image format: {format}")]
    UnsupportedFormat { format: String },

    /// Upload exceeds the size ceiling
    #[error("Image too large: {size_bytes} bytes > {max_bytes} bytes")]
    SizeExceeded { size_bytes: u64, max_bytes: u64 },

    /// Transport failure or timeout talking to the provider
    #[error("{provider} request failed: {message}")]
    NetworkFailure { provider: Provider, message: String },

    /// Provider answered with a non-success status or an unusable envelope
    #[error("{provider} error: {message}")]
    ProviderError {
        provider: Provider,
        status_code: Option<u16>,
        message: String,
    },

    /// Result file could not be written
    #[error("Failed to write {path}: {source}")]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Image or report file could not be read
    #[error("Failed to read {path}: {message}")]
    ReadFailure { path: PathBuf, message: String },
}

/// Stable, serialisable classification of a [`VisionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MissingCredential,
    UnknownAnalysisType,
    UnknownProvider,
    EmptyPrompt,
    UnsupportedFormat,
    SizeExceeded,
    NetworkFailure,
    ProviderError,
    WriteFailure,
    ReadFailure,
}

impl ErrorKind {
    /// The snake_case name used in JSON reports and HTTP responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingCredential => "missing_credential",
            Self::UnknownAnalysisType => "unknown_analysis_type",
            Self::UnknownProvider => "unknown_provider",
            Self::EmptyPrompt => "empty_prompt",
            Self::UnsupportedFormat => "unsupported_format",
            Self::SizeExceeded => "size_exceeded",
            Self::NetworkFailure => "network_failure",
            Self::ProviderError => "provider_error",
            Self::WriteFailure => "write_failure",
            Self::ReadFailure => "read_failure",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl VisionError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingCredential { .. } => ErrorKind::MissingCredential,
            Self::UnknownAnalysisType(_) => ErrorKind::UnknownAnalysisType,
            Self::UnknownProvider(_) => ErrorKind::UnknownProvider,
            Self::EmptyPrompt => ErrorKind::EmptyPrompt,
            Self::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            Self::SizeExceeded { .. } => ErrorKind::SizeExceeded,
            Self::NetworkFailure { .. } => ErrorKind::NetworkFailure,
            Self::ProviderError { .. } => ErrorKind::ProviderError,
            Self::WriteFailure { .. } => ErrorKind::WriteFailure,
            Self::ReadFailure { .. } => ErrorKind::ReadFailure,
        }
    }
}

/// Convenience type alias for Iris results.
pub type Result<T> = std::result::Result<T, IrisError>;

/// Convenience type alias for analysis results.
pub type VisionResult<T> = std::result::Result<T, VisionError>;
