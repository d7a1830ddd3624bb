//! Error types for the adapter.

pub mod kind;

pub use kind::ErrorKind;

use thiserror::Error;

/// Primary error type for all adapter operations.
#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid envelope: {0}")]
    InvalidEnvelope(String),

    #[error("Invalid base64 body: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Invalid JSON payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Throttled by agent runtime: {0}")]
    Throttled(String),

    #[error("Agent runtime error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Request signing failed: {0}")]
    Signing(String),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Response chunk is not valid UTF-8: {0}")]
    ChunkEncoding(#[from] std::str::Utf8Error),

    #[error("Response chunk is not valid JSON: {0}")]
    ChunkDecode(#[source] serde_json::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),
}

impl AdapterError {
    /// Create an API error from a runtime status and message.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Classify this error by the pipeline stage that produced it.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::MissingField(_) => ErrorKind::Validation,
            Self::InvalidEnvelope(_) | Self::Base64(_) | Self::InvalidPayload(_) => {
                ErrorKind::Decode
            }
            Self::Network(_)
            | Self::Authentication(_)
            | Self::Throttled(_)
            | Self::Api { .. }
            | Self::Signing(_)
            | Self::Stream(_) => ErrorKind::Invoke,
            Self::ChunkEncoding(_) | Self::ChunkDecode(_) => ErrorKind::ResponseParse,
            Self::Serialization(_) => ErrorKind::Encode,
        }
    }

    /// HTTP status code reported to the caller for this error.
    ///
    /// Only validation failures get a dedicated status; everything else
    /// collapses into 500.
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::Validation => 400,
            _ => 500,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, AdapterError>;
