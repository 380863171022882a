//! Domain error types
//!
//! This module defines the error hierarchy for userbridge. All errors are
//! domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main userbridge error type
///
/// This is the primary error type used throughout the library. The first four
/// variants are the per-file failure taxonomy; any of them raised while a file
/// is being processed triggers that file's retry sequence.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Malformed top-level document shape
    #[error("Format error: {0}")]
    Format(String),

    /// Malformed individual record entry
    #[error("Decode error at record {index}: {message}")]
    Decode { index: usize, message: String },

    /// Filesystem read/write/move failure
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic retryable failure
    #[error("Transient error: {0}")]
    Transient(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization errors outside of record decoding
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl BridgeError {
    /// Creates a decode error for the record at `index`
    pub fn decode(index: usize, message: impl Into<String>) -> Self {
        BridgeError::Decode {
            index,
            message: message.into(),
        }
    }

    /// Short label for the error kind, used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            BridgeError::Format(_) => "format",
            BridgeError::Decode { .. } => "decode",
            BridgeError::Io(_) => "io",
            BridgeError::Transient(_) => "transient",
            BridgeError::Configuration(_) => "configuration",
            BridgeError::Serialization(_) => "serialization",
            BridgeError::Other(_) => "other",
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for BridgeError {
    fn from(err: std::io::Error) -> Self {
        BridgeError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            BridgeError::Io(err.to_string())
        } else {
            BridgeError::Serialization(err.to_string())
        }
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for BridgeError {
    fn from(err: toml::de::Error) -> Self {
        BridgeError::Configuration(format!("TOML parse error: {err}"))
    }
}

// A blocking task that panicked or was cancelled
impl From<tokio::task::JoinError> for BridgeError {
    fn from(err: tokio::task::JoinError) -> Self {
        BridgeError::Transient(format!("Worker task did not complete: {err}"))
    }
}
