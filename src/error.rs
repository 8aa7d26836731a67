//! Custom error types for pantry
//!
//! This module defines the error hierarchy for the persistence layer using
//! thiserror for ergonomic error definitions. Validation problems are not
//! represented here: they are collected in a `ValidationResult` and only
//! become a `PantryError::Validation` when a caller refuses to persist.

use thiserror::Error;

/// The main error type for pantry operations
#[derive(Error, Debug)]
pub enum PantryError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Underlying key/value store errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// A persisted record could not be parsed as an envelope
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// An export token could not be decoded or parsed
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    /// Remote request failed (network unreachable, non-success status)
    #[error("Transport error: {message}")]
    Transport {
        status: Option<u16>,
        message: String,
    },

    /// A logical key outside the closed set
    #[error("Unknown key: {0}")]
    UnknownKey(String),

    /// Data rejected by validation before persistence
    #[error("Validation error: {0}")]
    Validation(String),
}

impl PantryError {
    /// Create a transport error without an HTTP status (network failure)
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            status: None,
            message: message.into(),
        }
    }

    /// Create a transport error for a non-success response status
    pub fn transport_status(status: u16, message: impl Into<String>) -> Self {
        Self::Transport {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Check if this is a transport error
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Check if this is a format error (envelope or token)
    pub fn is_format(&self) -> bool {
        matches!(self, Self::MalformedEnvelope(_) | Self::MalformedToken(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for PantryError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PantryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for pantry operations
pub type PantryResult<T> = Result<T, PantryError>;
