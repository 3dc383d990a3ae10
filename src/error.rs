//! Error types for edugen
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in edugen
#[derive(Debug, Error)]
pub enum EdugenError {
    /// Model output could not be coerced into the expected structured shape
    #[error("Schema violation: {0}")]
    SchemaViolation(String),

    /// The call to the language-model backend failed (network, auth, rate limit)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Input rejected before any backend call
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration problem
    #[error("Config error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EdugenError {
    /// Whether this error came from the structured-output contract rather
    /// than the transport layer.
    pub fn is_schema_violation(&self) -> bool {
        matches!(self, EdugenError::SchemaViolation(_))
    }
}

/// Result type alias for edugen operations
pub type Result<T> = std::result::Result<T, EdugenError>;
