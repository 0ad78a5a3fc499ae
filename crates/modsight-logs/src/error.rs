//! Error types for log input handling.

use thiserror::Error;

/// Errors that can occur while turning external input into log lines.
///
/// Parsing plain text never fails; these only surface when structured
/// input is malformed at the document level.
#[derive(Debug, Error)]
pub enum LogError {
    /// The input document does not have the expected shape.
    #[error("invalid log input: {0}")]
    InvalidInput(String),

    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for log operations.
pub type Result<T> = std::result::Result<T, LogError>;
