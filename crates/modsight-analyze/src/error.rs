//! Error types for the analysis engine.
//!
//! Analysing log data never fails. These errors cover programming
//! mistakes: malformed custom rules, bad configuration, and structured
//! input documents with the wrong shape.

use modsight_logs::LogError;
use thiserror::Error;

/// Errors that can occur while configuring or feeding the analyzer.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// A cause rule could not be built.
    #[error("invalid cause rule '{id}': {reason}")]
    InvalidRule {
        /// Identifier of the offending rule.
        id: String,
        /// Why the rule was rejected.
        reason: String,
    },

    /// Two rules in one catalogue share an identifier.
    #[error("duplicate cause rule id: {0}")]
    DuplicateRule(String),

    /// The analyzer configuration is unusable.
    #[error("invalid analyzer config: {0}")]
    InvalidConfig(String),

    /// Structured log input was malformed.
    #[error(transparent)]
    Log(#[from] LogError),
}

impl AnalyzeError {
    /// Creates an invalid rule error.
    pub fn invalid_rule(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRule {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalyzeError>;
