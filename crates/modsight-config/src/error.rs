//! Error types for the config rule engine.

use thiserror::Error;

/// Errors raised by rule construction and preset application.
///
/// Linting and safe fixes never fail on file contents; problems in the
/// file are reported as issues instead.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file name does not map to a supported format.
    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// No builtin preset has this id.
    #[error("unknown preset: {0}")]
    UnknownPreset(String),

    /// A preset value breaks a rule.
    #[error("preset '{preset}' sets invalid value for '{key}': {reason}")]
    InvalidPreset {
        /// Preset id.
        preset: String,
        /// Offending key.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// A rule could not be built.
    #[error("invalid config rule '{key}': {reason}")]
    InvalidRule {
        /// Key the rule applies to.
        key: String,
        /// Why the rule was rejected.
        reason: String,
    },

    /// The document cannot be edited because it does not parse.
    #[error("malformed document: {0}")]
    MalformedDocument(String),
}

impl ConfigError {
    /// Creates an invalid rule error.
    pub fn invalid_rule(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRule {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            ConfigError::UnsupportedFormat("mods.toml".into()).to_string(),
            "unsupported config format: mods.toml"
        );
        assert_eq!(
            ConfigError::UnknownPreset("turbo".into()).to_string(),
            "unknown preset: turbo"
        );
        let err = ConfigError::InvalidPreset {
            preset: "low-end".into(),
            key: "renderDistance".into(),
            reason: "must be between 2 and 32".into(),
        };
        assert_eq!(
            err.to_string(),
            "preset 'low-end' sets invalid value for 'renderDistance': must be between 2 and 32"
        );
        assert_eq!(
            ConfigError::invalid_rule("pvp", "empty choice list").to_string(),
            "invalid config rule 'pvp': empty choice list"
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ConfigError>();
    }
}
