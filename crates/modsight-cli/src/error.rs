//! CLI error types.

use std::fmt;

use modsight_analyze::AnalyzeError;
use modsight_config::ConfigError;

/// CLI-specific errors.
#[derive(Debug)]
pub enum CliError {
    /// Reading input or writing output failed.
    Io(std::io::Error),
    /// Output formatting or config decoding failed.
    Format(String),
    /// Invalid argument combination.
    InvalidArgument(String),
    /// Log analysis rejected its input or config.
    Analyze(AnalyzeError),
    /// The config rule engine rejected the request.
    Config(ConfigError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {e}"),
            Self::Format(msg) => write!(f, "format error: {msg}"),
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Self::Analyze(e) => write!(f, "analysis error: {e}"),
            Self::Config(e) => write!(f, "config error: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Analyze(e) => Some(e),
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<AnalyzeError> for CliError {
    fn from(err: AnalyzeError) -> Self {
        Self::Analyze(err)
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}
