//! Core types for log input and parsed lines.
//!
//! This module provides:
//! - [`Severity`] — Severity levels for log lines
//! - [`LogInput`] — One raw line as handed over by a log reader
//! - [`LogLine`] — A normalized, immutable parsed line
//! - [`LogSourcePayload`] — The log-source reader's response shape

use serde::{Deserialize, Serialize};

/// Default value of [`LogLine::source`] when the input names none.
pub const DEFAULT_SOURCE: &str = "live";

/// Log severity levels, ordered from most to least verbose.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Most verbose, detailed tracing information
    Trace = 0,
    /// Debugging information
    Debug = 1,
    /// General information
    #[default]
    Info = 2,
    /// Warning conditions
    Warn = 3,
    /// Error conditions
    Error = 4,
}

impl Severity {
    /// Returns the string representation of this level.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw log line with optional metadata supplied by the caller.
///
/// Every field except `message` may be absent; the parser fills in
/// defaults or infers values from the message text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogInput {
    /// The raw message text.
    pub message: String,
    /// Severity, if the reader already knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    /// Where the line came from (e.g. `latest.log`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Original line number. Non-finite or non-positive values are dropped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_no: Option<f64>,
    /// Timestamp text, if the reader already extracted it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl LogInput {
    /// Creates an input carrying only a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// Sets the severity.
    #[must_use]
    pub const fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    /// Sets the source name.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the original line number.
    #[must_use]
    pub const fn with_line_no(mut self, line_no: f64) -> Self {
        self.line_no = Some(line_no);
        self
    }

    /// Sets the timestamp text.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }
}

impl From<&str> for LogInput {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for LogInput {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

/// A parsed, normalized log line. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogLine {
    /// Position in the filtered sequence (0-based).
    pub index: usize,
    /// Message with trailing whitespace and NUL characters removed.
    pub message: String,
    /// Lowercased copy of `message`.
    pub lower_message: String,
    /// Supplied or inferred severity.
    pub severity: Severity,
    /// Source name, [`DEFAULT_SOURCE`] when none was supplied.
    pub source: String,
    /// Original line number, always > 0 when present.
    pub line_number: Option<u64>,
    /// Supplied or extracted timestamp text.
    pub timestamp: Option<String>,
    /// Thread name from a `[logger] [thread/level]` header.
    pub thread: Option<String>,
    /// Logger name from a bracket header or `name: ` prefix.
    pub logger: Option<String>,
    /// Whether this line is a stack frame or a `... N more` marker.
    pub in_stack_trace: bool,
}

impl LogLine {
    /// Returns true if this is an error-level line.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

/// One entry of a [`LogSourcePayload`]: either bare text or a structured line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PayloadLine {
    /// A bare line of text.
    Text(String),
    /// A line with metadata.
    Structured(LogInput),
}

/// The response shape of the backend log-source reader.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogSourcePayload {
    /// Name of the log source (e.g. `latest.log`, `crash-report`).
    #[serde(default)]
    pub source: String,
    /// The lines read from the source.
    #[serde(default)]
    pub lines: Vec<PayloadLine>,
    /// Whether the reader cut the source short.
    #[serde(default)]
    pub truncated: bool,
    /// Number of lines the source held before truncation.
    #[serde(default, alias = "totalLines")]
    pub total_lines: usize,
}

impl LogSourcePayload {
    /// Converts the payload into parser input, stamping the payload's
    /// source name on lines that carry none.
    #[must_use]
    pub fn into_inputs(self) -> Vec<LogInput> {
        let source = (!self.source.trim().is_empty()).then(|| self.source.clone());
        self.lines
            .into_iter()
            .map(|line| {
                let mut input = match line {
                    PayloadLine::Text(message) => LogInput::new(message),
                    PayloadLine::Structured(input) => input,
                };
                if input.source.is_none() {
                    input.source.clone_from(&source);
                }
                input
            })
            .collect()
    }
}
