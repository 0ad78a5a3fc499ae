//! # modsight-logs
//!
//! Log line parsing and normalization for modsight crash analysis.
//!
//! This crate provides:
//!
//! - [`LogInput`] — A raw line with optional metadata
//! - [`LogLine`] — A normalized, immutable parsed line
//! - [`Severity`] — Severity levels (Trace, Debug, Info, Warn, Error)
//! - [`LineParser`] — Filtering, severity inference, header parsing
//! - [`LogSourcePayload`] — The backend log-source reader's response shape
//!
//! ## Example
//!
//! ```rust
//! use modsight_logs::{LineParser, Severity};
//!
//! let lines = LineParser::new().parse_text(
//!     "[12:00:00] [Server thread/ERROR]: Exception in thread \"main\"\n\n\tat a.B.c(B.java:1)",
//! );
//! assert_eq!(lines.len(), 2);
//! assert_eq!(lines[0].severity, Severity::Error);
//! assert_eq!(lines[0].timestamp.as_deref(), Some("12:00:00"));
//! assert!(lines[1].in_stack_trace);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod parser;
pub mod types;

pub use error::{LogError, Result};
pub use parser::{
    decode_inputs, dedupe_key, extract_log_timestamp, infer_log_severity, is_stack_trace_line,
    parse_logger_thread, text_to_inputs, LineParser,
};
pub use types::{LogInput, LogLine, LogSourcePayload, PayloadLine, Severity, DEFAULT_SOURCE};
