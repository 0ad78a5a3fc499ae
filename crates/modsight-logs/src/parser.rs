//! Line parsing and normalization.
//!
//! This module provides:
//! - [`LineParser`] — Turns raw input into [`LogLine`]s
//! - Severity, timestamp, logger/thread and stack-frame detection
//! - [`dedupe_key`] — Normalized text used to spot repeated lines
//!
//! Everything here is pure and order-preserving.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::trace;

use crate::error::{LogError, Result};
use crate::types::{LogInput, LogLine, LogSourcePayload, PayloadLine, Severity, DEFAULT_SOURCE};

/// Leading `[...]` group taken as the timestamp.
static BRACKET_TIMESTAMP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[([^\]]{4,48})\]").unwrap_or_else(|_| unreachable!()));

/// Leading `YYYY-MM-DD HH:MM:SS` timestamp, with optional fraction and zone.
static ISO_TIMESTAMP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}(?:[.,]\d+)?(?:Z|[+-]\d{2}:?\d{2})?)")
        .unwrap_or_else(|_| unreachable!())
});

/// `[logger] [thread/level]` header.
static DOUBLE_BRACKET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[([^\]]+)\]\s*\[([^\]]+)\]").unwrap_or_else(|_| unreachable!())
});

/// `identifier: ` prefix.
static LOGGER_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z_][A-Za-z0-9_.$-]*):\s").unwrap_or_else(|_| unreachable!())
});

static STACK_FRAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*at\s+[\w$.<>/-]+\(.*\)").unwrap_or_else(|_| unreachable!())
});

static MORE_FRAMES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\.\.\.\s*\d+\s*more").unwrap_or_else(|_| unreachable!()));

static DEDUPE_TIMESTAMP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d{4}-\d{2}-\d{2}[t ]\d{2}:\d{2}:\d{2}(?:[.,]\d+)?(?:z|[+-]\d{2}:?\d{2})?")
        .unwrap_or_else(|_| unreachable!())
});

static DEDUPE_HEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:0x)?[0-9a-f]{8,}\b").unwrap_or_else(|_| unreachable!()));

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").unwrap_or_else(|_| unreachable!()));

const ERROR_KEYWORDS: &[&str] = &["fatal", "error", "exception", "crash"];

/// Infers a severity from message text.
///
/// Checked in order: failure words give [`Severity::Error`], `warn` gives
/// [`Severity::Warn`], then `debug` and `trace`. Anything else is info.
#[must_use]
pub fn infer_log_severity(message: &str) -> Severity {
    let lower = message.to_lowercase();
    if ERROR_KEYWORDS.iter().any(|k| lower.contains(k)) {
        Severity::Error
    } else if lower.contains("warn") {
        Severity::Warn
    } else if lower.contains("debug") {
        Severity::Debug
    } else if lower.contains("trace") {
        Severity::Trace
    } else {
        Severity::Info
    }
}

/// Extracts a leading timestamp from a message.
///
/// A leading `[...]` group of 4 to 48 characters wins; otherwise a leading
/// ISO-like `YYYY-MM-DD HH:MM:SS` prefix (space or `T` separator).
#[must_use]
pub fn extract_log_timestamp(message: &str) -> Option<String> {
    let trimmed = message.trim_start();
    if let Some(caps) = BRACKET_TIMESTAMP.captures(trimmed) {
        return Some(caps[1].to_string());
    }
    ISO_TIMESTAMP
        .captures(trimmed)
        .map(|caps| caps[1].to_string())
}

/// Parses `(logger, thread)` from a message header.
///
/// A leading `[logger] [thread/level]` pair gives the first bracket as the
/// logger and the part of the second before `/` as the thread. Otherwise a
/// bare `identifier: ` prefix is the logger.
#[must_use]
pub fn parse_logger_thread(message: &str) -> (Option<String>, Option<String>) {
    let trimmed = message.trim_start();

    if let Some(caps) = DOUBLE_BRACKET.captures(trimmed) {
        let logger = caps[1].trim();
        let thread = caps[2].split('/').next().unwrap_or_default().trim();
        return (
            (!logger.is_empty()).then(|| logger.to_string()),
            (!thread.is_empty()).then(|| thread.to_string()),
        );
    }

    if let Some(caps) = LOGGER_PREFIX.captures(trimmed) {
        return (Some(caps[1].to_string()), None);
    }

    (None, None)
}

/// Returns true for `at pkg.Class.method(...)` frames and `... N more` markers.
#[must_use]
pub fn is_stack_trace_line(message: &str) -> bool {
    STACK_FRAME.is_match(message) || MORE_FRAMES.is_match(message)
}

/// Normalizes a message for repeat detection.
///
/// Lowercases, replaces ISO timestamps with `<ts>` and long hex runs with
/// `<hex>`, then collapses whitespace.
#[must_use]
pub fn dedupe_key(message: &str) -> String {
    let lower = message.to_lowercase();
    let no_ts = DEDUPE_TIMESTAMP.replace_all(&lower, "<ts>");
    let no_hex = DEDUPE_HEX.replace_all(&no_ts, "<hex>");
    WHITESPACE_RUN.replace_all(no_hex.trim(), " ").into_owned()
}

/// Strips NUL characters and trailing whitespace.
fn clean_message(message: &str) -> String {
    let stripped: String = message.chars().filter(|c| *c != '\0').collect();
    stripped.trim_end().to_string()
}

/// Floors a finite positive line number; anything else becomes `None`.
fn clean_line_no(line_no: Option<f64>) -> Option<u64> {
    line_no
        .filter(|n| n.is_finite() && *n >= 1.0)
        .map(|n| n.floor() as u64)
}

/// Parser turning raw input into [`LogLine`]s.
#[derive(Debug, Clone)]
pub struct LineParser {
    /// Source used for lines that name none
    default_source: String,
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LineParser {
    /// Creates a new line parser with the `live` default source.
    #[must_use]
    pub fn new() -> Self {
        Self {
            default_source: DEFAULT_SOURCE.to_string(),
        }
    }

    /// Creates a parser with a custom default source.
    #[must_use]
    pub fn with_default_source(source: impl Into<String>) -> Self {
        Self {
            default_source: source.into(),
        }
    }

    /// Parses a single input into a line at the given index.
    ///
    /// Returns `None` when the cleaned message is empty.
    #[must_use]
    pub fn parse_one(&self, input: &LogInput, index: usize) -> Option<LogLine> {
        let message = clean_message(&input.message);
        if message.is_empty() {
            return None;
        }

        let severity = input
            .severity
            .unwrap_or_else(|| infer_log_severity(&message));
        let timestamp = input
            .timestamp
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .or_else(|| extract_log_timestamp(&message));
        let (logger, thread) = parse_logger_thread(&message);
        let source = input
            .source
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.default_source)
            .to_string();

        Some(LogLine {
            index,
            lower_message: message.to_lowercase(),
            in_stack_trace: is_stack_trace_line(&message),
            message,
            severity,
            source,
            line_number: clean_line_no(input.line_no),
            timestamp,
            thread,
            logger,
        })
    }

    /// Parses structured input, dropping lines whose message is empty.
    ///
    /// Output indexes are positions in the filtered sequence.
    #[must_use]
    pub fn parse_inputs(&self, inputs: &[LogInput]) -> Vec<LogLine> {
        let mut lines = Vec::with_capacity(inputs.len());
        for input in inputs {
            if let Some(line) = self.parse_one(input, lines.len()) {
                lines.push(line);
            }
        }
        trace!(
            parsed = lines.len(),
            dropped = inputs.len() - lines.len(),
            "parsed log input"
        );
        lines
    }

    /// Parses raw text: splits on CRLF/LF, trims, drops empty lines.
    #[must_use]
    pub fn parse_text(&self, text: &str) -> Vec<LogLine> {
        self.parse_inputs(&text_to_inputs(text))
    }
}

/// Splits raw text into trimmed, non-empty inputs.
#[must_use]
pub fn text_to_inputs(text: &str) -> Vec<LogInput> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(LogInput::new)
        .collect()
}

/// Decodes a JSON document into parser input.
///
/// Accepts an array whose elements are strings or line objects, or a
/// log-source payload object with a `lines` field.
///
/// # Errors
///
/// Returns [`LogError::InvalidInput`] for any other document shape and
/// [`LogError::Serialization`] for malformed JSON.
pub fn decode_inputs(json: &str) -> Result<Vec<LogInput>> {
    let value: Value = serde_json::from_str(json)?;
    match value {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::String(message) => Ok(LogInput::new(message)),
                Value::Object(_) => match serde_json::from_value::<PayloadLine>(item)? {
                    PayloadLine::Text(message) => Ok(LogInput::new(message)),
                    PayloadLine::Structured(input) => Ok(input),
                },
                other => Err(LogError::InvalidInput(format!(
                    "element {i} is {}, expected a string or an object",
                    json_kind(&other)
                ))),
            })
            .collect(),
        Value::Object(map) if map.contains_key("lines") => {
            let payload: LogSourcePayload = serde_json::from_value(Value::Object(map))?;
            Ok(payload.into_inputs())
        }
        other => Err(LogError::InvalidInput(format!(
            "expected an array of log lines or a log-source payload, got {}",
            json_kind(&other)
        ))),
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod severity_tests {
        use super::*;
        use test_case::test_case;

        #[test_case("java.lang.NullPointerException: boom", Severity::Error ; "exception")]
        #[test_case("FATAL: engine stopped", Severity::Error ; "fatal")]
        #[test_case("Game crashed! Crash report saved", Severity::Error ; "crash")]
        #[test_case("[Render thread/ERROR]: Failed", Severity::Error ; "error bracket")]
        #[test_case("[main/WARN]: Reference map missing", Severity::Warn ; "warn")]
        #[test_case("Warning: low disk space", Severity::Warn ; "warning")]
        #[test_case("[main/DEBUG]: registry frozen", Severity::Debug ; "debug")]
        #[test_case("TRACE dumping state", Severity::Trace ; "trace")]
        #[test_case("Loading textures...", Severity::Info ; "default info")]
        fn infers(message: &str, expected: Severity) {
            assert_eq!(infer_log_severity(message), expected);
        }

        #[test]
        fn error_wins_over_warn() {
            assert_eq!(
                infer_log_severity("WARN: exception while ticking"),
                Severity::Error
            );
        }
    }

    mod timestamp_tests {
        use super::*;
        use test_case::test_case;

        #[test_case("[12:00:00] [main/INFO]: hi", Some("12:00:00") ; "bracket time")]
        #[test_case("[29Jan2024 10:15:02.123] [main/INFO]", Some("29Jan2024 10:15:02.123") ; "forge time")]
        #[test_case("2024-01-22 14:00:00 boot", Some("2024-01-22 14:00:00") ; "iso space")]
        #[test_case("2024-01-22T14:00:00.123Z boot", Some("2024-01-22T14:00:00.123Z") ; "iso t")]
        #[test_case("[INFO] Loading textures...", Some("INFO") ; "any bracket group")]
        #[test_case("[Server thread/ERROR]: boom", Some("Server thread/ERROR") ; "thread bracket")]
        #[test_case("[abc] short", None ; "too short")]
        #[test_case("no timestamp here", None ; "plain")]
        fn extracts(message: &str, expected: Option<&str>) {
            assert_eq!(extract_log_timestamp(message).as_deref(), expected);
        }

        #[test]
        fn bracket_longer_than_48_is_ignored() {
            let message = format!("[{}] text", "x".repeat(49));
            assert_eq!(extract_log_timestamp(&message), None);
        }

        #[test]
        fn bracket_of_exactly_48_is_kept() {
            let inner = "x".repeat(48);
            let message = format!("[{inner}] text");
            assert_eq!(extract_log_timestamp(&message).as_deref(), Some(inner.as_str()));
        }
    }

    mod header_tests {
        use super::*;

        #[test]
        fn vanilla_header_first_bracket_is_logger() {
            let (logger, thread) =
                parse_logger_thread("[12:00:00] [Server thread/ERROR]: Exception in thread");
            assert_eq!(logger.as_deref(), Some("12:00:00"));
            assert_eq!(thread.as_deref(), Some("Server thread"));
        }

        #[test]
        fn logger_then_thread_header() {
            let (logger, thread) = parse_logger_thread("[FabricLoader] [main/INFO] starting");
            assert_eq!(logger.as_deref(), Some("FabricLoader"));
            assert_eq!(thread.as_deref(), Some("main"));
        }

        #[test]
        fn second_bracket_without_slash_is_whole_thread() {
            let (logger, thread) = parse_logger_thread("[Mixin] [Worker-3] applying");
            assert_eq!(logger.as_deref(), Some("Mixin"));
            assert_eq!(thread.as_deref(), Some("Worker-3"));
        }

        #[test]
        fn lone_bracket_has_neither() {
            assert_eq!(parse_logger_thread("[Render thread/ERROR]: Failed"), (None, None));
        }

        #[test]
        fn identifier_prefix_is_logger() {
            let (logger, thread) = parse_logger_thread("net.minecraft.Foo: something");
            assert_eq!(logger.as_deref(), Some("net.minecraft.Foo"));
            assert_eq!(thread, None);
        }

        #[test]
        fn plain_text_has_neither() {
            assert_eq!(parse_logger_thread("Caused by: x"), (None, None));
        }
    }

    mod stack_trace_tests {
        use super::*;
        use test_case::test_case;

        #[test_case("\tat net.foo.BarMod.init(BarMod.java:10)", true ; "tab frame")]
        #[test_case("at java.base/java.lang.Thread.run(Thread.java:833) ~[?:?]", true ; "module frame")]
        #[test_case("\t... 12 more", true ; "more marker")]
        #[test_case("Caused by: java.lang.Error", false ; "caused by")]
        #[test_case("look at this", false ; "prose")]
        fn detects(message: &str, expected: bool) {
            assert_eq!(is_stack_trace_line(message), expected);
        }
    }

    mod dedupe_tests {
        use super::*;

        #[test]
        fn collapses_case_and_whitespace() {
            assert_eq!(dedupe_key("  Loading   Textures... "), "loading textures...");
        }

        #[test]
        fn masks_hex_and_timestamps() {
            let a = dedupe_key("2024-01-01T10:00:00Z object@1a2b3c4d5e freed");
            let b = dedupe_key("2024-02-03T11:22:33Z object@ffffeeee00 freed");
            assert_eq!(a, b);
            assert!(a.contains("<ts>"));
            assert!(a.contains("<hex>"));
        }
    }

    mod parser_tests {
        use super::*;
        use test_case::test_case;

        #[test]
        fn drops_empty_and_reindexes() {
            let parser = LineParser::new();
            let lines = parser.parse_inputs(&[
                LogInput::new("first"),
                LogInput::new("   "),
                LogInput::new("\0\0"),
                LogInput::new("second  "),
            ]);
            assert_eq!(lines.len(), 2);
            assert_eq!(lines[0].index, 0);
            assert_eq!(lines[1].index, 1);
            assert_eq!(lines[1].message, "second");
        }

        #[test]
        fn strips_nul_and_keeps_leading_whitespace() {
            let parser = LineParser::new();
            let line = parser
                .parse_one(&LogInput::new("\tat a.B.c(B.java:1)\0 \t"), 0)
                .unwrap();
            assert_eq!(line.message, "\tat a.B.c(B.java:1)");
            assert!(line.in_stack_trace);
        }

        #[test]
        fn supplied_fields_win() {
            let parser = LineParser::new();
            let input = LogInput::new("[12:00:00] plain error text")
                .with_severity(Severity::Debug)
                .with_timestamp("T0")
                .with_source("debug.log")
                .with_line_no(4.9);
            let line = parser.parse_one(&input, 3).unwrap();
            assert_eq!(line.index, 3);
            assert_eq!(line.severity, Severity::Debug);
            assert_eq!(line.timestamp.as_deref(), Some("T0"));
            assert_eq!(line.source, "debug.log");
            assert_eq!(line.line_number, Some(4));
        }

        #[test_case(f64::NAN ; "nan")]
        #[test_case(f64::INFINITY ; "infinite")]
        #[test_case(0.0 ; "zero")]
        #[test_case(-3.0 ; "negative")]
        fn invalid_line_numbers_are_dropped(line_no: f64) {
            let parser = LineParser::new();
            let line = parser
                .parse_one(&LogInput::new("x").with_line_no(line_no), 0)
                .unwrap();
            assert_eq!(line.line_number, None);
        }

        #[test]
        fn vanilla_line_fills_header_fields() {
            let line = LineParser::new()
                .parse_one(
                    &LogInput::new("[12:00:00] [Server thread/ERROR]: Exception in thread \"main\""),
                    0,
                )
                .unwrap();
            assert_eq!(line.timestamp.as_deref(), Some("12:00:00"));
            assert_eq!(line.logger.as_deref(), Some("12:00:00"));
            assert_eq!(line.thread.as_deref(), Some("Server thread"));
            assert_eq!(line.severity, Severity::Error);
        }

        #[test]
        fn defaults_are_filled() {
            let parser = LineParser::new();
            let line = parser.parse_one(&LogInput::new("Hello World"), 0).unwrap();
            assert_eq!(line.source, DEFAULT_SOURCE);
            assert_eq!(line.severity, Severity::Info);
            assert_eq!(line.lower_message, "hello world");
            assert_eq!(line.timestamp, None);
        }

        #[test]
        fn custom_default_source() {
            let parser = LineParser::with_default_source("crash-report");
            let lines = parser.parse_text("a\nb");
            assert!(lines.iter().all(|l| l.source == "crash-report"));
        }

        #[test]
        fn text_splits_crlf_and_trims() {
            let parser = LineParser::new();
            let lines = parser.parse_text("  one \r\n\r\n\ttwo\n\n");
            let messages: Vec<_> = lines.iter().map(|l| l.message.as_str()).collect();
            assert_eq!(messages, vec!["one", "two"]);
        }

        #[test]
        fn empty_text_yields_nothing() {
            assert!(LineParser::new().parse_text("").is_empty());
            assert!(LineParser::new().parse_inputs(&[]).is_empty());
        }
    }

    mod decode_tests {
        use super::*;
        use test_case::test_case;

        #[test]
        fn decodes_array_of_strings_and_objects() {
            let inputs =
                decode_inputs(r#"["one", {"message":"two","severity":"warn","lineNo":2}]"#)
                    .unwrap();
            assert_eq!(inputs.len(), 2);
            assert_eq!(inputs[1].severity, Some(Severity::Warn));
        }

        #[test]
        fn decodes_payload() {
            let inputs =
                decode_inputs(r#"{"source":"latest.log","lines":["a","b"],"truncated":false}"#)
                    .unwrap();
            assert_eq!(inputs.len(), 2);
            assert_eq!(inputs[0].source.as_deref(), Some("latest.log"));
        }

        #[test_case("42" ; "number")]
        #[test_case(r#"{"message":"x"}"# ; "object without lines")]
        #[test_case("[1, 2]" ; "array of numbers")]
        #[test_case("null" ; "null")]
        fn rejects_wrong_shapes(json: &str) {
            let err = decode_inputs(json).unwrap_err();
            assert!(matches!(err, LogError::InvalidInput(_)));
        }

        #[test]
        fn rejects_malformed_json() {
            let err = decode_inputs("[").unwrap_err();
            assert!(matches!(err, LogError::Serialization(_)));
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn indexes_are_dense(messages in proptest::collection::vec(".{0,40}", 0..40)) {
                let inputs: Vec<LogInput> = messages.iter().map(|m| LogInput::new(m.clone())).collect();
                let lines = LineParser::new().parse_inputs(&inputs);
                for (i, line) in lines.iter().enumerate() {
                    prop_assert_eq!(line.index, i);
                    prop_assert!(!line.message.is_empty());
                    prop_assert!(!line.message.contains('\0'));
                }
            }

            #[test]
            fn parsing_is_deterministic(text in "[ -~\n]{0,200}") {
                let parser = LineParser::new();
                prop_assert_eq!(parser.parse_text(&text), parser.parse_text(&text));
            }
        }
    }
}
