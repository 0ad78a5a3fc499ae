//! # modsight-analyze
//!
//! Rule-weighted crash log analysis for Minecraft modpacks.
//!
//! Parsed log lines are scored by a catalogue of cause rules, weighted by
//! severity, proximity to exception boundaries, repetition and boilerplate.
//! The same pass ranks the mods implicated in the failure.
//!
//! ## Features
//!
//! - **Likely causes**: ranked failure signatures with fixes and evidence
//! - **Crash suspects**: canonical mod ids pulled from jars, mixin configs and stack frames
//! - **Failed mods**: mods the loader reported as failing, with the best reason line
//! - **Key errors**: the most significant error lines, deduplicated
//!
//! ## Quick Start
//!
//! ```rust
//! use modsight_analyze::analyze_log_text;
//!
//! let result = analyze_log_text(
//!     "Exception in thread \"main\" java.lang.NoClassDefFoundError: net/foo/BarMod\n\
//!      Caused by: java.lang.ClassNotFoundException: net.foo.BarMod",
//! );
//! assert_eq!(result.total_lines, 2);
//! assert_eq!(result.likely_causes[0].id, "missing_class_or_method");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod analyzer;
pub mod causal;
pub mod causes;
pub mod context;
pub mod error;
pub mod formatter;
pub mod rules;
pub mod scoring;
pub mod suspects;
pub mod tokens;
pub mod types;

pub use analyzer::{
    analyze_log_json, analyze_log_lines, analyze_log_text, collect_key_errors,
    detect_crash_suspects_from_messages, Analyzer, AnalyzerConfig,
};
pub use causal::CausalModel;
pub use causes::{score_causes, CauseReport};
pub use context::{AnalysisContext, RepeatIndex};
pub use error::{AnalyzeError, Result};
pub use formatter::{format_report, format_summary};
pub use rules::{CauseRule, RuleCatalog};
pub use scoring::{boilerplate_penalty, dedupe_penalty, severity_weight, to_confidence};
pub use suspects::{extract_failed_mods, extract_suspects};
pub use tokens::{normalize_mod_token, titleize, TokenTables};
pub use types::{CrashSuspect, FailedMod, LogAnalyzeResult, LogLikelyCause};

pub use modsight_logs::{
    extract_log_timestamp, infer_log_severity, LogInput, LogLine, LogSourcePayload, Severity,
};
