//! # modsight-config
//!
//! Rule-driven checks for Minecraft config files.
//!
//! Each key gets a [`ConfigRule`]: a [`Constraint`], a severity and an
//! optional fallback. The same rules drive three operations:
//!
//! - [`detect_config_issues`] reports problems without touching the text
//! - [`apply_safe_fixes`] clamps numbers and restores fallbacks
//! - [`apply_preset`] writes a named bundle of values after validating it
//!
//! ## Example
//!
//! ```
//! use modsight_config::{apply_safe_fixes, detect_config_issues, ConfigFormat, RuleSet};
//!
//! let text = "view-distance=64\nmotd=hello\n";
//! let rules = RuleSet::for_file("server.properties");
//!
//! let issues = detect_config_issues(text, ConfigFormat::Properties, rules);
//! assert_eq!(issues.len(), 1);
//!
//! let outcome = apply_safe_fixes(text, ConfigFormat::Properties, rules);
//! assert_eq!(outcome.text, "view-distance=32\nmotd=hello\n");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod fix;
mod format;
mod issues;
mod preset;
mod rules;

pub use error::{ConfigError, Result};
pub use fix::{apply_safe_fixes, AppliedFix, FixOutcome};
pub use format::ConfigFormat;
pub use issues::{detect_config_issues, ConfigIssue};
pub use preset::{apply_preset, find_preset, presets_for, Preset, PresetOutcome};
pub use rules::{ConfigRule, Constraint, IssueKind, IssueSeverity, RuleSet, Violation};
