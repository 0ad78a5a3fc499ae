//! Result types produced by the analyzer.
//!
//! Every type here is a computed view over one analysis call. Field names
//! serialize in camelCase (`totalLines`, `keyErrors`, ...).

use std::collections::BTreeMap;

use modsight_logs::Severity;
use serde::{Deserialize, Serialize};

/// A ranked likely cause of the failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogLikelyCause {
    /// Rule identifier (e.g. `memory_oom`).
    pub id: String,
    /// Human-readable rule title.
    pub title: String,
    /// Squashed score in `[0, 1]`, two decimals.
    pub confidence: f64,
    /// The most significant matching line.
    pub reason: String,
    /// Suggested fixes copied from the rule.
    pub fixes: Vec<String>,
}

/// A mod or file identifier implicated in the failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrashSuspect {
    /// Canonical token.
    pub id: String,
    /// Titleized id.
    pub label: String,
    /// Number of lines mentioning the token.
    pub matches: usize,
    /// Squashed score in `[0, 1]`, two decimals.
    pub confidence: f64,
    /// Up to three distinct supporting lines.
    pub signals: Vec<String>,
}

/// A mod that the log reports as having failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedMod {
    /// Canonical token.
    pub id: String,
    /// Titleized id.
    pub label: String,
    /// The highest-scoring line naming this mod.
    pub reason: String,
    /// Squashed score in `[0, 1]`, two decimals.
    pub confidence: f64,
}

/// Aggregate result of analysing one log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogAnalyzeResult {
    /// Number of non-empty lines analysed.
    pub total_lines: usize,
    /// Lines at error severity.
    pub error_count: usize,
    /// Lines at warn severity.
    pub warn_count: usize,
    /// Lines at info severity.
    pub info_count: usize,
    /// Lines at debug severity.
    pub debug_count: usize,
    /// Lines at trace severity.
    pub trace_count: usize,
    /// Ranked crash suspects.
    pub suspects: Vec<CrashSuspect>,
    /// Most significant error lines, deduplicated.
    pub key_errors: Vec<String>,
    /// Ranked likely causes.
    pub likely_causes: Vec<LogLikelyCause>,
    /// Ranked failed mods.
    pub failed_mods: Vec<FailedMod>,
    /// Supporting lines per cause id.
    pub evidence_by_cause: BTreeMap<String, Vec<String>>,
    /// Short human-readable summary lines.
    pub confidence_notes: Vec<String>,
}

impl LogAnalyzeResult {
    /// Returns the count for one severity.
    #[must_use]
    pub const fn count(&self, severity: Severity) -> usize {
        match severity {
            Severity::Error => self.error_count,
            Severity::Warn => self.warn_count,
            Severity::Info => self.info_count,
            Severity::Debug => self.debug_count,
            Severity::Trace => self.trace_count,
        }
    }

    /// Increments the count for one severity.
    pub fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Error => self.error_count += 1,
            Severity::Warn => self.warn_count += 1,
            Severity::Info => self.info_count += 1,
            Severity::Debug => self.debug_count += 1,
            Severity::Trace => self.trace_count += 1,
        }
    }

    /// Returns true when nothing at all was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_lines == 0
    }

    /// Returns the top-ranked cause, if any.
    #[must_use]
    pub fn top_cause(&self) -> Option<&LogLikelyCause> {
        self.likely_causes.first()
    }
}
