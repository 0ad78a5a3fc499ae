//! The analysis entry point.
//!
//! An [`Analyzer`] parses input once, builds one [`AnalysisContext`] and
//! hands it to every consumer: the cause engine, the suspect and
//! failed-mod extractors and the key-error collector.

use std::cmp::Ordering;
use std::collections::HashSet;

use modsight_logs::{decode_inputs, LineParser, LogInput, LogLine};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::causes::score_causes;
use crate::context::AnalysisContext;
use crate::error::{AnalyzeError, Result};
use crate::rules::RuleCatalog;
use crate::scoring::{has_failure_words, severity_weight};
use crate::suspects::{extract_failed_mods, extract_suspects};
use crate::tokens::TokenTables;
use crate::types::{CrashSuspect, LogAnalyzeResult};

/// Caps and switches for one analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyzerConfig {
    /// Maximum likely causes reported.
    pub max_causes: usize,
    /// Maximum crash suspects reported.
    pub max_suspects: usize,
    /// Maximum failed mods reported.
    pub max_failed_mods: usize,
    /// Maximum key error lines reported.
    pub max_key_errors: usize,
    /// Evidence lines kept per cause.
    pub max_cause_evidence: usize,
    /// Whether to emit confidence notes.
    pub include_notes: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_causes: 6,
            max_suspects: 12,
            max_failed_mods: 10,
            max_key_errors: 10,
            max_cause_evidence: 3,
            include_notes: true,
        }
    }
}

impl AnalyzerConfig {
    /// Sets the cause cap.
    #[must_use]
    pub const fn with_max_causes(mut self, max: usize) -> Self {
        self.max_causes = max;
        self
    }

    /// Sets the suspect cap.
    #[must_use]
    pub const fn with_max_suspects(mut self, max: usize) -> Self {
        self.max_suspects = max;
        self
    }

    /// Sets the failed-mod cap.
    #[must_use]
    pub const fn with_max_failed_mods(mut self, max: usize) -> Self {
        self.max_failed_mods = max;
        self
    }

    /// Sets the key-error cap.
    #[must_use]
    pub const fn with_max_key_errors(mut self, max: usize) -> Self {
        self.max_key_errors = max;
        self
    }

    /// Sets the per-cause evidence cap.
    #[must_use]
    pub const fn with_max_cause_evidence(mut self, max: usize) -> Self {
        self.max_cause_evidence = max;
        self
    }

    /// Enables or disables confidence notes.
    #[must_use]
    pub const fn with_notes(mut self, enabled: bool) -> Self {
        self.include_notes = enabled;
        self
    }

    /// Checks that every cap is positive.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzeError::InvalidConfig`] naming the first zero cap.
    pub fn validate(&self) -> Result<()> {
        let caps = [
            ("maxCauses", self.max_causes),
            ("maxSuspects", self.max_suspects),
            ("maxFailedMods", self.max_failed_mods),
            ("maxKeyErrors", self.max_key_errors),
            ("maxCauseEvidence", self.max_cause_evidence),
        ];
        match caps.iter().find(|(_, value)| *value == 0) {
            Some((name, _)) => Err(AnalyzeError::InvalidConfig(format!(
                "{name} must be greater than zero"
            ))),
            None => Ok(()),
        }
    }
}

/// Crash log analyzer.
///
/// Borrows its rule catalogue and token tables, so one set of tables can
/// serve any number of analyzers.
#[derive(Debug, Clone)]
pub struct Analyzer<'t> {
    config: AnalyzerConfig,
    catalog: &'t RuleCatalog,
    tables: &'t TokenTables,
    parser: LineParser,
}

impl Default for Analyzer<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer<'static> {
    /// Creates an analyzer with the default config and builtin tables.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: AnalyzerConfig::default(),
            catalog: RuleCatalog::builtin(),
            tables: TokenTables::builtin(),
            parser: LineParser::new(),
        }
    }

    /// Creates an analyzer with the builtin tables and a custom config.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzeError::InvalidConfig`] if a cap is zero.
    pub fn with_config(config: AnalyzerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new()
        })
    }
}

impl<'t> Analyzer<'t> {
    /// Creates an analyzer over custom tables.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzeError::InvalidConfig`] if a cap is zero.
    pub fn with_catalog(
        config: AnalyzerConfig,
        catalog: &'t RuleCatalog,
        tables: &'t TokenTables,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            catalog,
            tables,
            parser: LineParser::new(),
        })
    }

    /// Sets the source stamped on lines that carry none.
    #[must_use]
    pub fn with_default_source(mut self, source: impl Into<String>) -> Self {
        self.parser = LineParser::with_default_source(source);
        self
    }

    /// Returns the analyzer's configuration.
    #[must_use]
    pub const fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyzes pre-split input lines.
    #[must_use]
    pub fn analyze_lines(&self, inputs: &[LogInput]) -> LogAnalyzeResult {
        let lines = self.parser.parse_inputs(inputs);
        self.analyze_parsed(&lines)
    }

    /// Analyzes raw log text.
    #[must_use]
    pub fn analyze_text(&self, text: &str) -> LogAnalyzeResult {
        let lines = self.parser.parse_text(text);
        self.analyze_parsed(&lines)
    }

    /// Analyzes a JSON document: an array of lines or a log-source payload.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzeError::Log`] if the document has the wrong shape.
    pub fn analyze_json(&self, json: &str) -> Result<LogAnalyzeResult> {
        let inputs = decode_inputs(json)?;
        Ok(self.analyze_lines(&inputs))
    }

    /// Ranks crash suspects only.
    #[must_use]
    pub fn suspects<S: AsRef<str>>(&self, messages: &[S]) -> Vec<CrashSuspect> {
        let inputs: Vec<LogInput> = messages.iter().map(|m| LogInput::new(m.as_ref())).collect();
        let lines = self.parser.parse_inputs(&inputs);
        let ctx = AnalysisContext::new(&lines);
        extract_suspects(&ctx, self.tables, self.config.max_suspects)
    }

    /// Runs every consumer over already parsed lines.
    #[must_use]
    pub fn analyze_parsed(&self, lines: &[LogLine]) -> LogAnalyzeResult {
        let mut result = LogAnalyzeResult {
            total_lines: lines.len(),
            ..LogAnalyzeResult::default()
        };
        if lines.is_empty() {
            return result;
        }
        for line in lines {
            result.record(line.severity);
        }

        let ctx = AnalysisContext::new(lines);
        let causes = score_causes(
            &ctx,
            self.catalog,
            self.config.max_causes,
            self.config.max_cause_evidence,
        );
        result.likely_causes = causes.causes;
        result.evidence_by_cause = causes.evidence;
        result.suspects = extract_suspects(&ctx, self.tables, self.config.max_suspects);
        result.failed_mods = extract_failed_mods(&ctx, self.tables, self.config.max_failed_mods);
        result.key_errors = collect_key_errors(&ctx, self.config.max_key_errors);
        if self.config.include_notes {
            result.confidence_notes = confidence_notes(&result);
        }

        debug!(
            total_lines = result.total_lines,
            errors = result.error_count,
            anchors = ctx.causal().anchor_count(),
            causes = result.likely_causes.len(),
            suspects = result.suspects.len(),
            failed_mods = result.failed_mods.len(),
            "analyzed log"
        );
        result
    }
}

/// Collects the most significant error lines.
///
/// Keeps error-severity lines and lines with failure words, ranked by
/// `severity_weight × causal_boost` (ties by position), one per dedupe key.
#[must_use]
pub fn collect_key_errors(ctx: &AnalysisContext<'_>, max: usize) -> Vec<String> {
    let mut candidates: Vec<(f64, &LogLine)> = ctx
        .lines()
        .iter()
        .filter(|line| line.is_error() || has_failure_words(&line.lower_message))
        .map(|line| (severity_weight(line.severity) * ctx.boost(line.index), line))
        .collect();
    candidates.sort_by(|(a_score, a), (b_score, b)| {
        b_score
            .partial_cmp(a_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.index.cmp(&b.index))
    });

    let mut seen: HashSet<&str> = HashSet::new();
    let mut key_errors = Vec::new();
    for (_, line) in candidates {
        if key_errors.len() >= max {
            break;
        }
        let key = ctx.repeats().key(line.index).unwrap_or(line.lower_message.as_str());
        if seen.insert(key) {
            key_errors.push(line.message.trim().to_string());
        }
    }
    key_errors
}

fn confidence_notes(result: &LogAnalyzeResult) -> Vec<String> {
    let mut notes = Vec::new();
    if let Some(cause) = result.likely_causes.first() {
        notes.push(format!(
            "Top cause: {} ({:.0}% confidence)",
            cause.title,
            cause.confidence * 100.0
        ));
    }
    if let Some(suspect) = result.suspects.first() {
        let noun = if suspect.matches == 1 { "line" } else { "lines" };
        notes.push(format!(
            "Top suspect: {} ({} matching {noun})",
            suspect.label, suspect.matches
        ));
    }
    if !result.failed_mods.is_empty() {
        let count = result.failed_mods.len();
        let noun = if count == 1 { "mod" } else { "mods" };
        notes.push(format!("{count} {noun} reported as failed"));
    }
    notes
}

/// Analyzes pre-split lines with the builtin tables.
#[must_use]
pub fn analyze_log_lines(inputs: &[LogInput]) -> LogAnalyzeResult {
    Analyzer::new().analyze_lines(inputs)
}

/// Analyzes raw log text with the builtin tables.
#[must_use]
pub fn analyze_log_text(text: &str) -> LogAnalyzeResult {
    Analyzer::new().analyze_text(text)
}

/// Analyzes a JSON document with the builtin tables.
///
/// # Errors
///
/// Returns [`AnalyzeError::Log`] if the document is not an array of lines
/// or a log-source payload.
pub fn analyze_log_json(json: &str) -> Result<LogAnalyzeResult> {
    Analyzer::new().analyze_json(json)
}

/// Ranks crash suspects over plain messages with the builtin tables.
#[must_use]
pub fn detect_crash_suspects_from_messages<S: AsRef<str>>(messages: &[S]) -> Vec<CrashSuspect> {
    Analyzer::new().suspects(messages)
}
