//! Cause rule engine.
//!
//! Every line is tested against every rule. A match contributes
//!
//! ```text
//! weight × severity_weight × causal_boost × dedupe_penalty × boilerplate_penalty
//! ```
//!
//! to the rule's score. Causes are ranked by score, ties by title.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use tracing::trace;

use crate::context::AnalysisContext;
use crate::rules::{CauseRule, RuleCatalog};
use crate::scoring::{boilerplate_penalty, severity_weight, to_confidence, REASON_WORDS};
use crate::types::LogLikelyCause;

/// Evidence lines kept per cause while scoring.
pub const EVIDENCE_CAP: usize = 4;

/// Accumulator for one rule during a pass.
#[derive(Debug, Clone)]
struct ScoredCause<'r> {
    rule: &'r CauseRule,
    score: f64,
    reason: String,
    evidence: Vec<String>,
}

impl<'r> ScoredCause<'r> {
    fn new(rule: &'r CauseRule, first_line: &str) -> Self {
        Self {
            rule,
            score: 0.0,
            reason: first_line.to_string(),
            evidence: Vec::with_capacity(EVIDENCE_CAP),
        }
    }

    fn push_evidence(&mut self, line: &str) {
        if self.evidence.len() < EVIDENCE_CAP && !self.evidence.iter().any(|e| e == line) {
            self.evidence.push(line.to_string());
        }
    }
}

/// Ranked causes plus their supporting lines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CauseReport {
    /// Ranked causes, capped.
    pub causes: Vec<LogLikelyCause>,
    /// Supporting lines per reported cause id, capped.
    pub evidence: BTreeMap<String, Vec<String>>,
}

/// Scores every rule of `catalog` over the context's lines.
///
/// Keeps the top `max_causes` causes and at most `max_evidence` lines of
/// evidence for each.
#[must_use]
pub fn score_causes(
    ctx: &AnalysisContext<'_>,
    catalog: &RuleCatalog,
    max_causes: usize,
    max_evidence: usize,
) -> CauseReport {
    let mut scored: Vec<Option<ScoredCause<'_>>> = vec![None; catalog.len()];

    for line in ctx.lines() {
        let mut line_base: Option<f64> = None;
        let text = line.message.trim();

        for (slot, rule) in scored.iter_mut().zip(catalog.rules()) {
            if !rule.matches(&line.message) {
                continue;
            }
            let base = *line_base.get_or_insert_with(|| {
                severity_weight(line.severity)
                    * ctx.boost(line.index)
                    * ctx.dedupe_penalty(line.index)
                    * boilerplate_penalty(&line.lower_message)
            });

            let cause = slot.get_or_insert_with(|| ScoredCause::new(rule, text));
            cause.score += rule.weight() * base;
            cause.push_evidence(text);
            if line.is_error() || REASON_WORDS.is_match(&line.lower_message) {
                cause.reason = text.to_string();
            }
        }
    }

    let mut ranked: Vec<ScoredCause<'_>> = scored.into_iter().flatten().collect();
    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.rule.title().cmp(b.rule.title()))
    });
    ranked.truncate(max_causes);

    trace!(matched = ranked.len(), "scored cause rules");

    let mut report = CauseReport::default();
    for cause in ranked {
        let id = cause.rule.id().to_string();
        let mut evidence = cause.evidence;
        evidence.truncate(max_evidence);
        report.evidence.insert(id.clone(), evidence);
        report.causes.push(LogLikelyCause {
            id,
            title: cause.rule.title().to_string(),
            confidence: to_confidence(cause.score),
            reason: cause.reason,
            fixes: cause.rule.fixes().to_vec(),
        });
    }
    report
}
