//! Suspect and failed-mod extraction.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::context::AnalysisContext;
use crate::scoring::{
    has_failure_words, severity_weight, to_confidence, FAILED_MOD_BOOST, SUSPECT_FAIL_BOOST,
    SUSPECT_PLAIN_BOOST,
};
use crate::tokens::{failed_mod_tokens, suspect_tokens, titleize, TokenTables};
use crate::types::{CrashSuspect, FailedMod};

/// Distinct evidence lines kept per suspect.
pub const SIGNAL_CAP: usize = 3;

#[derive(Debug, Default)]
struct SuspectTally {
    score: f64,
    matches: usize,
    signals: Vec<String>,
}

#[derive(Debug, Default)]
struct FailedTally {
    score: f64,
    best: f64,
    reason: String,
}

/// Ranks mod tokens implicated anywhere in the log.
///
/// Every token occurrence adds `severity_weight × fail_boost × causal_boost`
/// to its tally. A token is counted once per line.
#[must_use]
pub fn extract_suspects(
    ctx: &AnalysisContext<'_>,
    tables: &TokenTables,
    max_suspects: usize,
) -> Vec<CrashSuspect> {
    let mut tallies: BTreeMap<String, SuspectTally> = BTreeMap::new();

    for line in ctx.lines() {
        let tokens = suspect_tokens(&line.lower_message, tables);
        if tokens.is_empty() {
            continue;
        }
        let fail_boost = if has_failure_words(&line.lower_message) {
            SUSPECT_FAIL_BOOST
        } else {
            SUSPECT_PLAIN_BOOST
        };
        let score = severity_weight(line.severity) * fail_boost * ctx.boost(line.index);
        let text = line.message.trim();

        for token in tokens {
            let tally = tallies.entry(token).or_default();
            tally.score += score;
            tally.matches += 1;
            if tally.signals.len() < SIGNAL_CAP && !tally.signals.iter().any(|s| s == text) {
                tally.signals.push(text.to_string());
            }
        }
    }

    let mut suspects: Vec<CrashSuspect> = tallies
        .into_iter()
        .map(|(id, tally)| CrashSuspect {
            label: titleize(&id),
            id,
            matches: tally.matches,
            confidence: to_confidence(tally.score),
            signals: tally.signals,
        })
        .collect();
    suspects.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.matches.cmp(&a.matches))
            .then_with(|| a.label.cmp(&b.label))
            .then_with(|| a.id.cmp(&b.id))
    });
    suspects.truncate(max_suspects);
    suspects
}

/// Ranks mods reported as failing to load.
///
/// Only lines carrying failure words are considered. The reason is the
/// line with the strictly highest single score for that token.
#[must_use]
pub fn extract_failed_mods(
    ctx: &AnalysisContext<'_>,
    tables: &TokenTables,
    max_failed: usize,
) -> Vec<FailedMod> {
    let mut tallies: BTreeMap<String, FailedTally> = BTreeMap::new();

    for line in ctx.lines() {
        if !has_failure_words(&line.lower_message) {
            continue;
        }
        let tokens = failed_mod_tokens(&line.lower_message, tables);
        if tokens.is_empty() {
            continue;
        }
        let score = severity_weight(line.severity) * FAILED_MOD_BOOST * ctx.boost(line.index);
        for token in tokens {
            let tally = tallies.entry(token).or_default();
            tally.score += score;
            if score > tally.best {
                tally.best = score;
                tally.reason = line.message.trim().to_string();
            }
        }
    }

    let mut failed: Vec<FailedMod> = tallies
        .into_iter()
        .map(|(id, tally)| FailedMod {
            label: titleize(&id),
            id,
            reason: tally.reason,
            confidence: to_confidence(tally.score),
        })
        .collect();
    failed.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.label.cmp(&b.label))
    });
    failed.truncate(max_failed);
    failed
}
