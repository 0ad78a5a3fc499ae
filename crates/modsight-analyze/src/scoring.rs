//! Shared scoring primitives.
//!
//! The constants below are empirically tuned and form a fixed contract:
//! downstream confidence bands depend on them.

use once_cell::sync::Lazy;
use regex::Regex;

use modsight_logs::Severity;

/// Words marking a line as describing a failure (suspects, failed mods, key errors).
pub(crate) static FAILURE_WORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"failed|crash|fatal|exception|caused by|could not|missing|invalid")
        .unwrap_or_else(|_| unreachable!())
});

/// Words that promote a matching line to a cause's `reason`.
pub(crate) static REASON_WORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"caused by|exception|fatal|failed|missing|could not")
        .unwrap_or_else(|_| unreachable!())
});

static PROGRESS_WORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"starting|loading|loaded|found|using|detected|launching|progress|handshake|auth",
    )
    .unwrap_or_else(|_| unreachable!())
});

static PROGRESS_FAILURE_WORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"error|warn|failed|exception|fatal|caused by|missing")
        .unwrap_or_else(|_| unreachable!())
});

static SUPPRESSED_WORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"stacktrace omitted|suppressed|continuing").unwrap_or_else(|_| unreachable!())
});

/// Multiplier applied to failure-bearing lines when scoring suspects.
pub const SUSPECT_FAIL_BOOST: f64 = 1.36;

/// Multiplier applied to other lines when scoring suspects.
pub const SUSPECT_PLAIN_BOOST: f64 = 0.78;

/// Multiplier applied to every failed-mod line.
pub const FAILED_MOD_BOOST: f64 = 2.15;

/// Per-severity score weight.
#[must_use]
pub const fn severity_weight(severity: Severity) -> f64 {
    match severity {
        Severity::Error => 2.35,
        Severity::Warn => 1.2,
        Severity::Debug => 0.74,
        Severity::Trace => 0.6,
        Severity::Info => 0.94,
    }
}

/// Squashes an unbounded score into `[0, 1]`, rounded to two decimals.
///
/// `clamp01(0.14 + log10(1 + max(0, score)) * 0.34)`
#[must_use]
pub fn to_confidence(score: f64) -> f64 {
    let raw = 0.14 + (1.0 + score.max(0.0)).log10() * 0.34;
    let clamped = if raw.is_finite() { raw.clamp(0.0, 1.0) } else { 1.0 };
    (clamped * 100.0).round() / 100.0
}

/// Dampens routine status lines that match a rule incidentally.
///
/// Takes the lowercased message.
#[must_use]
pub fn boilerplate_penalty(lower_message: &str) -> f64 {
    if PROGRESS_WORDS.is_match(lower_message) && !PROGRESS_FAILURE_WORDS.is_match(lower_message) {
        0.65
    } else if SUPPRESSED_WORDS.is_match(lower_message) {
        0.7
    } else {
        1.0
    }
}

/// `1 / sqrt(repeat_count)`; a count of zero is treated as one.
#[must_use]
pub fn dedupe_penalty(repeat_count: usize) -> f64 {
    1.0 / (repeat_count.max(1) as f64).sqrt()
}

/// Returns true if a lowercased message carries failure words.
#[must_use]
pub fn has_failure_words(lower_message: &str) -> bool {
    FAILURE_WORDS.is_match(lower_message)
}
