//! Anchor and proximity model.
//!
//! Lines inside or right after an exception boundary ("anchors") and lines
//! near the first fatal-looking line weigh more than the rest of the log.

use once_cell::sync::Lazy;
use regex::Regex;

use modsight_logs::LogLine;

/// How far an exception opener extends the anchor window.
pub const OPENER_WINDOW: usize = 12;

/// How far a stack frame or `caused by:` line extends the anchor window.
pub const FRAME_WINDOW: usize = 8;

/// Multiplier for anchor lines.
pub const ANCHOR_BOOST: f64 = 1.45;

/// Multiplier for lines within [`NEAR_FATAL_DISTANCE`] of the first fatal line.
pub const NEAR_FATAL_BOOST: f64 = 1.25;

/// Multiplier for lines within [`FAR_FATAL_DISTANCE`] of the first fatal line.
pub const FAR_FATAL_BOOST: f64 = 1.1;

/// Distance (in lines) for [`NEAR_FATAL_BOOST`].
pub const NEAR_FATAL_DISTANCE: usize = 16;

/// Distance (in lines) for [`FAR_FATAL_BOOST`].
pub const FAR_FATAL_DISTANCE: usize = 50;

static FIRST_FATAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(caused by|exception|fatal|mod loading has failed|crash report)\b")
        .unwrap_or_else(|_| unreachable!())
});

fn is_caused_by(lower: &str) -> bool {
    lower.trim_start().starts_with("caused by:")
}

fn opens_exception(lower: &str) -> bool {
    lower.contains("exception in thread")
        || is_caused_by(lower)
        || lower.contains("fatal")
        || lower.contains("mod loading has failed")
}

/// Anchor set and first fatal index for one parsed log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CausalModel {
    anchors: Vec<bool>,
    first_fatal: Option<usize>,
}

impl CausalModel {
    /// Builds the model with one pass over the lines.
    #[must_use]
    pub fn build(lines: &[LogLine]) -> Self {
        let mut anchors = vec![false; lines.len()];
        let mut window_end: Option<usize> = None;
        let mut first_fatal = None;

        for (pos, line) in lines.iter().enumerate() {
            let lower = line.lower_message.as_str();
            if opens_exception(lower) {
                window_end = window_end.max(Some(pos + OPENER_WINDOW));
            }
            if line.in_stack_trace || is_caused_by(lower) {
                window_end = window_end.max(Some(pos + FRAME_WINDOW));
            }
            if window_end.is_some_and(|end| pos <= end) {
                anchors[pos] = true;
            }
            if first_fatal.is_none() && FIRST_FATAL.is_match(&line.message) {
                first_fatal = Some(pos);
            }
        }

        Self {
            anchors,
            first_fatal,
        }
    }

    /// Returns true if the line at `index` is an anchor.
    #[must_use]
    pub fn is_anchor(&self, index: usize) -> bool {
        self.anchors.get(index).copied().unwrap_or(false)
    }

    /// Index of the first fatal-looking line.
    #[must_use]
    pub const fn first_fatal(&self) -> Option<usize> {
        self.first_fatal
    }

    /// Number of anchor lines.
    #[must_use]
    pub fn anchor_count(&self) -> usize {
        self.anchors.iter().filter(|a| **a).count()
    }

    /// Causal multiplier for the line at `index`.
    #[must_use]
    pub fn boost(&self, index: usize) -> f64 {
        let base = if self.is_anchor(index) { ANCHOR_BOOST } else { 1.0 };
        match self.first_fatal.map(|fatal| fatal.abs_diff(index)) {
            Some(distance) if distance <= NEAR_FATAL_DISTANCE => base * NEAR_FATAL_BOOST,
            Some(distance) if distance <= FAR_FATAL_DISTANCE => base * FAR_FATAL_BOOST,
            _ => base,
        }
    }
}
