//! Per-call analysis context shared by every consumer.
//!
//! The causal model and repeat counts are computed once per analysis call
//! and handed to the cause engine, the extractors and the aggregator.

use std::collections::HashMap;

use modsight_logs::{dedupe_key, LogLine};

use crate::causal::CausalModel;
use crate::scoring::dedupe_penalty;

/// Dedupe keys and their repeat counts across one log.
#[derive(Debug, Clone, Default)]
pub struct RepeatIndex {
    keys: Vec<String>,
    counts: HashMap<String, usize>,
}

impl RepeatIndex {
    /// Computes the dedupe key of every line and counts repeats.
    #[must_use]
    pub fn build(lines: &[LogLine]) -> Self {
        let keys: Vec<String> = lines.iter().map(|l| dedupe_key(&l.message)).collect();
        let mut counts = HashMap::with_capacity(keys.len());
        for key in &keys {
            *counts.entry(key.clone()).or_insert(0) += 1;
        }
        Self { keys, counts }
    }

    /// Dedupe key of the line at `index`.
    #[must_use]
    pub fn key(&self, index: usize) -> Option<&str> {
        self.keys.get(index).map(String::as_str)
    }

    /// How many lines share the key of the line at `index`.
    #[must_use]
    pub fn repeat_count(&self, index: usize) -> usize {
        self.key(index)
            .and_then(|key| self.counts.get(key))
            .copied()
            .unwrap_or(1)
    }
}

/// Parsed lines plus the derived per-call models.
#[derive(Debug, Clone)]
pub struct AnalysisContext<'a> {
    lines: &'a [LogLine],
    causal: CausalModel,
    repeats: RepeatIndex,
}

impl<'a> AnalysisContext<'a> {
    /// Builds the context for a parsed log.
    #[must_use]
    pub fn new(lines: &'a [LogLine]) -> Self {
        Self {
            lines,
            causal: CausalModel::build(lines),
            repeats: RepeatIndex::build(lines),
        }
    }

    /// The parsed lines.
    #[must_use]
    pub const fn lines(&self) -> &'a [LogLine] {
        self.lines
    }

    /// The anchor/proximity model.
    #[must_use]
    pub const fn causal(&self) -> &CausalModel {
        &self.causal
    }

    /// The repeat index.
    #[must_use]
    pub const fn repeats(&self) -> &RepeatIndex {
        &self.repeats
    }

    /// Causal multiplier for the line at `index`.
    #[must_use]
    pub fn boost(&self, index: usize) -> f64 {
        self.causal.boost(index)
    }

    /// `1 / sqrt(repeat count)` for the line at `index`.
    #[must_use]
    pub fn dedupe_penalty(&self, index: usize) -> f64 {
        dedupe_penalty(self.repeats.repeat_count(index))
    }
}
