//! Running emotion statistics over a stream of results.
//!
//! Counts how often each class was the confident label of a frame, so a
//! session can report its dominant emotion and per-class percentages.

use crate::{
    constants::DEFAULT_CONFIDENCE_THRESHOLD,
    emotion::{EmotionClass, EmotionResult},
};
use std::collections::BTreeMap;

/// Per-class label counts
pub struct EmotionTally {
    confidence_threshold: f64,
    counts: BTreeMap<EmotionClass, u64>,
    skipped: u64,
}

impl EmotionTally {
    /// Create a tally that counts labels with at least `confidence_threshold`
    #[must_use]
    pub fn new(confidence_threshold: f64) -> Self {
        Self {
            confidence_threshold,
            counts: BTreeMap::new(),
            skipped: 0,
        }
    }

    /// Record one result. Returns whether it was counted.
    ///
    /// Fallback results and labels below the confidence threshold are skipped.
    pub fn record(&mut self, result: &EmotionResult) -> bool {
        if result.is_fallback() || result.confidence() < self.confidence_threshold {
            self.skipped += 1;
            return false;
        }
        *self.counts.entry(result.label()).or_insert(0) += 1;
        true
    }

    #[must_use]
    pub fn count(&self, class: EmotionClass) -> u64 {
        self.counts.get(&class).copied().unwrap_or(0)
    }

    /// Number of counted results
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of skipped results
    #[must_use]
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Share of counted results per class, in percent
    #[must_use]
    pub fn percentages(&self) -> Vec<(EmotionClass, f64)> {
        let total = self.total();
        if total == 0 {
            return Vec::new();
        }
        self.counts
            .iter()
            .map(|(&class, &n)| (class, n as f64 * 100.0 / total as f64))
            .collect()
    }

    /// Most frequently counted class; the canonical class order breaks ties
    #[must_use]
    pub fn dominant(&self) -> Option<EmotionClass> {
        let mut best: Option<(EmotionClass, u64)> = None;
        for (&class, &n) in &self.counts {
            match best {
                Some((_, top)) if n <= top => {}
                _ => best = Some((class, n)),
            }
        }
        best.map(|(class, _)| class)
    }

    /// Reset the tally
    pub fn reset(&mut self) {
        self.counts.clear();
        self.skipped = 0;
    }
}

impl Default for EmotionTally {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIDENCE_THRESHOLD)
    }
}
