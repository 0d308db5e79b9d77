//! Confidence normalization: damped scores to a probability distribution.

use crate::{damping::DampedScores, emotion::EmotionResult};
use log::warn;

/// Converts damped scores into an [`EmotionResult`].
///
/// The distribution keeps the active class order and sums to one. A
/// non-positive or non-finite total yields a uniform fallback labelled with
/// the first active class.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfidenceNormalizer;

impl ConfidenceNormalizer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    #[must_use]
    pub fn normalize(&self, damped: &DampedScores) -> EmotionResult {
        let result = EmotionResult::from_weights(damped.scores.as_slice());
        if result.is_fallback() {
            warn!(
                "Score total {} is not positive; falling back to a uniform distribution",
                damped.scores.total()
            );
        }
        result
    }
}
