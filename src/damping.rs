//! Dominance damping: trim a single runaway score before normalization.

use crate::{
    emotion::{EmotionClass, ScoreVector},
    Error, Result,
};
use log::debug;

/// Scores after damping, with the class that was damped if any
#[derive(Debug, Clone, PartialEq)]
pub struct DampedScores {
    pub scores: ScoreVector,
    pub damped: Option<EmotionClass>,
}

/// Multiplies the top score by `factor` when it exceeds every other score by
/// more than `ratio`. Applied at most once per score vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DominanceDamper {
    ratio: f64,
    factor: f64,
}

impl DominanceDamper {
    /// # Errors
    ///
    /// Returns `ConfigError` unless `ratio >= 1` and `0 < factor <= 1`
    pub fn new(ratio: f64, factor: f64) -> Result<Self> {
        if !ratio.is_finite() || ratio < 1.0 {
            return Err(Error::ConfigError(format!(
                "Dominance ratio must be at least 1, got {ratio}"
            )));
        }
        if !factor.is_finite() || factor <= 0.0 || factor > 1.0 {
            return Err(Error::ConfigError(format!(
                "Dominance factor must be in (0, 1], got {factor}"
            )));
        }
        Ok(Self { ratio, factor })
    }

    /// A damper that never changes scores
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            ratio: 1.0,
            factor: 1.0,
        }
    }

    #[must_use]
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    #[must_use]
    pub fn factor(&self) -> f64 {
        self.factor
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.factor >= 1.0
    }

    #[must_use]
    pub fn apply(&self, mut scores: ScoreVector) -> DampedScores {
        if self.is_disabled() || scores.len() < 2 {
            return DampedScores { scores, damped: None };
        }
        let Some((top_class, top)) = scores.argmax() else {
            return DampedScores { scores, damped: None };
        };

        let dominant = scores
            .iter()
            .filter(|&(class, _)| class != top_class)
            .all(|(_, other)| top > other * self.ratio);
        if !dominant {
            return DampedScores { scores, damped: None };
        }

        let damped = top * self.factor;
        debug!("Damping dominant {top_class}: {top:.2} -> {damped:.2}");
        scores.set(top_class, damped);
        DampedScores {
            scores,
            damped: Some(top_class),
        }
    }
}

impl Default for DominanceDamper {
    fn default() -> Self {
        Self {
            ratio: crate::constants::DEFAULT_DOMINANCE_RATIO,
            factor: crate::constants::DEFAULT_DOMINANCE_FACTOR,
        }
    }
}
