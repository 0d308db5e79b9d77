use super::{class_order, DistributionFilter};
use crate::{
    constants::{EXPONENTIAL_ALPHA_MAX, EXPONENTIAL_ALPHA_MIN},
    emotion::{EmotionClass, EmotionResult},
    Error, Result,
};

/// Exponential smoothing filter over class probabilities
pub struct ExponentialFilter {
    alpha: f64,
    last: Option<Vec<(EmotionClass, f64)>>,
}

impl ExponentialFilter {
    /// # Errors
    ///
    /// Returns `FilterError` unless `alpha` is in (0, 1]
    pub fn new(alpha: f64) -> Result<Self> {
        if !(alpha > EXPONENTIAL_ALPHA_MIN && alpha <= EXPONENTIAL_ALPHA_MAX) {
            return Err(Error::FilterError(format!("Alpha must be in (0, 1], got {alpha}")));
        }
        Ok(Self { alpha, last: None })
    }

    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl DistributionFilter for ExponentialFilter {
    fn apply(&mut self, result: &EmotionResult) -> EmotionResult {
        if result.is_fallback() {
            return result.clone();
        }
        let current = result.distribution();

        let smoothed: Vec<(EmotionClass, f64)> = match &self.last {
            Some(last) if class_order(last) == class_order(current) => current
                .iter()
                .zip(last)
                .map(|(&(class, p), &(_, prev))| (class, self.alpha * p + (1.0 - self.alpha) * prev))
                .collect(),
            _ => current.to_vec(),
        };

        self.last = Some(smoothed.clone());
        EmotionResult::from_weights(&smoothed)
    }

    fn reset(&mut self) {
        self.last = None;
    }

    fn name(&self) -> &str {
        "ExponentialFilter"
    }
}
