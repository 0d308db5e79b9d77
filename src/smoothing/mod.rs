//! Temporal smoothing of per-frame emotion distributions.
//!
//! Each frame is classified independently; these filters blend successive
//! distributions so a live label does not flicker. Filters sit outside the
//! scoring pipeline and never feed back into it.

/// Exponential smoothing for responsive blending
pub mod exponential;

/// Moving average over a fixed window of frames
pub mod moving_average;

use crate::{
    constants::{DEFAULT_EXPONENTIAL_ALPHA, DEFAULT_MOVING_AVERAGE_WINDOW},
    emotion::{EmotionClass, EmotionResult},
    Error, Result,
};

/// Trait for all distribution filters
pub trait DistributionFilter: Send + Sync {
    /// Blend a new result into the filter state and return the smoothed
    /// result. Fallback results pass through without touching the state.
    fn apply(&mut self, result: &EmotionResult) -> EmotionResult;

    /// Reset filter state
    fn reset(&mut self);

    /// Get filter name
    fn name(&self) -> &str;
}

/// No-op filter that passes results through unchanged
pub struct NoFilter;

impl DistributionFilter for NoFilter {
    fn apply(&mut self, result: &EmotionResult) -> EmotionResult {
        result.clone()
    }

    fn reset(&mut self) {}

    fn name(&self) -> &str {
        "NoFilter"
    }
}

/// Class order of a distribution, used to detect a change of class set
pub(crate) fn class_order(distribution: &[(EmotionClass, f64)]) -> Vec<EmotionClass> {
    distribution.iter().map(|(c, _)| *c).collect()
}

/// Create a filter from `name` or `name:parameter`, e.g. `exponential:0.3`
///
/// # Errors
///
/// Returns `FilterError` for unknown names and invalid parameters
pub fn create_filter(filter_spec: &str) -> Result<Box<dyn DistributionFilter>> {
    let (name, param) = match filter_spec.split_once(':') {
        Some((name, param)) => (name.trim(), Some(param.trim())),
        None => (filter_spec.trim(), None),
    };

    match name.to_lowercase().as_str() {
        "none" | "nofilter" => Ok(Box::new(NoFilter)),
        "exponential" | "ema" => {
            let alpha = match param {
                Some(p) => p
                    .parse::<f64>()
                    .map_err(|e| Error::FilterError(format!("Alpha '{p}' is not a number: {e}")))?,
                None => DEFAULT_EXPONENTIAL_ALPHA,
            };
            Ok(Box::new(exponential::ExponentialFilter::new(alpha)?))
        }
        "moving_average" | "movingaverage" => {
            let window = match param {
                Some(p) => p.parse::<usize>().map_err(|e| {
                    Error::FilterError(format!("Window size '{p}' is not a count: {e}"))
                })?,
                None => DEFAULT_MOVING_AVERAGE_WINDOW,
            };
            Ok(Box::new(moving_average::MovingAverageFilter::new(window)?))
        }
        _ => Err(Error::FilterError(format!("Unknown filter type: {filter_spec}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use EmotionClass::{Happy, Sad};

    #[test]
    fn test_no_filter() {
        let mut filter = NoFilter;
        let result = EmotionResult::from_weights(&[(Happy, 3.0), (Sad, 1.0)]);
        assert_eq!(filter.apply(&result), result);
    }

    #[test]
    fn test_create_filter() {
        assert_eq!(create_filter("none").unwrap().name(), "NoFilter");
        assert_eq!(create_filter("exponential").unwrap().name(), "ExponentialFilter");
        assert_eq!(create_filter("EMA:0.2").unwrap().name(), "ExponentialFilter");
        assert_eq!(create_filter("moving_average:3").unwrap().name(), "MovingAverageFilter");
        assert!(create_filter("kalman").is_err());
        assert!(create_filter("exponential:fast").is_err());
        assert!(create_filter("moving_average:-1").is_err());
    }
}
