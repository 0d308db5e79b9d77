use std::collections::VecDeque;

use super::{class_order, DistributionFilter};
use crate::{
    emotion::{EmotionClass, EmotionResult},
    Error, Result,
};

/// Moving average filter over the last `window_size` distributions
pub struct MovingAverageFilter {
    window_size: usize,
    buffer: VecDeque<Vec<(EmotionClass, f64)>>,
}

impl MovingAverageFilter {
    /// # Errors
    ///
    /// Returns `FilterError` if `window_size` is zero
    pub fn new(window_size: usize) -> Result<Self> {
        if window_size == 0 {
            return Err(Error::FilterError("Window size must be greater than 0".to_string()));
        }
        Ok(Self {
            window_size,
            buffer: VecDeque::with_capacity(window_size),
        })
    }

    #[must_use]
    pub fn window_size(&self) -> usize {
        self.window_size
    }
}

impl DistributionFilter for MovingAverageFilter {
    fn apply(&mut self, result: &EmotionResult) -> EmotionResult {
        if result.is_fallback() {
            return result.clone();
        }
        let current = result.distribution();

        if let Some(front) = self.buffer.front() {
            if class_order(front) != class_order(current) {
                self.buffer.clear();
            }
        }
        if self.buffer.len() >= self.window_size {
            self.buffer.pop_front();
        }
        self.buffer.push_back(current.to_vec());

        let n = self.buffer.len() as f64;
        let averaged: Vec<(EmotionClass, f64)> = current
            .iter()
            .enumerate()
            .map(|(i, &(class, _))| {
                let sum: f64 = self.buffer.iter().map(|d| d[i].1).sum();
                (class, sum / n)
            })
            .collect();

        EmotionResult::from_weights(&averaged)
    }

    fn reset(&mut self) {
        self.buffer.clear();
    }

    fn name(&self) -> &str {
        "MovingAverageFilter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use EmotionClass::{Happy, Sad};

    fn result(happy: f64) -> EmotionResult {
        EmotionResult::from_weights(&[(Happy, happy), (Sad, 1.0 - happy)])
    }

    #[test]
    fn test_moving_average() {
        let mut filter = MovingAverageFilter::new(3).unwrap();

        let p = |r: EmotionResult| r.probability(Happy).unwrap();
        assert!((p(filter.apply(&result(0.9))) - 0.9).abs() < 1e-12);
        assert!((p(filter.apply(&result(0.3))) - 0.6).abs() < 1e-12);
        assert!((p(filter.apply(&result(0.0))) - 0.4).abs() < 1e-12);

        // Window is full, oldest value should be dropped
        let out = filter.apply(&result(0.0));
        assert!((out.probability(Happy).unwrap() - 0.1).abs() < 1e-12);
        assert_eq!(out.label(), Sad);
    }

    #[test]
    fn test_reset() {
        let mut filter = MovingAverageFilter::new(4).unwrap();
        filter.apply(&result(1.0));
        filter.reset();
        let out = filter.apply(&result(0.2));
        assert!((out.probability(Happy).unwrap() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_zero_window_rejected() {
        assert!(MovingAverageFilter::new(0).is_err());
    }
}
