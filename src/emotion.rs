//! Emotion classes, score vectors and classification results.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Discrete emotion category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EmotionClass {
    Angry,
    Disgust,
    Fear,
    Happy,
    Sad,
    Surprise,
    Neutral,
}

impl EmotionClass {
    /// Canonical seven-class ordering
    pub const ALL: [Self; 7] = [
        Self::Angry,
        Self::Disgust,
        Self::Fear,
        Self::Happy,
        Self::Sad,
        Self::Surprise,
        Self::Neutral,
    ];

    /// Display name of the class
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Angry => "Angry",
            Self::Disgust => "Disgust",
            Self::Fear => "Fear",
            Self::Happy => "Happy",
            Self::Sad => "Sad",
            Self::Surprise => "Surprise",
            Self::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for EmotionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for EmotionClass {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|class| class.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidInput(format!("Unknown emotion class: {s}")))
    }
}

/// Ordered, non-empty, duplicate-free set of active emotion classes.
///
/// Declaration order is significant: it breaks arg-max ties and orders every
/// score vector and distribution produced for this set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<EmotionClass>", into = "Vec<EmotionClass>")]
pub struct ClassSet(Vec<EmotionClass>);

impl ClassSet {
    /// Create a class set, rejecting empty or duplicated input
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `classes` is empty or names a class twice
    pub fn new(classes: Vec<EmotionClass>) -> Result<Self> {
        if classes.is_empty() {
            return Err(Error::ConfigError("Active class set must not be empty".to_string()));
        }
        for (i, class) in classes.iter().enumerate() {
            if classes[..i].contains(class) {
                return Err(Error::ConfigError(format!(
                    "Class {class} appears more than once in the active class set"
                )));
            }
        }
        Ok(Self(classes))
    }

    /// All seven classes in canonical order
    #[must_use]
    pub fn all() -> Self {
        Self(EmotionClass::ALL.to_vec())
    }

    /// Built-in class lists that are known to be non-empty and unique
    pub(crate) fn from_ordered(classes: &[EmotionClass]) -> Self {
        Self(classes.to_vec())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a constructed set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn contains(&self, class: EmotionClass) -> bool {
        self.0.contains(&class)
    }

    /// Position of a class in declaration order
    #[must_use]
    pub fn index_of(&self, class: EmotionClass) -> Option<usize> {
        self.0.iter().position(|c| *c == class)
    }

    /// First-declared class
    #[must_use]
    pub fn first(&self) -> EmotionClass {
        self.0.first().copied().unwrap_or(EmotionClass::Neutral)
    }

    pub fn iter(&self) -> impl Iterator<Item = EmotionClass> + '_ {
        self.0.iter().copied()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[EmotionClass] {
        &self.0
    }
}

impl TryFrom<Vec<EmotionClass>> for ClassSet {
    type Error = Error;

    fn try_from(classes: Vec<EmotionClass>) -> Result<Self> {
        Self::new(classes)
    }
}

impl From<ClassSet> for Vec<EmotionClass> {
    fn from(set: ClassSet) -> Self {
        set.0
    }
}

/// Per-class scores in active-set order. Entries are never negative.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreVector {
    entries: Vec<(EmotionClass, f64)>,
}

impl ScoreVector {
    /// Every class of `classes` at the same starting score
    #[must_use]
    pub fn filled(classes: &ClassSet, value: f64) -> Self {
        Self {
            entries: classes.iter().map(|class| (class, value.max(0.0))).collect(),
        }
    }

    /// Build from explicit entries; negative scores are clamped to zero
    #[must_use]
    pub fn from_entries(entries: Vec<(EmotionClass, f64)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(class, score)| (class, score.max(0.0)))
                .collect(),
        }
    }

    #[must_use]
    pub fn get(&self, class: EmotionClass) -> Option<f64> {
        self.entries.iter().find(|(c, _)| *c == class).map(|(_, s)| *s)
    }

    /// Add a non-negative amount to one class; unknown classes are ignored
    pub(crate) fn add(&mut self, class: EmotionClass, amount: f64) {
        if let Some(entry) = self.entries.iter_mut().find(|(c, _)| *c == class) {
            entry.1 += amount.max(0.0);
        }
    }

    pub(crate) fn set(&mut self, class: EmotionClass, value: f64) {
        if let Some(entry) = self.entries.iter_mut().find(|(c, _)| *c == class) {
            entry.1 = value.max(0.0);
        }
    }

    /// Highest-scoring class; the first-declared class wins ties
    #[must_use]
    pub fn argmax(&self) -> Option<(EmotionClass, f64)> {
        let mut best: Option<(EmotionClass, f64)> = None;
        for &(class, score) in &self.entries {
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((class, score)),
            }
        }
        best
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, s)| s).sum()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EmotionClass, f64)> + '_ {
        self.entries.iter().copied()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[(EmotionClass, f64)] {
        &self.entries
    }
}

/// How a result was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultStatus {
    /// Distribution derived from a positive score total
    Classified,
    /// Score total was not positive; the distribution is uniform by recovery
    UniformFallback,
}

/// Label, confidence and full distribution for one face
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionResult {
    label: EmotionClass,
    confidence: f64,
    distribution: Vec<(EmotionClass, f64)>,
    status: ResultStatus,
}

impl EmotionResult {
    /// Derive a result from non-negative per-class weights.
    ///
    /// Weights are normalized to sum to one, the label is the first
    /// maximum. A non-positive or non-finite total produces a uniform
    /// fallback.
    #[must_use]
    pub fn from_weights(weights: &[(EmotionClass, f64)]) -> Self {
        let total: f64 = weights.iter().map(|(_, w)| w.max(0.0)).sum();
        if weights.is_empty() || !total.is_finite() || total <= 0.0 {
            return Self::uniform_fallback(&weights.iter().map(|(c, _)| *c).collect::<Vec<_>>());
        }

        let distribution: Vec<(EmotionClass, f64)> = weights
            .iter()
            .map(|&(class, w)| (class, w.max(0.0) / total))
            .collect();
        let (label, confidence) = ScoreVector::from_entries(distribution.clone())
            .argmax()
            .unwrap_or((EmotionClass::Neutral, 0.0));

        Self {
            label,
            confidence,
            distribution,
            status: ResultStatus::Classified,
        }
    }

    /// Uniform distribution labelled with the first class
    #[must_use]
    pub fn uniform_fallback(classes: &[EmotionClass]) -> Self {
        let label = classes.first().copied().unwrap_or(EmotionClass::Neutral);
        let n = classes.len().max(1) as f64;
        let share = 1.0 / n;
        Self {
            label,
            confidence: share,
            distribution: if classes.is_empty() {
                vec![(label, 1.0)]
            } else {
                classes.iter().map(|&c| (c, share)).collect()
            },
            status: ResultStatus::UniformFallback,
        }
    }

    #[must_use]
    pub fn label(&self) -> EmotionClass {
        self.label
    }

    #[must_use]
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    #[must_use]
    pub fn distribution(&self) -> &[(EmotionClass, f64)] {
        &self.distribution
    }

    /// Probability assigned to a class, if it is part of the distribution
    #[must_use]
    pub fn probability(&self, class: EmotionClass) -> Option<f64> {
        self.distribution.iter().find(|(c, _)| *c == class).map(|(_, p)| *p)
    }

    #[must_use]
    pub fn status(&self) -> ResultStatus {
        self.status
    }

    /// True when the result came from the uniform recovery path
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.status == ResultStatus::UniformFallback
    }
}

impl fmt::Display for EmotionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.1}%)", self.label, self.confidence * 100.0)?;
        if self.is_fallback() {
            f.write_str(" [fallback]")?;
        }
        Ok(())
    }
}
