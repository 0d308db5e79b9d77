//! Rule tables: weighted boolean predicates over region features.
//!
//! A rule adds its weight to one emotion class when its condition holds.
//! Conditions compare a metric (an arithmetic expression over features)
//! against a threshold and may be combined with `all`, `any` and `none_of`.
//! Tiered rules ("strong" and "mild" versions of one cue) are written as
//! mutually exclusive bands, so every rule is evaluated independently and
//! the order of rules never changes a score.

/// Built-in reference rule tables
pub mod tables;

use crate::{
    emotion::{ClassSet, EmotionClass},
    features::{Descriptor, FeatureKey, FeatureVector},
    region::Partition,
    Error, Result,
};
use serde::{Deserialize, Serialize};

/// Arithmetic expression over features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// A single feature value
    Feature(FeatureKey),
    /// A fixed value
    Constant(f64),
    /// `a - b`
    Diff(Box<Metric>, Box<Metric>),
    /// `|a - b|`
    AbsDiff(Box<Metric>, Box<Metric>),
    /// `a / b`; a zero denominator yields an infinite or NaN ratio
    Ratio(Box<Metric>, Box<Metric>),
    /// Arithmetic mean of the operands
    Mean(Vec<Metric>),
    /// Largest operand
    Max(Vec<Metric>),
}

impl Metric {
    #[must_use]
    pub fn feature(region: &str, descriptor: Descriptor) -> Self {
        Self::Feature(FeatureKey::new(region, descriptor))
    }

    #[must_use]
    pub fn diff(a: Self, b: Self) -> Self {
        Self::Diff(Box::new(a), Box::new(b))
    }

    #[must_use]
    pub fn abs_diff(a: Self, b: Self) -> Self {
        Self::AbsDiff(Box::new(a), Box::new(b))
    }

    #[must_use]
    pub fn ratio(a: Self, b: Self) -> Self {
        Self::Ratio(Box::new(a), Box::new(b))
    }

    /// Evaluate against a feature vector
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if a referenced feature is missing
    pub fn evaluate(&self, features: &FeatureVector) -> Result<f64> {
        Ok(match self {
            Self::Feature(key) => features
                .get(key)
                .ok_or_else(|| Error::InvalidInput(format!("Feature {key} was not extracted")))?,
            Self::Constant(value) => *value,
            Self::Diff(a, b) => a.evaluate(features)? - b.evaluate(features)?,
            Self::AbsDiff(a, b) => (a.evaluate(features)? - b.evaluate(features)?).abs(),
            Self::Ratio(a, b) => a.evaluate(features)? / b.evaluate(features)?,
            Self::Mean(items) => {
                let mut sum = 0.0;
                for item in items {
                    sum += item.evaluate(features)?;
                }
                sum / items.len() as f64
            }
            Self::Max(items) => {
                let mut max = f64::NEG_INFINITY;
                for item in items {
                    max = max.max(item.evaluate(features)?);
                }
                max
            }
        })
    }

    /// Every feature this metric reads
    #[must_use]
    pub fn features(&self) -> Vec<&FeatureKey> {
        let mut keys = Vec::new();
        self.collect_features(&mut keys);
        keys
    }

    fn collect_features<'a>(&'a self, keys: &mut Vec<&'a FeatureKey>) {
        match self {
            Self::Feature(key) => keys.push(key),
            Self::Constant(_) => {}
            Self::Diff(a, b) | Self::AbsDiff(a, b) | Self::Ratio(a, b) => {
                a.collect_features(keys);
                b.collect_features(keys);
            }
            Self::Mean(items) | Self::Max(items) => {
                for item in items {
                    item.collect_features(keys);
                }
            }
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            Self::Feature(_) => Ok(()),
            Self::Constant(value) if value.is_finite() => Ok(()),
            Self::Constant(value) => Err(Error::ConfigError(format!("Constant {value} is not finite"))),
            Self::Diff(a, b) | Self::AbsDiff(a, b) | Self::Ratio(a, b) => {
                a.validate()?;
                b.validate()
            }
            Self::Mean(items) | Self::Max(items) => {
                if items.is_empty() {
                    return Err(Error::ConfigError("mean/max needs at least one operand".to_string()));
                }
                items.iter().try_for_each(Self::validate)
            }
        }
    }
}

/// Boolean test over metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// `metric > threshold`
    Above { metric: Metric, threshold: f64 },
    /// `metric < threshold`
    Below { metric: Metric, threshold: f64 },
    All(Vec<Condition>),
    Any(Vec<Condition>),
    /// Holds when no operand holds
    NoneOf(Vec<Condition>),
}

impl Condition {
    #[must_use]
    pub fn above(metric: Metric, threshold: f64) -> Self {
        Self::Above { metric, threshold }
    }

    #[must_use]
    pub fn below(metric: Metric, threshold: f64) -> Self {
        Self::Below { metric, threshold }
    }

    /// `low < metric <= high`: the mild tier beneath a `metric > high` rule
    #[must_use]
    pub fn above_band(metric: Metric, low: f64, high: f64) -> Self {
        Self::All(vec![
            Self::above(metric.clone(), low),
            Self::NoneOf(vec![Self::above(metric, high)]),
        ])
    }

    /// `low <= metric < high`: the mild tier beneath a `metric < low` rule
    #[must_use]
    pub fn below_band(metric: Metric, high: f64, low: f64) -> Self {
        Self::All(vec![
            Self::below(metric.clone(), high),
            Self::NoneOf(vec![Self::below(metric, low)]),
        ])
    }

    #[must_use]
    pub fn negate(self) -> Self {
        Self::NoneOf(vec![self])
    }

    /// Whether the condition holds. NaN metrics fail every comparison.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if a referenced feature is missing
    pub fn holds(&self, features: &FeatureVector) -> Result<bool> {
        Ok(match self {
            Self::Above { metric, threshold } => metric.evaluate(features)? > *threshold,
            Self::Below { metric, threshold } => metric.evaluate(features)? < *threshold,
            Self::All(items) => {
                for item in items {
                    if !item.holds(features)? {
                        return Ok(false);
                    }
                }
                true
            }
            Self::Any(items) => {
                for item in items {
                    if item.holds(features)? {
                        return Ok(true);
                    }
                }
                false
            }
            Self::NoneOf(items) => {
                for item in items {
                    if item.holds(features)? {
                        return Ok(false);
                    }
                }
                true
            }
        })
    }

    /// Every feature this condition reads
    #[must_use]
    pub fn features(&self) -> Vec<&FeatureKey> {
        match self {
            Self::Above { metric, .. } | Self::Below { metric, .. } => metric.features(),
            Self::All(items) | Self::Any(items) | Self::NoneOf(items) => {
                items.iter().flat_map(|c| c.features()).collect()
            }
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            Self::Above { metric, threshold } | Self::Below { metric, threshold } => {
                if !threshold.is_finite() {
                    return Err(Error::ConfigError(format!("Threshold {threshold} is not finite")));
                }
                metric.validate()
            }
            Self::All(items) | Self::Any(items) | Self::NoneOf(items) => {
                if items.is_empty() {
                    return Err(Error::ConfigError(
                        "all/any/none_of needs at least one condition".to_string(),
                    ));
                }
                items.iter().try_for_each(Self::validate)
            }
        }
    }
}

/// One `(predicate, class, weight)` entry of a rule table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Stable identifier, e.g. `happy.smile_strong`
    pub id: String,
    pub class: EmotionClass,
    pub weight: f64,
    pub when: Condition,
}

impl Rule {
    #[must_use]
    pub fn new(id: &str, class: EmotionClass, weight: f64, when: Condition) -> Self {
        Self {
            id: id.to_string(),
            class,
            weight,
            when,
        }
    }
}

/// Named, ordered list of rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleTable {
    pub name: String,
    pub rules: Vec<Rule>,
}

impl RuleTable {
    #[must_use]
    pub fn new(name: &str, rules: Vec<Rule>) -> Self {
        Self {
            name: name.to_string(),
            rules,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    /// Check the table against the active classes and resolved regions
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for duplicate ids, negative or non-finite
    /// weights, malformed conditions, rules for inactive classes, and
    /// features of unknown regions
    pub fn validate(&self, classes: &ClassSet, partition: &Partition) -> Result<()> {
        for (i, rule) in self.rules.iter().enumerate() {
            if self.rules[..i].iter().any(|r| r.id == rule.id) {
                return Err(Error::ConfigError(format!("Duplicate rule id '{}'", rule.id)));
            }
            if !rule.weight.is_finite() || rule.weight < 0.0 {
                return Err(Error::ConfigError(format!(
                    "Rule '{}' has weight {}; weights must be finite and non-negative",
                    rule.id, rule.weight
                )));
            }
            if !classes.contains(rule.class) {
                return Err(Error::ConfigError(format!(
                    "Rule '{}' targets {} which is not an active class",
                    rule.id, rule.class
                )));
            }
            rule.when
                .validate()
                .map_err(|e| Error::ConfigError(format!("Rule '{}': {e}", rule.id)))?;
            if let Some(key) = rule.when.features().into_iter().find(|k| !partition.contains(&k.region)) {
                return Err(Error::ConfigError(format!(
                    "Rule '{}' reads {key} but region '{}' is not configured",
                    rule.id, key.region
                )));
            }
        }
        Ok(())
    }
}
