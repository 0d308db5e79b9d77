//! Rule scoring: turn a feature vector into raw per-class scores.

use crate::{
    emotion::{ClassSet, EmotionClass, ScoreVector},
    features::FeatureVector,
    rules::RuleTable,
    Error, Result,
};
use log::debug;
use serde::{Deserialize, Serialize};

/// How the class floor combines with fired rule weights
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloorPolicy {
    /// Every class starts at the floor and fired weights add on top
    #[default]
    Baseline,
    /// Classes start at zero; the floor is a lower bound on the final score
    Minimum,
}

/// A rule whose condition held for the scored face
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiredRule {
    pub id: String,
    pub class: EmotionClass,
    pub weight: f64,
}

/// Raw scores plus the rules that produced them
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreReport {
    pub scores: ScoreVector,
    pub fired: Vec<FiredRule>,
}

/// Applies a rule table to feature vectors
#[derive(Debug, Clone)]
pub struct RuleScoringEngine {
    table: RuleTable,
    classes: ClassSet,
    floor: f64,
    policy: FloorPolicy,
}

impl RuleScoringEngine {
    /// Create an engine for an already validated table
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `floor` is not a positive finite number
    pub fn new(table: RuleTable, classes: ClassSet, floor: f64, policy: FloorPolicy) -> Result<Self> {
        if !floor.is_finite() || floor <= 0.0 {
            return Err(Error::ConfigError(format!(
                "Class floor must be positive, got {floor}"
            )));
        }
        Ok(Self {
            table,
            classes,
            floor,
            policy,
        })
    }

    #[must_use]
    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    #[must_use]
    pub fn classes(&self) -> &ClassSet {
        &self.classes
    }

    #[must_use]
    pub fn floor(&self) -> f64 {
        self.floor
    }

    #[must_use]
    pub fn policy(&self) -> FloorPolicy {
        self.policy
    }

    /// Score one feature vector. Every class ends at or above the floor.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if a rule reads a feature the vector lacks
    pub fn score(&self, features: &FeatureVector) -> Result<ScoreReport> {
        let start = match self.policy {
            FloorPolicy::Baseline => self.floor,
            FloorPolicy::Minimum => 0.0,
        };
        let mut scores = ScoreVector::filled(&self.classes, start);
        let mut fired = Vec::new();

        for rule in &self.table.rules {
            if rule.when.holds(features)? {
                debug!("Rule {} fired: +{} {}", rule.id, rule.weight, rule.class);
                scores.add(rule.class, rule.weight);
                fired.push(FiredRule {
                    id: rule.id.clone(),
                    class: rule.class,
                    weight: rule.weight,
                });
            }
        }

        if self.policy == FloorPolicy::Minimum {
            for class in self.classes.iter() {
                let score = scores.get(class).unwrap_or(0.0);
                scores.set(class, score.max(self.floor));
            }
        }

        Ok(ScoreReport { scores, fired })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::face_image::FaceImage;
    use crate::features::{Descriptor, FeatureExtractor};
    use crate::region::{facial_regions, partition};
    use crate::rules::{Condition, Metric, Rule};
    use EmotionClass::{Happy, Neutral, Sad};

    fn features_of(face: &FaceImage) -> FeatureVector {
        let partition = partition(&facial_regions(), face.size()).unwrap();
        FeatureExtractor::default().extract(face, &partition).unwrap()
    }

    fn table() -> RuleTable {
        let std = || Metric::feature("face", Descriptor::StdDev);
        RuleTable::new(
            "test",
            vec![
                Rule::new("happy.texture", Happy, 20.0, Condition::above(std(), 30.0)),
                Rule::new("sad.texture", Sad, 10.0, Condition::above(std(), 30.0)),
                Rule::new("neutral.flat", Neutral, 25.0, Condition::below(std(), 5.0)),
            ],
        )
    }

    fn classes() -> ClassSet {
        ClassSet::new(vec![Happy, Sad, Neutral]).unwrap()
    }

    #[test]
    fn test_baseline_policy_adds_weights_to_floor() {
        let engine = RuleScoringEngine::new(table(), classes(), 15.0, FloorPolicy::Baseline).unwrap();
        let face = FaceImage::from_fn(48, 48, |_, c| if c % 2 == 0 { 60.0 } else { 160.0 });
        let report = engine.score(&features_of(&face)).unwrap();

        assert_eq!(report.scores.get(Happy), Some(35.0));
        assert_eq!(report.scores.get(Sad), Some(25.0));
        assert_eq!(report.scores.get(Neutral), Some(15.0));
        let ids: Vec<_> = report.fired.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["happy.texture", "sad.texture"]);
    }

    #[test]
    fn test_minimum_policy_raises_to_floor() {
        let engine = RuleScoringEngine::new(table(), classes(), 15.0, FloorPolicy::Minimum).unwrap();
        let face = FaceImage::from_fn(48, 48, |_, c| if c % 2 == 0 { 60.0 } else { 160.0 });
        let report = engine.score(&features_of(&face)).unwrap();

        assert_eq!(report.scores.get(Happy), Some(20.0));
        assert_eq!(report.scores.get(Sad), Some(15.0));
        assert_eq!(report.scores.get(Neutral), Some(15.0));
    }

    #[test]
    fn test_no_rule_fires_leaves_floors() {
        let engine = RuleScoringEngine::new(table(), classes(), 10.0, FloorPolicy::Baseline).unwrap();
        let face = FaceImage::from_fn(48, 48, |_, c| if c % 2 == 0 { 100.0 } else { 120.0 });
        let report = engine.score(&features_of(&face)).unwrap();

        assert!(report.fired.is_empty());
        assert!(report.scores.iter().all(|(_, s)| s == 10.0));
    }

    #[test]
    fn test_rejects_non_positive_floor() {
        for floor in [0.0, -1.0, f64::NAN] {
            assert!(matches!(
                RuleScoringEngine::new(table(), classes(), floor, FloorPolicy::Baseline),
                Err(Error::ConfigError(_))
            ));
        }
    }
}
