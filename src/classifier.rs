//! Emotion classifiers.
//!
//! [`HeuristicClassifier`] wires the region-based pipeline:
//! partition, extract, score, damp, normalize. Other classifiers can stand
//! in behind [`EmotionClassifier`]; the choice is made once, at construction.

use crate::{
    config::Config,
    damping::{DampedScores, DominanceDamper},
    emotion::{ClassSet, EmotionResult, ScoreVector},
    face_image::{FaceImage, FaceSize},
    features::{FeatureExtractor, FeatureVector},
    normalize::ConfidenceNormalizer,
    region::{partition, Partition},
    scoring::{FiredRule, RuleScoringEngine},
    Result,
};
use log::{debug, info};

/// Trait for all emotion classifiers
pub trait EmotionClassifier: Send + Sync {
    /// Classify one face crop
    ///
    /// # Errors
    ///
    /// Returns a per-frame error (`InputShape` or `InvalidInput`) for faces
    /// the classifier cannot score
    fn classify(&self, face: &FaceImage) -> Result<EmotionResult>;

    /// Active classes, in the order results report them
    fn classes(&self) -> &ClassSet;

    /// Get classifier name
    fn name(&self) -> &str;
}

/// Every intermediate value of one classification
#[derive(Debug, Clone)]
pub struct Explanation {
    pub features: FeatureVector,
    pub fired: Vec<FiredRule>,
    pub raw_scores: ScoreVector,
    pub damped: DampedScores,
    pub result: EmotionResult,
}

/// Region-based heuristic classifier. Immutable after construction and
/// safe to share across threads.
#[derive(Debug, Clone)]
pub struct HeuristicClassifier {
    version: String,
    partition: Partition,
    extractor: FeatureExtractor,
    engine: RuleScoringEngine,
    damper: DominanceDamper,
    normalizer: ConfidenceNormalizer,
}

impl HeuristicClassifier {
    /// Build a classifier from a configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration does not validate
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        let partition = partition(&config.regions, config.face_size)?;
        let engine = RuleScoringEngine::new(
            config.rule_table.clone(),
            config.active_classes.clone(),
            config.scoring.class_floor,
            config.scoring.floor_policy,
        )?;
        let damper = DominanceDamper::new(config.dominance.ratio, config.dominance.factor)?;

        info!(
            "Heuristic classifier '{}': {} regions, {} rules, {} classes, {} face",
            config.version,
            partition.len(),
            config.rule_table.len(),
            config.active_classes.len(),
            config.face_size
        );

        Ok(Self {
            version: config.version.clone(),
            partition,
            extractor: FeatureExtractor::new(config.gradient),
            engine,
            damper,
            normalizer: ConfidenceNormalizer::new(),
        })
    }

    /// Configuration version this classifier was built from
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Face size this classifier accepts
    #[must_use]
    pub fn face_size(&self) -> FaceSize {
        self.partition.size()
    }

    #[must_use]
    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    /// Classify and keep every intermediate value
    ///
    /// # Errors
    ///
    /// Returns `InputShape` if the face does not match the configured size
    pub fn explain(&self, face: &FaceImage) -> Result<Explanation> {
        let features = self.extractor.extract(face, &self.partition)?;
        let report = self.engine.score(&features)?;
        let damped = self.damper.apply(report.scores.clone());
        let result = self.normalizer.normalize(&damped);

        Ok(Explanation {
            features,
            fired: report.fired,
            raw_scores: report.scores,
            damped,
            result,
        })
    }
}

impl EmotionClassifier for HeuristicClassifier {
    fn classify(&self, face: &FaceImage) -> Result<EmotionResult> {
        let features = self.extractor.extract(face, &self.partition)?;
        let report = self.engine.score(&features)?;
        let damped = self.damper.apply(report.scores);
        let result = self.normalizer.normalize(&damped);
        debug!("Classified face as {result}");
        Ok(result)
    }

    fn classes(&self) -> &ClassSet {
        self.engine.classes()
    }

    fn name(&self) -> &str {
        "HeuristicClassifier"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DISTRIBUTION_TOLERANCE;
    use crate::emotion::EmotionClass;
    use crate::Error;

    #[test]
    fn test_uniform_face_regional_is_neutral() {
        let classifier = HeuristicClassifier::new(&Config::regional()).unwrap();
        let explanation = classifier.explain(&FaceImage::uniform(48, 48, 128.0)).unwrap();

        // Floor 15 plus 110 from five neutral cues
        assert_eq!(explanation.raw_scores.get(EmotionClass::Neutral), Some(125.0));
        assert_eq!(explanation.damped.damped, Some(EmotionClass::Neutral));
        assert_eq!(explanation.result.label(), EmotionClass::Neutral);

        let total: f64 = explanation.result.distribution().iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < DISTRIBUTION_TOLERANCE);
    }

    #[test]
    fn test_classify_matches_explain() {
        let classifier = HeuristicClassifier::new(&Config::halves()).unwrap();
        let face = FaceImage::from_fn(48, 48, |r, c| ((r * 7 + c * 3) % 256) as f64);
        let explained = classifier.explain(&face).unwrap().result;
        assert_eq!(classifier.classify(&face).unwrap(), explained);
    }

    #[test]
    fn test_wrong_shape_is_rejected() {
        let classifier = HeuristicClassifier::new(&Config::regional()).unwrap();
        let err = classifier.classify(&FaceImage::uniform(64, 48, 128.0)).unwrap_err();
        assert!(matches!(
            err,
            Error::InputShape {
                expected_width: 48,
                width: 64,
                ..
            }
        ));
        assert!(err.is_per_frame());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = Config::regional();
        config.active_classes = ClassSet::new(vec![EmotionClass::Happy]).unwrap();
        assert!(matches!(HeuristicClassifier::new(&config), Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_classifier_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HeuristicClassifier>();
    }
}
