//! Edge case tests for extreme faces, unusual configurations and ties


use face_emotion::{
    classifier::{EmotionClassifier, HeuristicClassifier},
    config::Config,
    damping::{DampedScores, DominanceDamper},
    emotion::{ClassSet, EmotionClass, ScoreVector},
    face_image::{FaceImage, FaceSize},
    features::{Descriptor, FeatureExtractor, GradientOperator},
    normalize::ConfidenceNormalizer,
    region::{facial_regions, partition, Fraction, RegionSpec},
    rules::{Condition, Metric, Rule, RuleTable},
};
use test_helpers::{assert_result_consistent, four_class_config, presets};

fn extreme_faces() -> Vec<FaceImage> {
    vec![
        FaceImage::uniform(48, 48, 0.0),
        FaceImage::uniform(48, 48, 255.0),
        FaceImage::from_fn(48, 48, |r, c| if (r + c) % 2 == 0 { 0.0 } else { 255.0 }),
        FaceImage::from_fn(48, 48, |r, _| if r < 24 { 0.0 } else { 255.0 }),
        FaceImage::from_fn(48, 48, |_, c| if c < 24 { 255.0 } else { 0.0 }),
        FaceImage::from_fn(48, 48, |r, c| ((r * 48 + c) % 256) as f64),
    ]
}

#[test]
fn test_extreme_faces_produce_valid_results() {
    for config in presets() {
        let classifier = HeuristicClassifier::new(&config).unwrap();
        for face in extreme_faces() {
            let result = classifier.classify(&face).unwrap();
            assert_result_consistent(&result);
            assert!(!result.is_fallback());
        }
    }
}

#[test]
fn test_non_finite_synthetic_faces_classify_as_clamped() {
    for config in presets() {
        let classifier = HeuristicClassifier::new(&config).unwrap();
        let nan = classifier.explain(&FaceImage::uniform(48, 48, f64::NAN)).unwrap();
        let black = classifier.explain(&FaceImage::uniform(48, 48, 0.0)).unwrap();
        assert_eq!(nan.fired, black.fired);
        assert_eq!(nan.result, black.result);
    }

    let global = HeuristicClassifier::new(&Config::global_intensity()).unwrap();
    let explanation = global.explain(&FaceImage::uniform(48, 48, f64::NAN)).unwrap();
    assert!(explanation.fired.iter().all(|rule| rule.id != "global.disgust"));
}

#[test]
fn test_single_class_config_is_always_certain() {
    let mut config = four_class_config();
    config.active_classes = ClassSet::new(vec![EmotionClass::Happy]).unwrap();
    config.rule_table.rules.retain(|r| r.class == EmotionClass::Happy);

    let classifier = HeuristicClassifier::new(&config).unwrap();
    for face in extreme_faces() {
        let explanation = classifier.explain(&face).unwrap();
        assert_eq!(explanation.damped.damped, None);
        assert_eq!(explanation.result.label(), EmotionClass::Happy);
        assert_eq!(explanation.result.confidence(), 1.0);
    }
}

#[test]
fn test_tie_goes_to_first_declared_class() {
    let config = Config {
        active_classes: ClassSet::new(vec![EmotionClass::Sad, EmotionClass::Happy]).unwrap(),
        rule_table: RuleTable::new(
            "tie",
            vec![
                Rule::new(
                    "happy.any",
                    EmotionClass::Happy,
                    7.0,
                    Condition::above(Metric::feature("face", Descriptor::Mean), -1.0),
                ),
                Rule::new(
                    "sad.any",
                    EmotionClass::Sad,
                    7.0,
                    Condition::above(Metric::feature("face", Descriptor::Mean), -1.0),
                ),
            ],
        ),
        ..four_class_config()
    };
    let classifier = HeuristicClassifier::new(&config).unwrap();
    let result = classifier.classify(&FaceImage::uniform(48, 48, 50.0)).unwrap();
    assert_eq!(result.label(), EmotionClass::Sad);
    assert_eq!(result.confidence(), 0.5);
}

#[test]
fn test_zero_scores_fall_back_to_uniform() {
    let classes = ClassSet::new(vec![EmotionClass::Angry, EmotionClass::Fear, EmotionClass::Neutral]).unwrap();
    let zeros = ScoreVector::filled(&classes, 0.0);
    let damped = DominanceDamper::default().apply(zeros);
    assert_eq!(damped.damped, None);

    let result = ConfidenceNormalizer::new().normalize(&damped);
    assert!(result.is_fallback());
    assert_eq!(result.label(), EmotionClass::Angry);
    assert!((result.confidence() - 1.0 / 3.0).abs() < 1e-12);
    assert!(result.to_string().contains("[fallback]"));
}

#[test]
fn test_non_finite_scores_fall_back() {
    let damped = DampedScores {
        scores: ScoreVector::from_entries(vec![(EmotionClass::Happy, f64::INFINITY), (EmotionClass::Sad, 1.0)]),
        damped: None,
    };
    assert!(ConfidenceNormalizer::new().normalize(&damped).is_fallback());
}

#[test]
fn test_non_square_face_size() {
    let mut config = four_class_config();
    config.face_size = FaceSize::new(64, 48);
    let classifier = HeuristicClassifier::new(&config).unwrap();

    let mouth = classifier.partition().get("mouth").unwrap().rect;
    assert_eq!((mouth.top, mouth.bottom, mouth.left, mouth.right), (32, 40, 16, 48));

    let face = FaceImage::from_fn(64, 48, |r, c| if r >= 32 && c % 2 == 1 { 190.0 } else { 120.0 });
    assert_result_consistent(&classifier.classify(&face).unwrap());
    assert!(classifier.classify(&FaceImage::uniform(48, 48, 1.0)).is_err());
}

#[test]
fn test_small_faces_reject_degenerate_regions() {
    // Forehead is 1/8 of the height: empty below 8 rows
    let result = partition(&facial_regions(), FaceSize::square(7));
    assert!(result.is_err());
    assert!(partition(&facial_regions(), FaceSize::square(24)).is_ok());
}

#[test]
fn test_overlapping_regions_are_allowed() {
    let half: Fraction = "1/2".parse().unwrap();
    let specs = vec![
        RegionSpec::band("face", Fraction::ZERO, Fraction::ONE),
        RegionSpec::band("top", Fraction::ZERO, half),
        RegionSpec::band("also_top", Fraction::ZERO, half),
    ];
    let partition = partition(&specs, FaceSize::square(10)).unwrap();
    assert_eq!(partition.len(), 3);
    assert_eq!(partition.get("top").unwrap().rect, partition.get("also_top").unwrap().rect);
}

#[test]
fn test_tiny_regions_have_zero_gradients() {
    let face = FaceImage::from_fn(48, 48, |r, c| (r * 3 + c * 2) as f64);
    let specs = vec![RegionSpec::new(
        "sliver",
        Fraction::ZERO,
        "1/48".parse().unwrap(),
        Fraction::ZERO,
        Fraction::ONE,
    )];
    let partition = partition(&specs, FaceSize::square(48)).unwrap();

    for operator in [GradientOperator::FiniteDifference, GradientOperator::Sobel] {
        let features = FeatureExtractor::new(operator).extract(&face, &partition).unwrap();
        let sliver = features.region("sliver").unwrap();
        // One row: no vertical neighbours
        assert_eq!(sliver.grad_y, 0.0);
    }
}
