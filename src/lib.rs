//! Region-based heuristic emotion classification for cropped face images.
//!
//! This library scores a grayscale face crop against hand-tuned rules over
//! simple per-region statistics. No learned model is involved, so every
//! result can be traced back to the rules that produced it.
//!
//! The classification pipeline consists of:
//! 1. Partitioning the face into named fractional regions
//! 2. Extracting mean, standard deviation and mean gradients per region
//! 3. Scoring each emotion class with a weighted rule table over a floor
//! 4. Damping a single runaway score
//! 5. Normalizing the scores into a label, confidence and distribution
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```
//! use face_emotion::{
//!     classifier::{EmotionClassifier, HeuristicClassifier},
//!     config::Config,
//!     emotion::EmotionClass,
//!     face_image::FaceImage,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let classifier = HeuristicClassifier::new(&Config::regional())?;
//!
//! // An evenly lit face carries only neutral evidence
//! let face = FaceImage::uniform(48, 48, 128.0);
//! let result = classifier.classify(&face)?;
//!
//! assert_eq!(result.label(), EmotionClass::Neutral);
//! let total: f64 = result.distribution().iter().map(|(_, p)| p).sum();
//! assert!((total - 1.0).abs() < 1e-6);
//! # Ok(())
//! # }
//! ```
//!
//! ## Explaining a Result
//!
//! ```
//! use face_emotion::{classifier::HeuristicClassifier, config::Config, face_image::FaceImage};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let classifier = HeuristicClassifier::new(&Config::halves())?;
//! let face = FaceImage::from_fn(48, 48, |row, _| if row < 24 { 100.0 } else { 140.0 });
//!
//! let explanation = classifier.explain(&face)?;
//! for rule in &explanation.fired {
//!     println!("{} +{} {}", rule.id, rule.weight, rule.class);
//! }
//! println!("{}", explanation.result);
//! # Ok(())
//! # }
//! ```
//!
//! ## Smoothing a Stream
//!
//! ```no_run
//! use face_emotion::{
//!     classifier::{EmotionClassifier, HeuristicClassifier},
//!     config::Config,
//!     smoothing::create_filter,
//!     stats::EmotionTally,
//!     utils::face_crop::load_face,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::regional();
//! let classifier = HeuristicClassifier::new(&config)?;
//! let mut filter = create_filter("exponential:0.3")?;
//! let mut tally = EmotionTally::default();
//!
//! for path in ["frame_000.png", "frame_001.png", "frame_002.png"] {
//!     let face = load_face(path, config.face_size)?;
//!     let smoothed = filter.apply(&classifier.classify(&face)?);
//!     tally.record(&smoothed);
//! }
//! println!("Dominant emotion: {:?}", tally.dominant());
//! # Ok(())
//! # }
//! ```

/// Constants used throughout the library
pub mod constants;

/// Error types and result handling
pub mod error;

/// Emotion classes, score vectors and results
pub mod emotion;

/// Grayscale face crops
pub mod face_image;

/// Fractional face regions
pub mod region;

/// Per-region statistical descriptors
pub mod features;

/// Weighted rules over region features
pub mod rules;

/// Rule scoring with class floors
pub mod scoring;

/// Dominance damping of a runaway score
pub mod damping;

/// Conversion of scores into a distribution
pub mod normalize;

/// Classifier trait and the heuristic pipeline
pub mod classifier;

/// Configuration management
pub mod config;

/// Temporal smoothing of results across frames
pub mod smoothing;

/// Running emotion statistics
pub mod stats;

/// Bounded worker pool for live video
pub mod dispatch;

/// Detector box and face crop utilities
pub mod utils;

pub use error::{Error, Result};
