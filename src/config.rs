//! Configuration management for the emotion classifier

use crate::{
    constants::{
        DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_DISPATCH_WORKERS, DEFAULT_DOMINANCE_FACTOR,
        DEFAULT_DOMINANCE_RATIO, DEFAULT_QUEUE_CAPACITY, ENHANCED_CLASS_FLOOR, GLOBAL_CLASS_FLOOR,
        HALVES_CLASS_FLOOR, REGIONAL_CLASS_FLOOR,
    },
    damping::DominanceDamper,
    emotion::ClassSet,
    face_image::FaceSize,
    features::GradientOperator,
    region::{facial_regions, partition, RegionSpec},
    rules::{tables, RuleTable},
    scoring::FloorPolicy,
    smoothing::DistributionFilter,
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Classifier configuration.
///
/// The region set and rule table are versioned together: any change to
/// either one should come with a new `version`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Identifier of this region set and rule table
    pub version: String,

    /// Face crop size the classifier accepts
    pub face_size: FaceSize,

    /// Ordered active emotion classes
    pub active_classes: ClassSet,

    /// Gradient operator used by the feature extractor
    pub gradient: GradientOperator,

    /// Named fractional regions
    pub regions: Vec<RegionSpec>,

    /// Weighted rules over region features
    pub rule_table: RuleTable,

    /// Class floor configuration
    pub scoring: ScoringConfig,

    /// Dominance damping configuration
    pub dominance: DominanceConfig,

    /// Temporal smoothing configuration
    pub smoothing: SmoothingConfig,

    /// Emotion statistics configuration
    pub tally: TallyConfig,

    /// Frame dispatcher configuration
    pub dispatch: DispatchConfig,
}

/// Class floor parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Positive score every class is guaranteed
    pub class_floor: f64,

    /// How the floor combines with fired rule weights
    pub floor_policy: FloorPolicy,
}

/// Dominance damping parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DominanceConfig {
    /// The top score must exceed every other score times this ratio
    pub ratio: f64,

    /// Multiplier for a dominant score; 1.0 disables damping
    pub factor: f64,
}

/// Temporal smoothing parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Filter name with optional parameter, e.g. `exponential:0.5`
    pub filter: String,
}

/// Emotion statistics parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TallyConfig {
    /// Minimum confidence for a label to be counted (0.0-1.0)
    pub confidence_threshold: f64,
}

/// Frame dispatcher parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Number of worker threads
    pub workers: usize,

    /// Pending frames held before new frames are dropped
    pub queue_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self::regional()
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            class_floor: REGIONAL_CLASS_FLOOR,
            floor_policy: FloorPolicy::Baseline,
        }
    }
}

impl Default for DominanceConfig {
    fn default() -> Self {
        Self {
            ratio: DEFAULT_DOMINANCE_RATIO,
            factor: DEFAULT_DOMINANCE_FACTOR,
        }
    }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            filter: "none".to_string(),
        }
    }
}

impl Default for TallyConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_DISPATCH_WORKERS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl Config {
    /// Region-based rules with Sobel gradients over the facial region set
    #[must_use]
    pub fn regional() -> Self {
        Self {
            version: "regional-1".to_string(),
            face_size: FaceSize::default(),
            active_classes: ClassSet::from_ordered(&tables::REGIONAL_CLASSES),
            gradient: GradientOperator::Sobel,
            regions: facial_regions(),
            rule_table: tables::regional(),
            scoring: ScoringConfig::default(),
            dominance: DominanceConfig::default(),
            smoothing: SmoothingConfig::default(),
            tally: TallyConfig::default(),
            dispatch: DispatchConfig::default(),
        }
    }

    /// Upper/lower halves rules; the floor is a lower bound, damping is off
    #[must_use]
    pub fn halves() -> Self {
        Self {
            version: "halves-1".to_string(),
            active_classes: ClassSet::from_ordered(&tables::HALVES_CLASSES),
            gradient: GradientOperator::FiniteDifference,
            rule_table: tables::halves(),
            scoring: ScoringConfig {
                class_floor: HALVES_CLASS_FLOOR,
                floor_policy: FloorPolicy::Minimum,
            },
            dominance: DominanceConfig {
                ratio: DEFAULT_DOMINANCE_RATIO,
                factor: 1.0,
            },
            ..Self::regional()
        }
    }

    /// Seven-class decision list over whole-face mean and spread
    #[must_use]
    pub fn global_intensity() -> Self {
        Self {
            version: "global-1".to_string(),
            active_classes: ClassSet::from_ordered(&tables::GLOBAL_CLASSES),
            gradient: GradientOperator::FiniteDifference,
            rule_table: tables::global_intensity(),
            scoring: ScoringConfig {
                class_floor: GLOBAL_CLASS_FLOOR,
                floor_policy: FloorPolicy::Baseline,
            },
            dominance: DominanceConfig {
                ratio: DEFAULT_DOMINANCE_RATIO,
                factor: 1.0,
            },
            ..Self::regional()
        }
    }

    /// Seven-class decision list over face halves and whole-face gradients
    #[must_use]
    pub fn enhanced() -> Self {
        Self {
            version: "enhanced-1".to_string(),
            active_classes: ClassSet::from_ordered(&tables::ENHANCED_CLASSES),
            gradient: GradientOperator::FiniteDifference,
            rule_table: tables::enhanced(),
            scoring: ScoringConfig {
                class_floor: ENHANCED_CLASS_FLOOR,
                floor_policy: FloorPolicy::Baseline,
            },
            dominance: DominanceConfig {
                ratio: DEFAULT_DOMINANCE_RATIO,
                factor: 1.0,
            },
            ..Self::regional()
        }
    }

    /// Look up a built-in preset by name
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for unknown preset names
    pub fn preset(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "regional" => Ok(Self::regional()),
            "halves" => Ok(Self::halves()),
            "global" | "global_intensity" => Ok(Self::global_intensity()),
            "enhanced" => Ok(Self::enhanced()),
            _ => Err(Error::ConfigError(format!(
                "Unknown preset '{name}' (expected regional, halves, global or enhanced)"
            ))),
        }
    }

    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read and `ConfigError` if it does
    /// not parse
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        serde_yaml::from_str(&content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Load `path` when given, otherwise the named preset.
    ///
    /// A config file that cannot be read or parsed is an error; it never
    /// falls back to the preset.
    ///
    /// # Errors
    ///
    /// Returns `Io` or `ConfigError` from [`Config::from_file`], or
    /// `ConfigError` for an unknown preset name
    pub fn load(path: Option<&Path>, preset: &str) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::preset(preset),
        }
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if serialization fails and `Io` if the file
    /// cannot be written
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Create the configured smoothing filter
    ///
    /// # Errors
    ///
    /// Returns `FilterError` if the filter name or parameter is invalid
    pub fn create_filter(&self) -> Result<Box<dyn DistributionFilter>> {
        crate::smoothing::create_filter(&self.smoothing.filter)
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` describing the first problem found
    pub fn validate(&self) -> Result<()> {
        if self.version.trim().is_empty() {
            return Err(Error::ConfigError("Config version must not be empty".to_string()));
        }

        // Regions and rules
        let partition = partition(&self.regions, self.face_size)?;
        if self.rule_table.is_empty() {
            return Err(Error::ConfigError(format!(
                "Rule table '{}' has no rules",
                self.rule_table.name
            )));
        }
        self.rule_table.validate(&self.active_classes, &partition)?;

        // Scoring and damping
        if !self.scoring.class_floor.is_finite() || self.scoring.class_floor <= 0.0 {
            return Err(Error::ConfigError(format!(
                "Class floor must be positive, got {}",
                self.scoring.class_floor
            )));
        }
        DominanceDamper::new(self.dominance.ratio, self.dominance.factor)?;

        // Stream helpers
        self.create_filter()
            .map_err(|e| Error::ConfigError(format!("Invalid smoothing filter: {e}")))?;
        if !(0.0..=1.0).contains(&self.tally.confidence_threshold) {
            return Err(Error::ConfigError(
                "Tally confidence threshold must be between 0.0 and 1.0".to_string(),
            ));
        }
        if self.dispatch.workers == 0 {
            return Err(Error::ConfigError("Dispatch worker count must be greater than 0".to_string()));
        }
        if self.dispatch.queue_capacity == 0 {
            return Err(Error::ConfigError("Dispatch queue capacity must be greater than 0".to_string()));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Face Emotion Configuration
version: "example-1"

# Face crop size handed in by the detector
face_size:
  width: 48
  height: 48

# Active classes; the order breaks ties
active_classes: [Happy, Sad, Angry, Neutral]

# finite_difference or sobel
gradient: finite_difference

# Fractional regions (top, bottom, left, right)
regions:
  - { name: face, top: "0", bottom: "1", left: "0", right: "1" }
  - { name: upper_half, top: "0", bottom: "1/2", left: "0", right: "1" }
  - { name: lower_half, top: "1/2", bottom: "1", left: "0", right: "1" }
  - { name: mouth, top: "2/3", bottom: "5/6", left: "1/4", right: "3/4" }

# Rules add their weight to a class when the condition holds
rule_table:
  name: example
  rules:
    - id: happy.bright_lower_half
      class: Happy
      weight: 30.0
      when: !above
        metric: !diff [!feature lower_half.mean, !feature upper_half.mean]
        threshold: 2.0
    - id: happy.mouth_texture
      class: Happy
      weight: 25.0
      when: !above
        metric: !feature mouth.stddev
        threshold: 30.0
    - id: sad.dark_lower_half
      class: Sad
      weight: 25.0
      when: !below
        metric: !diff [!feature lower_half.mean, !feature upper_half.mean]
        threshold: -2.0
    - id: angry.high_contrast
      class: Angry
      weight: 20.0
      when: !above
        metric: !max [!feature face.grad_x, !feature face.grad_y]
        threshold: 12.0
    - id: neutral.low_variation
      class: Neutral
      weight: 25.0
      when: !below
        metric: !feature face.stddev
        threshold: 30.0

# Class floor
scoring:
  class_floor: 10.0
  floor_policy: baseline

# Dominance damping
dominance:
  ratio: 2.0
  factor: 0.9

# Temporal smoothing (none, exponential:<alpha>, moving_average:<window>)
smoothing:
  filter: "exponential:0.5"

# Emotion statistics
tally:
  confidence_threshold: 0.5

# Frame dispatcher
dispatch:
  workers: 2
  queue_capacity: 4
"#;
