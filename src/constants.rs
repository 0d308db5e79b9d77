//! Constants used throughout the library

/// Side length of the face crop handed in by the detector
pub const DEFAULT_FACE_SIZE: usize = 48;

/// Allowed deviation of a distribution's sum from 1.0
pub const DISTRIBUTION_TOLERANCE: f64 = 1e-6;

/// A leading score must exceed every other score by this ratio to be damped
pub const DEFAULT_DOMINANCE_RATIO: f64 = 2.0;

/// Multiplier applied once to a dominant score
pub const DEFAULT_DOMINANCE_FACTOR: f64 = 0.9;

/// Class floors of the reference rule tables
pub const REGIONAL_CLASS_FLOOR: f64 = 15.0;
pub const HALVES_CLASS_FLOOR: f64 = 10.0;
pub const GLOBAL_CLASS_FLOOR: f64 = 5.0;
pub const ENHANCED_CLASS_FLOOR: f64 = 5.0;

/// Minimum confidence for a result to be counted by the tally
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.5;

/// Default smoothing parameters
pub const DEFAULT_EXPONENTIAL_ALPHA: f64 = 0.5;
pub const DEFAULT_MOVING_AVERAGE_WINDOW: usize = 5;

/// Exponential filter bounds
pub const EXPONENTIAL_ALPHA_MIN: f64 = 0.0;
pub const EXPONENTIAL_ALPHA_MAX: f64 = 1.0;

/// Frame dispatcher defaults
pub const DEFAULT_DISPATCH_WORKERS: usize = 2;
pub const DEFAULT_QUEUE_CAPACITY: usize = 4;

/// Sobel kernel support along each axis
pub const SOBEL_KERNEL_SIZE: usize = 3;

/// Largest intensity of an 8-bit grayscale pixel
pub const MAX_INTENSITY: f64 = 255.0;
