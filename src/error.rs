//! Error types for the emotion scoring library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decoding or processing failed
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// Configuration is unusable; raised once while building a classifier
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Face image does not match the configured face size
    #[error("Input shape error: expected {expected_width}x{expected_height} face, got {width}x{height}")]
    InputShape {
        /// Configured face width
        expected_width: usize,
        /// Configured face height
        expected_height: usize,
        /// Width of the rejected face
        width: usize,
        /// Height of the rejected face
        height: usize,
    },

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Smoothing filter initialization error
    #[error("Filter error: {0}")]
    FilterError(String),

    /// Worker pool failure
    #[error("Dispatch error: {0}")]
    DispatchError(String),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether the error is a per-frame failure a stream loop can skip past
    #[must_use]
    pub fn is_per_frame(&self) -> bool {
        matches!(self, Self::InputShape { .. } | Self::InvalidInput(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_shape_message() {
        let err = Error::InputShape {
            expected_width: 48,
            expected_height: 48,
            width: 64,
            height: 32,
        };
        assert_eq!(
            err.to_string(),
            "Input shape error: expected 48x48 face, got 64x32"
        );
        assert!(err.is_per_frame());
    }

    #[test]
    fn test_config_error_is_not_per_frame() {
        let err = Error::ConfigError("empty class set".to_string());
        assert!(!err.is_per_frame());
        assert!(err.to_string().contains("empty class set"));
    }
}
