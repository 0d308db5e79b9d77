//! Single-channel face crops.

use crate::{constants::MAX_INTENSITY, Error, Result};
use image::GrayImage;
use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Width and height of the face crops a classifier accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceSize {
    pub width: usize,
    pub height: usize,
}

impl FaceSize {
    #[must_use]
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub const fn square(side: usize) -> Self {
        Self::new(side, side)
    }
}

impl Default for FaceSize {
    fn default() -> Self {
        Self::square(crate::constants::DEFAULT_FACE_SIZE)
    }
}

impl fmt::Display for FaceSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Cropped, resized grayscale face with intensities in `0.0..=255.0`.
///
/// Rows index the vertical axis, columns the horizontal one.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceImage {
    pixels: Array2<f64>,
}

impl FaceImage {
    /// Wrap an intensity matrix
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the matrix is empty or holds values outside
    /// `0.0..=MAX_INTENSITY`
    pub fn new(pixels: Array2<f64>) -> Result<Self> {
        if pixels.is_empty() {
            return Err(Error::InvalidInput("Face image must not be empty".to_string()));
        }
        if let Some(bad) = pixels.iter().find(|v| !(0.0..=MAX_INTENSITY).contains(*v)) {
            return Err(Error::InvalidInput(format!(
                "Face image intensity {bad} is outside 0..={MAX_INTENSITY}"
            )));
        }
        Ok(Self { pixels })
    }

    /// Build from row-major 8-bit samples
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `data` does not hold `width * height` samples
    pub fn from_raw(width: usize, height: usize, data: &[u8]) -> Result<Self> {
        let values: Vec<f64> = data.iter().map(|&v| f64::from(v)).collect();
        let pixels = Array2::from_shape_vec((height, width), values).map_err(|e| {
            Error::InvalidInput(format!(
                "Cannot shape {} samples into {width}x{height}: {e}",
                data.len()
            ))
        })?;
        Self::new(pixels)
    }

    /// Build by evaluating `f(row, col)` for every pixel.
    ///
    /// Values are clamped into `0.0..=MAX_INTENSITY`; NaN becomes 0.
    #[must_use]
    pub fn from_fn<F>(width: usize, height: usize, f: F) -> Self
    where
        F: Fn(usize, usize) -> f64,
    {
        Self {
            pixels: Array2::from_shape_fn((height, width), |(row, col)| clamp_intensity(f(row, col))),
        }
    }

    /// Every pixel at the same intensity, clamped like [`FaceImage::from_fn`]
    #[must_use]
    pub fn uniform(width: usize, height: usize, value: f64) -> Self {
        Self {
            pixels: Array2::from_elem((height, width), clamp_intensity(value)),
        }
    }

    /// Copy an 8-bit grayscale image without resizing
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the image has no pixels
    pub fn from_gray(image: &GrayImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        Self::from_raw(width as usize, height as usize, image.as_raw())
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.pixels.ncols()
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.pixels.nrows()
    }

    #[must_use]
    pub fn size(&self) -> FaceSize {
        FaceSize::new(self.width(), self.height())
    }

    #[must_use]
    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.pixels.view()
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.pixels.get((row, col)).copied()
    }
}

fn clamp_intensity(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, MAX_INTENSITY)
    }
}
