//! Per-region intensity and gradient descriptors.

use crate::{
    constants::SOBEL_KERNEL_SIZE,
    face_image::FaceImage,
    region::{Partition, PixelRect},
    Error, Result,
};
use ndarray::{s, ArrayView2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Scalar statistic computed over a region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Descriptor {
    Mean,
    #[serde(rename = "stddev")]
    StdDev,
    GradX,
    GradY,
}

impl Descriptor {
    pub const ALL: [Self; 4] = [Self::Mean, Self::StdDev, Self::GradX, Self::GradY];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::StdDev => "stddev",
            Self::GradX => "grad_x",
            Self::GradY => "grad_y",
        }
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Descriptor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "mean" | "avg" => Ok(Self::Mean),
            "stddev" | "std" => Ok(Self::StdDev),
            "grad_x" | "gradX" => Ok(Self::GradX),
            "grad_y" | "gradY" => Ok(Self::GradY),
            other => Err(Error::ConfigError(format!("Unknown descriptor '{other}'"))),
        }
    }
}

/// `(region, descriptor)` address of one feature, written `region.descriptor`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FeatureKey {
    pub region: String,
    pub descriptor: Descriptor,
}

impl FeatureKey {
    #[must_use]
    pub fn new(region: &str, descriptor: Descriptor) -> Self {
        Self {
            region: region.to_string(),
            descriptor,
        }
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.region, self.descriptor)
    }
}

impl FromStr for FeatureKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (region, descriptor) = s
            .trim()
            .rsplit_once('.')
            .ok_or_else(|| Error::ConfigError(format!("Feature '{s}' must be written region.descriptor")))?;
        if region.is_empty() {
            return Err(Error::ConfigError(format!("Feature '{s}' has an empty region name")));
        }
        Ok(Self::new(region, descriptor.parse()?))
    }
}

impl TryFrom<String> for FeatureKey {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<FeatureKey> for String {
    fn from(key: FeatureKey) -> Self {
        key.to_string()
    }
}

/// The four descriptors of one region
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RegionFeatures {
    pub mean: f64,
    pub stddev: f64,
    pub grad_x: f64,
    pub grad_y: f64,
}

impl RegionFeatures {
    #[must_use]
    pub fn get(&self, descriptor: Descriptor) -> f64 {
        match descriptor {
            Descriptor::Mean => self.mean,
            Descriptor::StdDev => self.stddev,
            Descriptor::GradX => self.grad_x,
            Descriptor::GradY => self.grad_y,
        }
    }
}

/// Every descriptor of every region of a partition
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureVector {
    regions: BTreeMap<String, RegionFeatures>,
}

impl FeatureVector {
    #[must_use]
    pub fn get(&self, key: &FeatureKey) -> Option<f64> {
        self.regions.get(&key.region).map(|f| f.get(key.descriptor))
    }

    #[must_use]
    pub fn region(&self, name: &str) -> Option<&RegionFeatures> {
        self.regions.get(name)
    }

    /// Number of regions covered
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// All `(key, value)` pairs in key order
    pub fn iter(&self) -> impl Iterator<Item = (FeatureKey, f64)> + '_ {
        self.regions.iter().flat_map(|(name, features)| {
            Descriptor::ALL
                .iter()
                .map(move |&d| (FeatureKey::new(name, d), features.get(d)))
        })
    }

    pub(crate) fn insert(&mut self, name: &str, features: RegionFeatures) {
        self.regions.insert(name.to_string(), features);
    }
}

/// Edge operator used for `grad_x` / `grad_y`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientOperator {
    /// Forward difference between neighbouring pixels
    #[default]
    FiniteDifference,
    /// 3x3 Sobel kernel with reflect-101 borders
    Sobel,
}

/// Computes region descriptors for a face image
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureExtractor {
    operator: GradientOperator,
}

impl FeatureExtractor {
    #[must_use]
    pub fn new(operator: GradientOperator) -> Self {
        Self { operator }
    }

    #[must_use]
    pub fn operator(&self) -> GradientOperator {
        self.operator
    }

    /// Extract every region of `partition`.
    ///
    /// # Errors
    ///
    /// Returns `InputShape` if the face does not match the partition size
    pub fn extract(&self, image: &FaceImage, partition: &Partition) -> Result<FeatureVector> {
        let expected = partition.size();
        if image.size() != expected {
            return Err(Error::InputShape {
                expected_width: expected.width,
                expected_height: expected.height,
                width: image.width(),
                height: image.height(),
            });
        }

        let mut features = FeatureVector::default();
        for region in partition.regions() {
            features.insert(&region.name, self.extract_region(image, &region.rect));
        }
        Ok(features)
    }

    /// Descriptors of a single rectangle, clamped to the image
    #[must_use]
    pub fn extract_region(&self, image: &FaceImage, rect: &PixelRect) -> RegionFeatures {
        let bottom = rect.bottom.min(image.height());
        let right = rect.right.min(image.width());
        let top = rect.top.min(bottom);
        let left = rect.left.min(right);
        let view = image.view();
        let region = view.slice(s![top..bottom, left..right]);
        if region.is_empty() {
            return RegionFeatures::default();
        }

        let mean = region.mean().unwrap_or(0.0);
        let stddev = region.std(0.0);
        let (grad_x, grad_y) = match self.operator {
            GradientOperator::FiniteDifference => finite_difference(&region),
            GradientOperator::Sobel => sobel(&region),
        };

        RegionFeatures {
            mean,
            stddev,
            grad_x,
            grad_y,
        }
    }
}

/// Mean absolute forward difference along columns and rows
fn finite_difference(region: &ArrayView2<'_, f64>) -> (f64, f64) {
    let (rows, cols) = region.dim();

    let grad_x = if cols < 2 {
        0.0
    } else {
        let dx = &region.slice(s![.., 1..]) - &region.slice(s![.., ..-1]);
        dx.mapv(f64::abs).mean().unwrap_or(0.0)
    };
    let grad_y = if rows < 2 {
        0.0
    } else {
        let dy = &region.slice(s![1.., ..]) - &region.slice(s![..-1, ..]);
        dy.mapv(f64::abs).mean().unwrap_or(0.0)
    };

    (grad_x, grad_y)
}

/// Reflect an out-of-range index back into `0..n` without repeating the edge
fn reflect_101(index: isize, n: usize) -> usize {
    let n = n as isize;
    let reflected = if index < 0 {
        -index
    } else if index >= n {
        2 * n - 2 - index
    } else {
        index
    };
    reflected.clamp(0, n - 1) as usize
}

/// Mean absolute 3x3 Sobel response along each axis.
///
/// Regions smaller than the kernel have no gradient.
fn sobel(region: &ArrayView2<'_, f64>) -> (f64, f64) {
    const SMOOTH: [f64; 3] = [1.0, 2.0, 1.0];
    const DERIV: [f64; 3] = [-1.0, 0.0, 1.0];

    let (rows, cols) = region.dim();
    if rows < SOBEL_KERNEL_SIZE || cols < SOBEL_KERNEL_SIZE {
        return (0.0, 0.0);
    }

    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    for row in 0..rows {
        for col in 0..cols {
            let mut gx = 0.0;
            let mut gy = 0.0;
            for (i, dr) in (-1isize..=1).enumerate() {
                let r = reflect_101(row as isize + dr, rows);
                for (j, dc) in (-1isize..=1).enumerate() {
                    let c = reflect_101(col as isize + dc, cols);
                    let value = region[[r, c]];
                    gx += SMOOTH[i] * DERIV[j] * value;
                    gy += DERIV[i] * SMOOTH[j] * value;
                }
            }
            sum_x += gx.abs();
            sum_y += gy.abs();
        }
    }

    let n = (rows * cols) as f64;
    (sum_x / n, sum_y / n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::face_image::FaceSize;
    use crate::region::{facial_regions, partition};

    fn ramp(width: usize, height: usize, step: f64) -> FaceImage {
        FaceImage::from_fn(width, height, |_, col| col as f64 * step)
    }

    fn whole(image: &FaceImage) -> PixelRect {
        PixelRect {
            top: 0,
            bottom: image.height(),
            left: 0,
            right: image.width(),
        }
    }

    #[test]
    fn test_mean_and_stddev() {
        // Alternating columns of 110 and 190
        let face = FaceImage::from_fn(4, 4, |_, col| if col % 2 == 0 { 110.0 } else { 190.0 });
        let f = FeatureExtractor::default().extract_region(&face, &whole(&face));
        assert_eq!(f.mean, 150.0);
        assert!((f.stddev - 40.0).abs() < 1e-9);
        assert_eq!(f.grad_x, 80.0);
        assert_eq!(f.grad_y, 0.0);
    }

    #[test]
    fn test_sobel_on_ramp() {
        let face = ramp(5, 5, 10.0);
        let f = FeatureExtractor::new(GradientOperator::Sobel).extract_region(&face, &whole(&face));
        // Interior columns respond with 8 * step; reflected edge columns cancel out
        assert!((f.grad_x - 48.0).abs() < 1e-12);
        assert_eq!(f.grad_y, 0.0);
    }

    #[test]
    fn test_small_region_has_zero_gradient() {
        let face = ramp(2, 2, 10.0);
        let sobel = FeatureExtractor::new(GradientOperator::Sobel).extract_region(&face, &whole(&face));
        assert_eq!((sobel.grad_x, sobel.grad_y), (0.0, 0.0));

        let column = ramp(1, 4, 10.0);
        let diff = FeatureExtractor::default().extract_region(&column, &whole(&column));
        assert_eq!(diff.grad_x, 0.0);
    }

    #[test]
    fn test_reflect_101() {
        assert_eq!(reflect_101(-1, 5), 1);
        assert_eq!(reflect_101(5, 5), 3);
        assert_eq!(reflect_101(2, 5), 2);
    }

    #[test]
    fn test_extract_is_total_and_checks_shape() {
        let partition = partition(&facial_regions(), FaceSize::square(48)).unwrap();
        let face = FaceImage::from_fn(48, 48, |r, c| ((r * 7 + c * 3) % 256) as f64);
        let features = FeatureExtractor::default().extract(&face, &partition).unwrap();
        assert_eq!(features.len(), partition.len());
        assert_eq!(features.iter().count(), partition.len() * 4);

        let wrong = FaceImage::uniform(40, 48, 0.0);
        assert!(matches!(
            FeatureExtractor::default().extract(&wrong, &partition),
            Err(Error::InputShape { width: 40, .. })
        ));
    }

    #[test]
    fn test_feature_key_parsing() {
        let key: FeatureKey = "left_cheek.mean".parse().unwrap();
        assert_eq!(key, FeatureKey::new("left_cheek", Descriptor::Mean));
        assert_eq!("mouth.gradX".parse::<FeatureKey>().unwrap().descriptor, Descriptor::GradX);
        assert!("mouth".parse::<FeatureKey>().is_err());
        assert!("mouth.median".parse::<FeatureKey>().is_err());
        assert_eq!(String::from(FeatureKey::new("nose", Descriptor::StdDev)), "nose.stddev");
    }
}
