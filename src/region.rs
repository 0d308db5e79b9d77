//! Subregion partitioning of face crops.
//!
//! Regions are geometrically assumed, not detected: each one is a rectangle
//! whose edges are exact fractions of the face height and width. A fraction
//! `n/d` of an extent `e` maps to the pixel index `n * e / d` using integer
//! division, so `2/3` of 48 rows is row 32.

use crate::{face_image::FaceSize, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Exact non-negative rational used for region edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Fraction {
    num: u32,
    den: u32,
}

impl Fraction {
    pub const ZERO: Self = Self { num: 0, den: 1 };
    pub const ONE: Self = Self { num: 1, den: 1 };

    /// Create a fraction
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `den` is zero
    pub fn new(num: u32, den: u32) -> Result<Self> {
        if den == 0 {
            return Err(Error::ConfigError(format!("Fraction {num}/0 has a zero denominator")));
        }
        Ok(Self { num, den })
    }

    /// Pixel index of this fraction along an axis, clamped to the extent
    #[must_use]
    pub fn of(self, extent: usize) -> usize {
        let index = u64::from(self.num) * extent as u64 / u64::from(self.den);
        index.min(extent as u64) as usize
    }

    fn lt(self, other: Self) -> bool {
        u64::from(self.num) * u64::from(other.den) < u64::from(other.num) * u64::from(self.den)
    }
}

/// Fraction literal for the built-in region set
const fn frac(num: u32, den: u32) -> Fraction {
    Fraction { num, den }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

impl FromStr for Fraction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parse = |part: &str| {
            part.trim()
                .parse::<u32>()
                .map_err(|e| Error::ConfigError(format!("Invalid fraction '{s}': {e}")))
        };
        match s.split_once('/') {
            Some((num, den)) => Self::new(parse(num)?, parse(den)?),
            None => Self::new(parse(s)?, 1),
        }
    }
}

impl TryFrom<String> for Fraction {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Fraction> for String {
    fn from(f: Fraction) -> Self {
        f.to_string()
    }
}

/// Named rectangle in fractional face coordinates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionSpec {
    pub name: String,
    pub top: Fraction,
    pub bottom: Fraction,
    pub left: Fraction,
    pub right: Fraction,
}

impl RegionSpec {
    #[must_use]
    pub fn new(name: &str, top: Fraction, bottom: Fraction, left: Fraction, right: Fraction) -> Self {
        Self {
            name: name.to_string(),
            top,
            bottom,
            left,
            right,
        }
    }

    /// Full-width horizontal band
    #[must_use]
    pub fn band(name: &str, top: Fraction, bottom: Fraction) -> Self {
        Self::new(name, top, bottom, Fraction::ZERO, Fraction::ONE)
    }

    /// Full-height vertical strip
    #[must_use]
    pub fn strip(name: &str, left: Fraction, right: Fraction) -> Self {
        Self::new(name, Fraction::ZERO, Fraction::ONE, left, right)
    }

    /// Pixel rectangle of this region on a face of the given size
    #[must_use]
    pub fn resolve(&self, size: FaceSize) -> PixelRect {
        PixelRect {
            top: self.top.of(size.height),
            bottom: self.bottom.of(size.height),
            left: self.left.of(size.width),
            right: self.right.of(size.width),
        }
    }

    fn check_order(&self) -> Result<()> {
        if !self.top.lt(self.bottom) {
            return Err(Error::ConfigError(format!(
                "Region '{}' has top {} not above bottom {}",
                self.name, self.top, self.bottom
            )));
        }
        if !self.left.lt(self.right) {
            return Err(Error::ConfigError(format!(
                "Region '{}' has left {} not before right {}",
                self.name, self.left, self.right
            )));
        }
        Ok(())
    }
}

/// Half-open pixel rectangle `[top, bottom) x [left, right)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub top: usize,
    pub bottom: usize,
    pub left: usize,
    pub right: usize,
}

impl PixelRect {
    #[must_use]
    pub fn width(&self) -> usize {
        self.right.saturating_sub(self.left)
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.bottom.saturating_sub(self.top)
    }

    #[must_use]
    pub fn area(&self) -> usize {
        self.width() * self.height()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.area() == 0
    }
}

/// A resolved region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub name: String,
    pub rect: PixelRect,
}

/// Resolved region set for one face size.
///
/// Built once when a classifier is constructed and reused for every face.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    size: FaceSize,
    regions: Vec<Region>,
}

impl Partition {
    #[must_use]
    pub fn size(&self) -> FaceSize {
        self.size
    }

    #[must_use]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.name == name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// Resolve region specs against a face size. Performs no pixel reads.
///
/// # Errors
///
/// Returns `ConfigError` for an empty spec list, duplicate names, inverted
/// bounds, or a region that has zero area at `size`
pub fn partition(specs: &[RegionSpec], size: FaceSize) -> Result<Partition> {
    if specs.is_empty() {
        return Err(Error::ConfigError("At least one region must be configured".to_string()));
    }
    if size.width == 0 || size.height == 0 {
        return Err(Error::ConfigError(format!("Face size {size} has zero area")));
    }

    let mut regions: Vec<Region> = Vec::with_capacity(specs.len());
    for spec in specs {
        if spec.name.trim().is_empty() {
            return Err(Error::ConfigError("Region names must not be empty".to_string()));
        }
        if regions.iter().any(|r| r.name == spec.name) {
            return Err(Error::ConfigError(format!("Duplicate region name '{}'", spec.name)));
        }
        spec.check_order()?;

        let rect = spec.resolve(size);
        if rect.is_empty() {
            return Err(Error::ConfigError(format!(
                "Region '{}' collapses to zero area on a {size} face",
                spec.name
            )));
        }
        regions.push(Region {
            name: spec.name.clone(),
            rect,
        });
    }

    Ok(Partition { size, regions })
}

/// Reference facial region set: thirds, halves, sides, the central
/// quarter box and the finer eye, brow, nose, cheek and mouth bands.
#[must_use]
pub fn facial_regions() -> Vec<RegionSpec> {
    let zero = Fraction::ZERO;
    let one = Fraction::ONE;
    vec![
        RegionSpec::band("face", zero, one),
        RegionSpec::band("upper_face", zero, frac(1, 3)),
        RegionSpec::band("middle_face", frac(1, 3), frac(2, 3)),
        RegionSpec::band("lower_face", frac(2, 3), one),
        RegionSpec::band("upper_half", zero, frac(1, 2)),
        RegionSpec::band("lower_half", frac(1, 2), one),
        RegionSpec::strip("left_side", zero, frac(1, 2)),
        RegionSpec::strip("right_side", frac(1, 2), one),
        RegionSpec::new("center", frac(1, 4), frac(3, 4), frac(1, 4), frac(3, 4)),
        RegionSpec::band("forehead", zero, frac(1, 8)),
        RegionSpec::new("left_eye", frac(1, 8), frac(1, 3), frac(1, 4), frac(1, 2)),
        RegionSpec::new("right_eye", frac(1, 8), frac(1, 3), frac(1, 2), frac(3, 4)),
        RegionSpec::new("left_eyebrow", frac(1, 8), frac(1, 5), frac(1, 4), frac(1, 2)),
        RegionSpec::new("right_eyebrow", frac(1, 8), frac(1, 5), frac(1, 2), frac(3, 4)),
        RegionSpec::new("nose", frac(1, 3), frac(2, 3), frac(1, 3), frac(2, 3)),
        RegionSpec::new("left_cheek", frac(1, 3), frac(2, 3), frac(1, 6), frac(1, 3)),
        RegionSpec::new("right_cheek", frac(1, 3), frac(2, 3), frac(2, 3), frac(5, 6)),
        RegionSpec::new("mouth", frac(2, 3), frac(5, 6), frac(1, 4), frac(3, 4)),
        RegionSpec::new("upper_mouth", frac(2, 3), frac(3, 4), frac(1, 4), frac(3, 4)),
        RegionSpec::new("lower_mouth", frac(3, 4), frac(5, 6), frac(1, 4), frac(3, 4)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction_matches_floor_division() {
        let two_thirds: Fraction = "2/3".parse().unwrap();
        assert_eq!(two_thirds.of(48), 32);
        assert_eq!(frac(5, 6).of(48), 40);
        assert_eq!(frac(1, 5).of(48), 9);
        assert_eq!(frac(1, 8).of(48), 6);
        // Bounds past the edge clamp to the extent
        assert_eq!(frac(3, 2).of(48), 48);
    }

    #[test]
    fn test_fraction_parsing() {
        assert_eq!("1".parse::<Fraction>().unwrap(), Fraction::ONE);
        assert_eq!(" 3 / 4 ".parse::<Fraction>().unwrap(), frac(3, 4));
        assert!("1/0".parse::<Fraction>().is_err());
        assert!("half".parse::<Fraction>().is_err());
        assert_eq!(String::from(frac(5, 6)), "5/6");
        assert_eq!(String::from(Fraction::ZERO), "0");
    }

    #[test]
    fn test_facial_partition_bounds() {
        let partition = partition(&facial_regions(), FaceSize::square(48)).unwrap();
        let mouth = partition.get("mouth").unwrap().rect;
        assert_eq!(mouth, PixelRect { top: 32, bottom: 40, left: 12, right: 36 });

        let brow = partition.get("left_eyebrow").unwrap().rect;
        assert_eq!((brow.top, brow.bottom, brow.left, brow.right), (6, 9, 12, 24));

        let right_side = partition.get("right_side").unwrap().rect;
        assert_eq!((right_side.left, right_side.right), (24, 48));

        let center = partition.get("center").unwrap().rect;
        assert_eq!(center, PixelRect { top: 12, bottom: 36, left: 12, right: 36 });
        assert_eq!(partition.len(), facial_regions().len());
    }

    #[test]
    fn test_partition_rejects_inverted_bounds() {
        let specs = vec![RegionSpec::band("bad", frac(2, 3), frac(1, 3))];
        assert!(matches!(
            partition(&specs, FaceSize::square(48)),
            Err(Error::ConfigError(_))
        ));
    }

    #[test]
    fn test_partition_rejects_zero_area_at_size() {
        // 1/100 .. 1/50 of 48 rows is rows 0..0
        let specs = vec![RegionSpec::band("sliver", frac(1, 100), frac(1, 50))];
        let err = partition(&specs, FaceSize::square(48)).unwrap_err();
        assert!(err.to_string().contains("zero area"));
        assert!(partition(&specs, FaceSize::square(500)).is_ok());
    }

    #[test]
    fn test_partition_rejects_duplicate_names() {
        let specs = vec![
            RegionSpec::band("face", Fraction::ZERO, Fraction::ONE),
            RegionSpec::band("face", Fraction::ZERO, frac(1, 2)),
        ];
        assert!(partition(&specs, FaceSize::square(48)).is_err());
        assert!(partition(&[], FaceSize::square(48)).is_err());
    }
}
