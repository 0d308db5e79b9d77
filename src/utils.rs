//! Utility functions for detector boxes and face crops.

pub mod face_crop;

/// Axis-aligned face box in frame pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl FaceBox {
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub fn area(&self) -> i64 {
        i64::from(self.width.max(0)) * i64::from(self.height.max(0))
    }
}

#[allow(clippy::cast_possible_truncation)] // Clamped before the cast
fn scaled_shift(extent: i32, shift: f32, max: i32) -> i32 {
    let value = extent as f32 * shift;
    if !value.is_finite() {
        return 0;
    }
    value.clamp(0.0, max.max(0) as f32) as i32
}

/// Expand detector boxes by `shift` of their size, make them square and
/// keep them inside a `max_width` x `max_height` frame.
#[allow(clippy::cast_precision_loss)] // Precision loss acceptable for box dimensions
pub fn refine_boxes(boxes: &mut [FaceBox], max_width: i32, max_height: i32, shift: f32) {
    for bbox in boxes.iter_mut() {
        let x_shift = scaled_shift(bbox.width, shift, max_width);
        let y_shift = scaled_shift(bbox.height, shift, max_height);

        // Expand the bounding box
        bbox.x = (bbox.x - x_shift).max(0);
        bbox.y = (bbox.y - y_shift).max(0);
        bbox.width = (bbox.width + 2 * x_shift).min(max_width - bbox.x);
        bbox.height = (bbox.height + 2 * y_shift).min(max_height - bbox.y);

        // Make it square, no larger than the frame
        let side_length = bbox.width.max(bbox.height).min(max_width.min(max_height)).max(0);
        bbox.width = side_length;
        bbox.height = side_length;

        // Ensure it doesn't exceed image boundaries
        if bbox.x + bbox.width > max_width {
            bbox.x = max_width - bbox.width;
        }
        if bbox.y + bbox.height > max_height {
            bbox.y = max_height - bbox.height;
        }
    }
}

/// Largest box by area; the first one wins ties
#[must_use]
pub fn largest_face(boxes: &[FaceBox]) -> Option<FaceBox> {
    let mut best: Option<FaceBox> = None;
    for &bbox in boxes {
        match best {
            Some(top) if bbox.area() <= top.area() => {}
            _ => best = Some(bbox),
        }
    }
    best
}
