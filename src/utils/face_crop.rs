//! Conversion from decoded frames to classifier-ready face crops.

use super::FaceBox;
use crate::{face_image::FaceImage, face_image::FaceSize, Error, Result};
use image::imageops::{self, FilterType};
use image::GrayImage;
use std::path::Path;

fn to_u32(value: usize, what: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::InvalidInput(format!("{what} {value} does not fit in u32")))
}

fn resize_to(image: &GrayImage, size: FaceSize) -> Result<FaceImage> {
    let width = to_u32(size.width, "Face width")?;
    let height = to_u32(size.height, "Face height")?;
    if image.dimensions() == (width, height) {
        return FaceImage::from_gray(image);
    }
    FaceImage::from_gray(&imageops::resize(image, width, height, FilterType::Triangle))
}

/// Crop `face` out of a grayscale frame and resize it to `size`.
///
/// The box is clipped to the frame first.
///
/// # Errors
///
/// Returns `InvalidInput` if the clipped box is empty
pub fn crop_face(frame: &GrayImage, face: FaceBox, size: FaceSize) -> Result<FaceImage> {
    let (frame_w, frame_h) = frame.dimensions();
    let frame_w = i64::from(frame_w);
    let frame_h = i64::from(frame_h);

    let left = i64::from(face.x).clamp(0, frame_w);
    let top = i64::from(face.y).clamp(0, frame_h);
    let right = (i64::from(face.x) + i64::from(face.width)).clamp(0, frame_w);
    let bottom = (i64::from(face.y) + i64::from(face.height)).clamp(0, frame_h);
    if right <= left || bottom <= top {
        return Err(Error::InvalidInput(format!(
            "Face box {face:?} lies outside the {frame_w}x{frame_h} frame"
        )));
    }

    // Bounded by the u32 frame dimensions
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let cropped = imageops::crop_imm(
        frame,
        left as u32,
        top as u32,
        (right - left) as u32,
        (bottom - top) as u32,
    )
    .to_image();

    resize_to(&cropped, size)
}

/// Decode an image file to 8-bit grayscale
///
/// # Errors
///
/// Returns `Io` or `Image` if the file cannot be read or decoded
pub fn load_gray<P: AsRef<Path>>(path: P) -> Result<GrayImage> {
    Ok(image::open(path)?.to_luma8())
}

/// Load an already-cropped face from disk and resize it to `size`
///
/// # Errors
///
/// Returns `Io` or `Image` if the file cannot be read or decoded
pub fn load_face<P: AsRef<Path>>(path: P, size: FaceSize) -> Result<FaceImage> {
    resize_to(&load_gray(path)?, size)
}
