// SPDX-License-Identifier: MPL-2.0
//! Pixel operations for the crop step: decode, crop and lossless re-encode.

use crate::domain::editing::{CropSelection, PixelRect, RenderSize};
use crate::error::{Error, Result};
use image_rs::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;

/// Media type of every crop result.
pub const CROP_OUTPUT_MEDIA_TYPE: &str = "image/png";

/// A cropped image encoded as PNG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CroppedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Decode image bytes, guessing the format from the content.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage> {
    Ok(image_rs::load_from_memory(bytes)?)
}

/// Crop the image to the specified rectangle.
///
/// The rectangle is clamped to the image boundaries and is at least one pixel
/// in each direction. Returns `None` for an empty image.
#[must_use]
pub fn crop(image: &DynamicImage, rect: PixelRect) -> Option<DynamicImage> {
    let (img_width, img_height) = image.dimensions();
    if img_width == 0 || img_height == 0 {
        return None;
    }

    let x = rect.x.min(img_width - 1);
    let y = rect.y.min(img_height - 1);
    let width = rect.width.min(img_width - x).max(1);
    let height = rect.height.min(img_height - y).max(1);

    Some(image.crop_imm(x, y, width, height))
}

/// Encode losslessly as PNG.
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

/// Crop encoded `source` bytes to `selection`, expressed against the image as
/// rendered at `rendered` size, and return the PNG result.
///
/// Percent coordinates map to source pixels with `natural / rendered` per axis.
pub fn apply_crop(
    source: &[u8],
    selection: &CropSelection,
    rendered: RenderSize,
) -> Result<CroppedImage> {
    let image = decode(source)?;
    let rect = selection
        .to_pixel_rect(rendered, image.dimensions())
        .ok_or_else(|| Error::Image("Source image has no pixels".to_string()))?;
    let cropped =
        crop(&image, rect).ok_or_else(|| Error::Image("Crop area is empty".to_string()))?;
    let (width, height) = cropped.dimensions();
    log::debug!(
        "cropped {}x{} source to {width}x{height} at ({}, {})",
        image.width(),
        image.height(),
        rect.x,
        rect.y
    );

    Ok(CroppedImage {
        bytes: encode_png(&cropped)?,
        width,
        height,
    })
}
