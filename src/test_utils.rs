// SPDX-License-Identifier: MPL-2.0
//! Test utilities for float comparisons and image fixtures.
//!
//! Re-exports the `approx` assertion used for percent geometry, which
//! accumulates rounding error that `assert_eq!` cannot absorb.

pub use approx::assert_abs_diff_eq;

use image_rs::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use std::io::Cursor;

/// Encodes a solid `width` x `height` RGB image as PNG.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(width, height, Rgb([9, 9, 9])));
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .expect("PNG encoding of a fixture cannot fail");
    buffer.into_inner()
}
