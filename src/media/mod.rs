// SPDX-License-Identifier: MPL-2.0
//! Image data handling for the workflow.
//!
//! - [`store`]: Session registry behind every [`ImageHandle`](crate::domain::media::ImageHandle)
//! - [`image_transform`]: Pixel crop and PNG encoding
//! - [`data_url`]: Portable `data:` URL form sent to the caption service

pub mod data_url;
pub mod image_transform;
pub mod store;

pub use image_transform::{apply_crop, CroppedImage, CROP_OUTPUT_MEDIA_TYPE};
pub use store::{ImageStore, StoredImage};
