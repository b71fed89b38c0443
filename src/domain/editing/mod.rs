// SPDX-License-Identifier: MPL-2.0
//! Editing domain types.
//!
//! This module provides pure domain types for the crop step:
//! - [`CropSelection`]: Percent-based selection rectangle
//! - [`AspectPreset`]: Presets offered by the crop surface
//! - [`AspectRatio`], [`RenderSize`]: Validated geometry inputs

pub mod crop;
pub mod newtypes;

pub use crop::{AspectPreset, CropSelection, HandlePosition, PixelRect, UnknownPreset};
pub use newtypes::{AspectRatio, RenderSize};
