// SPDX-License-Identifier: MPL-2.0
//! Editing newtypes.
//!
//! This module provides type-safe wrappers for crop geometry inputs,
//! ensuring they are always positive and finite.

// =============================================================================
// AspectRatio
// =============================================================================

/// Width-to-height ratio of a crop selection, always positive and finite.
///
/// # Example
///
/// ```
/// use meme_machine::domain::editing::AspectRatio;
///
/// let widescreen = AspectRatio::new(16.0 / 9.0).unwrap();
/// assert!(widescreen.value() > 1.0);
/// assert!(AspectRatio::new(0.0).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectRatio(f32);

impl AspectRatio {
    /// Square (1:1).
    pub const SQUARE: Self = Self(1.0);

    /// Creates a ratio, rejecting zero, negative and non-finite values.
    #[must_use]
    pub fn new(ratio: f32) -> Option<Self> {
        (ratio.is_finite() && ratio > 0.0).then_some(Self(ratio))
    }

    /// Returns the raw ratio.
    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }
}

// =============================================================================
// RenderSize
// =============================================================================

/// On-screen size of an image, in logical pixels.
///
/// Both dimensions are guaranteed to be positive and finite, so percent to
/// pixel conversions never divide by zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSize {
    width: f32,
    height: f32,
}

impl RenderSize {
    /// Creates a render size, returning `None` for empty or non-finite sizes.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Option<Self> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        (valid(width) && valid(height)).then_some(Self { width, height })
    }

    #[must_use]
    pub fn width(self) -> f32 {
        self.width
    }

    #[must_use]
    pub fn height(self) -> f32 {
        self.height
    }

    /// Width divided by height.
    #[must_use]
    pub fn aspect(self) -> f32 {
        self.width / self.height
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_ratio_rejects_degenerate_values() {
        assert!(AspectRatio::new(0.0).is_none());
        assert!(AspectRatio::new(-1.0).is_none());
        assert!(AspectRatio::new(f32::NAN).is_none());
        assert!(AspectRatio::new(f32::INFINITY).is_none());
        assert!((AspectRatio::new(4.0 / 3.0).unwrap().value() - 4.0 / 3.0).abs() < f32::EPSILON);
    }

    #[test]
    fn render_size_requires_positive_dimensions() {
        assert!(RenderSize::new(0.0, 10.0).is_none());
        assert!(RenderSize::new(10.0, -1.0).is_none());
        let size = RenderSize::new(200.0, 100.0).unwrap();
        assert!((size.aspect() - 2.0).abs() < f32::EPSILON);
    }
}
