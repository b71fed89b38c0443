// SPDX-License-Identifier: MPL-2.0
//! Crop selection geometry.
//!
//! Selections live in percent units relative to the rendered image, so they
//! survive window resizes. They are converted to source pixels only when the
//! crop is applied.

use super::newtypes::{AspectRatio, RenderSize};
use crate::config::{
    CROP_COVERAGE_PERCENT, FREE_CROP_EXTENT_PERCENT, FREE_CROP_ORIGIN_PERCENT,
    MIN_CROP_EXTENT_PERCENT,
};
use std::fmt;
use std::str::FromStr;

const FULL: f32 = 100.0;

/// Slack for float drift when checking `x + width <= 100`.
const TOLERANCE: f32 = 1e-3;

// =============================================================================
// AspectPreset
// =============================================================================

/// Aspect presets offered by the crop surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectPreset {
    Square,     // 1:1
    Widescreen, // 16:9
    Standard,   // 4:3
    Free,
}

impl AspectPreset {
    pub const ALL: [AspectPreset; 4] = [
        AspectPreset::Square,
        AspectPreset::Widescreen,
        AspectPreset::Standard,
        AspectPreset::Free,
    ];

    /// Locked ratio of the preset, `None` for free-form.
    #[must_use]
    pub fn ratio(self) -> Option<AspectRatio> {
        match self {
            AspectPreset::Square => Some(AspectRatio::SQUARE),
            AspectPreset::Widescreen => AspectRatio::new(16.0 / 9.0),
            AspectPreset::Standard => AspectRatio::new(4.0 / 3.0),
            AspectPreset::Free => None,
        }
    }

    /// Button text of the preset.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            AspectPreset::Square => "1:1",
            AspectPreset::Widescreen => "16:9",
            AspectPreset::Standard => "4:3",
            AspectPreset::Free => "Free",
        }
    }
}

/// A preset label outside the offered set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPreset(pub String);

impl fmt::Display for UnknownPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown aspect preset: {}", self.0)
    }
}

impl std::error::Error for UnknownPreset {}

impl FromStr for AspectPreset {
    type Err = UnknownPreset;

    /// Parses a preset label, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AspectPreset::ALL
            .into_iter()
            .find(|preset| preset.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownPreset(s.to_string()))
    }
}

// =============================================================================
// HandlePosition
// =============================================================================

/// Position of a resize handle on the selection rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlePosition {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

impl HandlePosition {
    fn moves_left(self) -> bool {
        matches!(
            self,
            HandlePosition::TopLeft | HandlePosition::Left | HandlePosition::BottomLeft
        )
    }

    fn moves_right(self) -> bool {
        matches!(
            self,
            HandlePosition::TopRight | HandlePosition::Right | HandlePosition::BottomRight
        )
    }

    fn moves_top(self) -> bool {
        matches!(
            self,
            HandlePosition::TopLeft | HandlePosition::Top | HandlePosition::TopRight
        )
    }

    fn moves_bottom(self) -> bool {
        matches!(
            self,
            HandlePosition::BottomLeft | HandlePosition::Bottom | HandlePosition::BottomRight
        )
    }

    #[must_use]
    pub fn is_corner(self) -> bool {
        matches!(
            self,
            HandlePosition::TopLeft
                | HandlePosition::TopRight
                | HandlePosition::BottomLeft
                | HandlePosition::BottomRight
        )
    }
}

// =============================================================================
// PixelRect
// =============================================================================

/// Crop region in source-image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

// =============================================================================
// CropSelection
// =============================================================================

/// Rectangle in percent of the rendered image, with an optional aspect lock.
///
/// Invariant: `width, height > 0`, every field in `[0, 100]`,
/// `x + width <= 100` and `y + height <= 100`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropSelection {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    aspect: Option<AspectRatio>,
}

impl CropSelection {
    /// Builds a selection, returning `None` when the rectangle breaks the invariant.
    #[must_use]
    pub fn new(
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        aspect: Option<AspectRatio>,
    ) -> Option<Self> {
        let in_range = |v: f32| v.is_finite() && (0.0..=FULL).contains(&v);
        if !(in_range(x) && in_range(y) && in_range(width) && in_range(height)) {
            return None;
        }
        if x + width > FULL + TOLERANCE || y + height > FULL + TOLERANCE {
            return None;
        }

        let width = width.min(FULL - x);
        let height = height.min(FULL - y);
        if width <= 0.0 || height <= 0.0 {
            return None;
        }

        Some(Self {
            x,
            y,
            width,
            height,
            aspect,
        })
    }

    /// Unconstrained selection anchored at (5%, 5%) covering 90% x 90%.
    #[must_use]
    pub fn free() -> Self {
        Self {
            x: FREE_CROP_ORIGIN_PERCENT,
            y: FREE_CROP_ORIGIN_PERCENT,
            width: FREE_CROP_EXTENT_PERCENT,
            height: FREE_CROP_EXTENT_PERCENT,
            aspect: None,
        }
    }

    /// Centered selection at `aspect`, covering 90% of the largest rectangle
    /// of that ratio that fits in the rendered image.
    #[must_use]
    pub fn centered(aspect: AspectRatio, size: RenderSize) -> Self {
        let ratio = aspect.value();
        let (fit_width, fit_height) = if size.aspect() > ratio {
            (size.height() * ratio, size.height())
        } else {
            (size.width(), size.width() / ratio)
        };

        let coverage = CROP_COVERAGE_PERCENT / FULL;
        let width = (fit_width * coverage / size.width() * FULL).min(FULL);
        let height = (fit_height * coverage / size.height() * FULL).min(FULL);

        Self {
            x: (FULL - width) / 2.0,
            y: (FULL - height) / 2.0,
            width,
            height,
            aspect: Some(aspect),
        }
    }

    /// Selection produced by an aspect preset.
    #[must_use]
    pub fn for_preset(preset: AspectPreset, size: RenderSize) -> Self {
        match preset.ratio() {
            Some(ratio) => Self::centered(ratio, size),
            None => Self::free(),
        }
    }

    #[must_use]
    pub fn x(&self) -> f32 {
        self.x
    }

    #[must_use]
    pub fn y(&self) -> f32 {
        self.y
    }

    #[must_use]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f32 {
        self.height
    }

    #[must_use]
    pub fn aspect(&self) -> Option<AspectRatio> {
        self.aspect
    }

    fn right(&self) -> f32 {
        self.x + self.width
    }

    fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Whether a point (in percent) lies inside the selection.
    #[must_use]
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
    }

    /// Returns the handle under a point (in percent), corners first.
    #[must_use]
    pub fn handle_at(&self, px: f32, py: f32, radius: f32) -> Option<HandlePosition> {
        let near = |a: f32, b: f32| (a - b).abs() <= radius;
        let within_x = px >= self.x - radius && px <= self.right() + radius;
        let within_y = py >= self.y - radius && py <= self.bottom() + radius;
        let (left, right) = (near(px, self.x), near(px, self.right()));
        let (top, bottom) = (near(py, self.y), near(py, self.bottom()));

        match (left, right, top, bottom) {
            (true, _, true, _) => Some(HandlePosition::TopLeft),
            (_, true, true, _) => Some(HandlePosition::TopRight),
            (true, _, _, true) => Some(HandlePosition::BottomLeft),
            (_, true, _, true) => Some(HandlePosition::BottomRight),
            (_, _, true, _) if within_x => Some(HandlePosition::Top),
            (_, _, _, true) if within_x => Some(HandlePosition::Bottom),
            (true, _, _, _) if within_y => Some(HandlePosition::Left),
            (_, true, _, _) if within_y => Some(HandlePosition::Right),
            _ => None,
        }
    }

    /// Translates the selection, keeping it inside the image.
    ///
    /// A non-finite delta leaves the selection unchanged.
    #[must_use]
    pub fn moved_by(&self, dx: f32, dy: f32) -> Self {
        if !(dx.is_finite() && dy.is_finite()) {
            return *self;
        }
        Self {
            x: (self.x + dx).clamp(0.0, FULL - self.width),
            y: (self.y + dy).clamp(0.0, FULL - self.height),
            ..*self
        }
    }

    /// Resizes the selection by dragging `handle` by (`dx`, `dy`) percent.
    ///
    /// With an aspect lock only corner handles resize; the ratio is kept in
    /// rendered pixels, which is why the render size is needed. A non-finite
    /// delta leaves the selection unchanged.
    #[must_use]
    pub fn resized(&self, handle: HandlePosition, dx: f32, dy: f32, size: RenderSize) -> Self {
        if !(dx.is_finite() && dy.is_finite()) {
            return *self;
        }
        match self.aspect {
            Some(aspect) => self.resized_locked(handle, dx, dy, aspect.value() / size.aspect()),
            None => self.resized_free(handle, dx, dy),
        }
    }

    fn resized_free(&self, handle: HandlePosition, dx: f32, dy: f32) -> Self {
        let min = MIN_CROP_EXTENT_PERCENT;
        let (mut left, mut top, mut right, mut bottom) =
            (self.x, self.y, self.right(), self.bottom());

        if handle.moves_left() {
            left = (self.x + dx).clamp(0.0, (right - min).max(0.0));
        }
        if handle.moves_right() {
            right = (right + dx).clamp((self.x + min).min(FULL), FULL);
        }
        if handle.moves_top() {
            top = (self.y + dy).clamp(0.0, (bottom - min).max(0.0));
        }
        if handle.moves_bottom() {
            bottom = (bottom + dy).clamp((self.y + min).min(FULL), FULL);
        }

        Self {
            x: left,
            y: top,
            width: right - left,
            height: bottom - top,
            aspect: None,
        }
    }

    // `ratio` is width% / height% for the locked pixel aspect.
    fn resized_locked(&self, handle: HandlePosition, dx: f32, dy: f32, ratio: f32) -> Self {
        if !handle.is_corner() {
            return *self;
        }

        let from_left = handle.moves_left();
        let from_top = handle.moves_top();
        let anchor_x = if from_left { self.right() } else { self.x };
        let anchor_y = if from_top { self.bottom() } else { self.y };

        let by_width = if from_left { self.width - dx } else { self.width + dx };
        let by_height = (if from_top { self.height - dy } else { self.height + dy }) * ratio;

        let max_width = if from_left { anchor_x } else { FULL - anchor_x };
        let max_height = if from_top { anchor_y } else { FULL - anchor_y };

        let width = by_width
            .max(by_height)
            .max(MIN_CROP_EXTENT_PERCENT)
            .min(max_width)
            .min(max_height * ratio);
        let height = width / ratio;

        Self {
            x: if from_left { (anchor_x - width).max(0.0) } else { anchor_x },
            y: if from_top { (anchor_y - height).max(0.0) } else { anchor_y },
            width,
            height,
            aspect: self.aspect,
        }
    }

    /// Maps the selection to source pixels.
    ///
    /// Each axis uses `scale = natural / rendered`; every edge is rounded to
    /// the nearest pixel and the origin is pulled back so the rectangle
    /// stays inside the source. Returns `None` for an empty source.
    #[must_use]
    pub fn to_pixel_rect(&self, rendered: RenderSize, natural: (u32, u32)) -> Option<PixelRect> {
        let (natural_width, natural_height) = natural;
        if natural_width == 0 || natural_height == 0 {
            return None;
        }

        let scale_x = f64::from(natural_width) / f64::from(rendered.width());
        let scale_y = f64::from(natural_height) / f64::from(rendered.height());
        let to_px = |percent: f32, extent: f32, scale: f64| {
            f64::from(percent) / f64::from(FULL) * f64::from(extent) * scale
        };

        let width = round_px(to_px(self.width, rendered.width(), scale_x)).clamp(1, natural_width);
        let height =
            round_px(to_px(self.height, rendered.height(), scale_y)).clamp(1, natural_height);
        let x = round_px(to_px(self.x, rendered.width(), scale_x)).min(natural_width - width);
        let y = round_px(to_px(self.y, rendered.height(), scale_y)).min(natural_height - height);

        Some(PixelRect {
            x,
            y,
            width,
            height,
        })
    }
}

fn round_px(value: f64) -> u32 {
    let value = value.round().clamp(0.0, f64::from(u32::MAX));
    // The clamp guarantees the value fits in u32
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let px = value as u32;
    px
}

// =============================================================================
// Tests
// =============================================================================
