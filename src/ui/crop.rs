// SPDX-License-Identifier: MPL-2.0
//! Crop surface: interactive selection over the original upload.
//!
//! Coordinates in messages are percent of the rendered image. The surface
//! keeps two selections: the draft follows the pointer while dragging, the
//! committed one is what `Apply` crops. Apply always reads the source handle
//! it was opened with and registers the result as a new handle.

use crate::config::CROP_HANDLE_RADIUS_PERCENT;
use crate::domain::editing::{AspectPreset, CropSelection, HandlePosition, RenderSize};
use crate::domain::media::ImageHandle;
use crate::media::{apply_crop, ImageStore, CROP_OUTPUT_MEDIA_TYPE};

/// Pointer drag in progress over the crop overlay.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CropDragState {
    /// No active drag
    #[default]
    None,
    /// Dragging the entire rectangle
    Moving {
        start: CropSelection,
        start_cursor: (f32, f32),
    },
    /// Dragging a resize handle
    Resizing {
        handle: HandlePosition,
        start: CropSelection,
        start_cursor: (f32, f32),
    },
}

/// State of the crop surface.
#[derive(Debug, Clone)]
pub struct State {
    source: ImageHandle,
    rendered: Option<RenderSize>,
    preset: AspectPreset,
    draft: Option<CropSelection>,
    committed: Option<CropSelection>,
    drag: CropDragState,
    last_error: Option<String>,
}

/// Messages emitted by the crop overlay.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// The source image finished rendering at this size (in display pixels).
    ImageLoaded {
        rendered_width: f32,
        rendered_height: f32,
    },
    SetAspect(AspectPreset),
    /// Replaces the selection outright, as typed coordinates would.
    SetSelection(CropSelection),
    DragStart {
        x: f32,
        y: f32,
    },
    DragMove {
        x: f32,
        y: f32,
    },
    DragEnd,
    Apply,
    Cancel,
}

/// Events propagated to the step controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    None,
    /// A cropped PNG was registered under this handle.
    Cropped(ImageHandle),
    Cancelled,
}

impl State {
    /// Opens the surface over `source`.
    #[must_use]
    pub fn open(source: ImageHandle) -> Self {
        Self {
            source,
            rendered: None,
            preset: AspectPreset::Square,
            draft: None,
            committed: None,
            drag: CropDragState::None,
            last_error: None,
        }
    }

    #[must_use]
    pub fn source(&self) -> ImageHandle {
        self.source
    }

    #[must_use]
    pub fn preset(&self) -> AspectPreset {
        self.preset
    }

    #[must_use]
    pub fn draft(&self) -> Option<&CropSelection> {
        self.draft.as_ref()
    }

    #[must_use]
    pub fn committed(&self) -> Option<&CropSelection> {
        self.committed.as_ref()
    }

    #[must_use]
    pub fn drag_state(&self) -> CropDragState {
        self.drag
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Update the state and emit an [`Event`] for the parent when needed.
    pub fn update(&mut self, message: Message, store: &mut ImageStore) -> Event {
        match message {
            Message::ImageLoaded {
                rendered_width,
                rendered_height,
            } => {
                self.handle_image_loaded(rendered_width, rendered_height);
                Event::None
            }
            Message::SetAspect(preset) => {
                self.handle_set_aspect(preset);
                Event::None
            }
            Message::SetSelection(selection) => {
                self.handle_set_selection(selection);
                Event::None
            }
            Message::DragStart { x, y } => {
                self.handle_drag_start(x, y);
                Event::None
            }
            Message::DragMove { x, y } => {
                self.handle_drag_move(x, y);
                Event::None
            }
            Message::DragEnd => {
                self.handle_drag_end();
                Event::None
            }
            Message::Apply => self.handle_apply(store),
            Message::Cancel => Event::Cancelled,
        }
    }

    fn handle_image_loaded(&mut self, width: f32, height: f32) {
        let Some(size) = RenderSize::new(width, height) else {
            log::debug!("Ignoring crop render size {width}x{height}");
            return;
        };
        self.rendered = Some(size);
        self.preset = AspectPreset::Square;
        self.drag = CropDragState::None;
        self.set_selection(CropSelection::for_preset(AspectPreset::Square, size));
    }

    fn handle_set_aspect(&mut self, preset: AspectPreset) {
        let Some(size) = self.rendered else {
            log::debug!("Ignoring aspect preset before the image is loaded");
            return;
        };
        self.preset = preset;
        self.drag = CropDragState::None;
        self.set_selection(CropSelection::for_preset(preset, size));
    }

    fn handle_set_selection(&mut self, selection: CropSelection) {
        if self.rendered.is_none() {
            log::debug!("Ignoring selection before the image is loaded");
            return;
        }
        if selection.aspect().is_none() {
            self.preset = AspectPreset::Free;
        }
        self.drag = CropDragState::None;
        self.set_selection(selection);
    }

    fn set_selection(&mut self, selection: CropSelection) {
        self.draft = Some(selection);
        self.committed = Some(selection);
    }

    fn handle_drag_start(&mut self, x: f32, y: f32) {
        let Some(selection) = self.draft else {
            return;
        };
        if !(x.is_finite() && y.is_finite()) {
            log::debug!("Ignoring drag start at non-finite point ({x}, {y})");
            return;
        }
        let start_cursor = (x, y);

        self.drag = if let Some(handle) = selection.handle_at(x, y, CROP_HANDLE_RADIUS_PERCENT) {
            CropDragState::Resizing {
                handle,
                start: selection,
                start_cursor,
            }
        } else if selection.contains(x, y) {
            CropDragState::Moving {
                start: selection,
                start_cursor,
            }
        } else {
            CropDragState::None
        };
    }

    fn handle_drag_move(&mut self, x: f32, y: f32) {
        let Some(size) = self.rendered else {
            return;
        };
        if !(x.is_finite() && y.is_finite()) {
            log::debug!("Ignoring drag move to non-finite point ({x}, {y})");
            return;
        }
        let next = match self.drag {
            CropDragState::None => return,
            CropDragState::Moving {
                start,
                start_cursor,
            } => start.moved_by(x - start_cursor.0, y - start_cursor.1),
            CropDragState::Resizing {
                handle,
                start,
                start_cursor,
            } => start.resized(handle, x - start_cursor.0, y - start_cursor.1, size),
        };
        self.draft = Some(next);
    }

    fn handle_drag_end(&mut self) {
        if self.drag == CropDragState::None {
            return;
        }
        self.drag = CropDragState::None;
        self.committed = self.draft;
    }

    fn handle_apply(&mut self, store: &mut ImageStore) -> Event {
        let (Some(selection), Some(rendered)) = (self.committed, self.rendered) else {
            return Event::None;
        };
        let Some(source) = store.get(self.source) else {
            log::warn!("Crop source {} is no longer available", self.source);
            self.last_error = Some("Image is no longer available".to_string());
            return Event::None;
        };

        match apply_crop(source.bytes(), &selection, rendered) {
            Ok(cropped) => {
                self.last_error = None;
                let handle = store.create(cropped.bytes.into(), CROP_OUTPUT_MEDIA_TYPE);
                log::debug!(
                    "Crop applied: {}x{} as {handle}",
                    cropped.width,
                    cropped.height
                );
                Event::Cropped(handle)
            }
            Err(e) => {
                log::warn!("Crop failed: {e}");
                self.last_error = Some(e.to_string());
                Event::None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{assert_abs_diff_eq, png_bytes};
    use std::sync::Arc;

    fn opened(width: u32, height: u32) -> (State, ImageStore) {
        let mut store = ImageStore::new();
        let source = store.create(png_bytes(width, height).into(), "image/png");
        (State::open(source), store)
    }

    fn loaded(rendered_width: f32, rendered_height: f32, store: &mut ImageStore, state: &mut State) {
        state.update(
            Message::ImageLoaded {
                rendered_width,
                rendered_height,
            },
            store,
        );
    }

    #[test]
    fn image_loaded_sets_centered_square() {
        let (mut state, mut store) = opened(400, 200);
        loaded(400.0, 200.0, &mut store, &mut state);

        let draft = *state.draft().unwrap();
        assert_eq!(state.committed(), Some(&draft));
        // Largest square is 200x200; 90% of it is 180px = 45% wide, 90% high.
        assert_abs_diff_eq!(draft.width(), 45.0, epsilon = 1e-3);
        assert_abs_diff_eq!(draft.height(), 90.0, epsilon = 1e-3);
        assert_abs_diff_eq!(draft.x(), 27.5, epsilon = 1e-3);
        assert_abs_diff_eq!(draft.y(), 5.0, epsilon = 1e-3);
    }

    #[test]
    fn set_aspect_before_load_is_ignored() {
        let (mut state, mut store) = opened(100, 100);
        state.update(Message::SetAspect(AspectPreset::Free), &mut store);
        assert!(state.draft().is_none());
        assert_eq!(state.preset(), AspectPreset::Square);
    }

    #[test]
    fn free_preset_resets_both_selections() {
        let (mut state, mut store) = opened(100, 100);
        loaded(100.0, 100.0, &mut store, &mut state);
        state.update(Message::SetAspect(AspectPreset::Free), &mut store);

        assert_eq!(state.draft(), Some(&CropSelection::free()));
        assert_eq!(state.committed(), Some(&CropSelection::free()));
        assert!(state.committed().unwrap().aspect().is_none());
    }

    #[test]
    fn explicit_selection_replaces_both_and_switches_to_free() {
        let (mut state, mut store) = opened(100, 100);
        let selection = CropSelection::new(10.0, 20.0, 50.0, 40.0, None).unwrap();

        state.update(Message::SetSelection(selection), &mut store);
        assert!(state.committed().is_none());

        loaded(100.0, 100.0, &mut store, &mut state);
        state.update(Message::SetSelection(selection), &mut store);
        assert_eq!(state.draft(), Some(&selection));
        assert_eq!(state.committed(), Some(&selection));
        assert_eq!(state.preset(), AspectPreset::Free);
    }

    #[test]
    fn apply_without_selection_is_noop() {
        let (mut state, mut store) = opened(100, 100);
        assert_eq!(state.update(Message::Apply, &mut store), Event::None);
        assert_eq!(store.live_count(), 1);
        assert!(state.last_error().is_none());
    }

    #[test]
    fn apply_crops_original_pixels_and_keeps_source() {
        // Natural 2000x1000 rendered at 500x250.
        let (mut state, mut store) = opened(2000, 1000);
        loaded(500.0, 250.0, &mut store, &mut state);
        state.update(Message::SetAspect(AspectPreset::Free), &mut store);

        let Event::Cropped(handle) = state.update(Message::Apply, &mut store) else {
            panic!("expected Cropped");
        };
        assert!(store.contains(state.source()));
        let stored = store.get(handle).unwrap();
        assert_eq!(stored.media_type(), "image/png");

        let image = image_rs::load_from_memory(stored.bytes()).unwrap();
        assert_eq!((image.width(), image.height()), (1800, 900));
    }

    #[test]
    fn apply_reports_undecodable_source() {
        let mut store = ImageStore::new();
        let source = store.create(Arc::from(&b"garbage"[..]), "image/png");
        let mut state = State::open(source);
        loaded(10.0, 10.0, &mut store, &mut state);

        assert_eq!(state.update(Message::Apply, &mut store), Event::None);
        assert!(state.last_error().is_some());
        assert_eq!(store.live_count(), 1);
    }

    #[test]
    fn cancel_touches_nothing() {
        let (mut state, mut store) = opened(10, 10);
        assert_eq!(state.update(Message::Cancel, &mut store), Event::Cancelled);
        assert_eq!(store.live_count(), 1);
    }

    #[test]
    fn dragging_interior_moves_draft_then_commits() {
        let (mut state, mut store) = opened(100, 100);
        loaded(100.0, 100.0, &mut store, &mut state);
        state.update(Message::SetAspect(AspectPreset::Free), &mut store);

        state.update(Message::DragStart { x: 50.0, y: 50.0 }, &mut store);
        assert!(matches!(state.drag_state(), CropDragState::Moving { .. }));
        state.update(Message::DragMove { x: 48.0, y: 47.0 }, &mut store);

        let draft = *state.draft().unwrap();
        assert_abs_diff_eq!(draft.x(), 3.0, epsilon = 1e-4);
        assert_abs_diff_eq!(draft.y(), 2.0, epsilon = 1e-4);
        assert_eq!(state.committed(), Some(&CropSelection::free()));

        state.update(Message::DragEnd, &mut store);
        assert_eq!(state.committed(), Some(&draft));
        assert_eq!(state.drag_state(), CropDragState::None);
    }

    #[test]
    fn dragging_corner_resizes_draft() {
        let (mut state, mut store) = opened(100, 100);
        loaded(100.0, 100.0, &mut store, &mut state);
        state.update(Message::SetAspect(AspectPreset::Free), &mut store);

        state.update(Message::DragStart { x: 95.0, y: 95.0 }, &mut store);
        assert!(matches!(
            state.drag_state(),
            CropDragState::Resizing {
                handle: HandlePosition::BottomRight,
                ..
            }
        ));
        state.update(Message::DragMove { x: 75.0, y: 85.0 }, &mut store);

        let draft = state.draft().unwrap();
        assert_abs_diff_eq!(draft.width(), 70.0, epsilon = 1e-4);
        assert_abs_diff_eq!(draft.height(), 80.0, epsilon = 1e-4);
    }

    #[test]
    fn non_finite_drag_points_are_ignored() {
        let (mut state, mut store) = opened(100, 100);
        loaded(100.0, 100.0, &mut store, &mut state);
        state.update(Message::SetAspect(AspectPreset::Free), &mut store);

        state.update(Message::DragStart { x: f32::NAN, y: 50.0 }, &mut store);
        assert_eq!(state.drag_state(), CropDragState::None);

        state.update(Message::DragStart { x: 50.0, y: 50.0 }, &mut store);
        state.update(Message::DragMove { x: f32::NAN, y: 50.0 }, &mut store);
        state.update(Message::DragMove { x: 50.0, y: f32::INFINITY }, &mut store);
        state.update(Message::DragEnd, &mut store);

        assert_eq!(state.draft(), Some(&CropSelection::free()));
        assert_eq!(state.committed(), Some(&CropSelection::free()));
    }

    #[test]
    fn drag_outside_selection_does_nothing() {
        let (mut state, mut store) = opened(100, 100);
        loaded(100.0, 100.0, &mut store, &mut state);
        let before = *state.draft().unwrap();

        state.update(Message::DragStart { x: 1.0, y: 50.0 }, &mut store);
        state.update(Message::DragMove { x: 30.0, y: 50.0 }, &mut store);
        state.update(Message::DragEnd, &mut store);
        assert_eq!(state.draft(), Some(&before));
        assert_eq!(state.committed(), Some(&before));
    }

    #[test]
    fn invalid_render_size_is_ignored() {
        let (mut state, mut store) = opened(10, 10);
        loaded(0.0, 10.0, &mut store, &mut state);
        assert!(state.draft().is_none());
    }
}
