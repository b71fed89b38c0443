// SPDX-License-Identifier: MPL-2.0
//! Core media types for the domain layer.
//!
//! These types represent pure data without any presentation dependencies.

use crate::domain::upload::SelectedFile;
use std::fmt;

/// Opaque, revocable reference to image bytes held by an image store.
///
/// A handle renders an image without exposing where the bytes came from.
/// Handles are never reused, so a revoked handle stays dead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageHandle(u64);

impl ImageHandle {
    #[must_use]
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "image:{}", self.0)
    }
}

/// The image carried through the workflow.
///
/// `current` is what the user sees and what gets captioned; `original` is the
/// upload as received, kept so that cropping always starts from full
/// resolution. Both are the same handle until the first crop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    source_file: Option<SelectedFile>,
    current: ImageHandle,
    original: ImageHandle,
}

impl UploadedImage {
    /// A freshly uploaded image: current and original are the same handle.
    #[must_use]
    pub fn new(source_file: Option<SelectedFile>, handle: ImageHandle) -> Self {
        Self {
            source_file,
            current: handle,
            original: handle,
        }
    }

    #[must_use]
    pub fn source_file(&self) -> Option<&SelectedFile> {
        self.source_file.as_ref()
    }

    #[must_use]
    pub fn current(&self) -> ImageHandle {
        self.current
    }

    #[must_use]
    pub fn original(&self) -> ImageHandle {
        self.original
    }

    /// Whether a crop has replaced the displayed image.
    #[must_use]
    pub fn is_cropped(&self) -> bool {
        self.current != self.original
    }

    /// Swaps in a new displayed image, returning the handle it supersedes
    /// when that handle is no longer referenced.
    pub fn replace_current(&mut self, handle: ImageHandle) -> Option<ImageHandle> {
        let previous = std::mem::replace(&mut self.current, handle);
        (previous != self.original && previous != handle).then_some(previous)
    }

    /// Every distinct handle held by this image.
    #[must_use]
    pub fn handles(&self) -> Vec<ImageHandle> {
        if self.is_cropped() {
            vec![self.current, self.original]
        } else {
            vec![self.current]
        }
    }
}
