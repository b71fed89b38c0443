// SPDX-License-Identifier: MPL-2.0
//! Session-scoped registry of displayable images.
//!
//! Every upload and every crop result is registered here and addressed through
//! an [`ImageHandle`]. Handles are revoked explicitly by their owner; ids are
//! never reused, so a stale handle cannot alias a newer image.

use crate::domain::media::ImageHandle;
use std::collections::HashMap;
use std::sync::Arc;

/// Bytes and media type behind a handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    media_type: String,
    bytes: Arc<[u8]>,
}

impl StoredImage {
    #[must_use]
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    #[must_use]
    pub fn bytes(&self) -> &Arc<[u8]> {
        &self.bytes
    }
}

/// Registry mapping live handles to image bytes.
#[derive(Debug, Default)]
pub struct ImageStore {
    next_id: u64,
    entries: HashMap<ImageHandle, StoredImage>,
}

impl ImageStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `bytes` and returns a fresh handle for them.
    pub fn create(&mut self, bytes: Arc<[u8]>, media_type: impl Into<String>) -> ImageHandle {
        self.next_id += 1;
        let handle = ImageHandle::from_raw(self.next_id);
        let image = StoredImage {
            media_type: media_type.into(),
            bytes,
        };
        log::debug!(
            "registered {handle} ({}, {} bytes)",
            image.media_type,
            image.bytes.len()
        );
        self.entries.insert(handle, image);
        handle
    }

    #[must_use]
    pub fn get(&self, handle: ImageHandle) -> Option<&StoredImage> {
        self.entries.get(&handle)
    }

    #[must_use]
    pub fn contains(&self, handle: ImageHandle) -> bool {
        self.entries.contains_key(&handle)
    }

    /// Releases `handle`. Returns `false` if it was already released.
    pub fn revoke(&mut self, handle: ImageHandle) -> bool {
        let removed = self.entries.remove(&handle).is_some();
        if removed {
            log::debug!("revoked {handle}");
        }
        removed
    }

    /// Number of handles currently alive.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.entries.len()
    }
}
