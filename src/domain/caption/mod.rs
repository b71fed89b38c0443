// SPDX-License-Identifier: MPL-2.0
//! Caption domain types.
//!
//! - [`Tone`]: Closed set of caption tones, each with its prompt instruction
//! - [`CaptionSet`]: Captions returned by one generation, with the user's pick

mod tone;

pub use tone::{Tone, UnknownTone};

/// Ordered captions produced by one generation request.
///
/// A set is replaced wholesale on regeneration; at most one caption is
/// selected at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptionSet {
    captions: Vec<String>,
    selected: Option<usize>,
}

impl CaptionSet {
    #[must_use]
    pub fn new(captions: Vec<String>) -> Self {
        Self {
            captions,
            selected: None,
        }
    }

    #[must_use]
    pub fn captions(&self) -> &[String] {
        &self.captions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.captions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.captions.is_empty()
    }

    /// Marks the caption at `index` as selected.
    ///
    /// Returns `false` (and keeps the previous selection) for an out-of-range index.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.captions.len() {
            self.selected = Some(index);
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected
            .and_then(|index| self.captions.get(index))
            .map(String::as_str)
    }
}
