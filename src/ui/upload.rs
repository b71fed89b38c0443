// SPDX-License-Identifier: MPL-2.0
//! Upload surface: drag-and-drop and file-picker intake.
//!
//! The surface validates the first offered file, registers accepted files in
//! the image store and reports them upward. It never revokes a handle; the
//! step controller owns every handle it is given.

use crate::domain::media::ImageHandle;
use crate::domain::upload::{validate, FileMeta, SelectedFile, ValidationError};
use crate::media::ImageStore;

/// State of the upload surface.
#[derive(Debug, Clone, Default)]
pub struct State {
    is_dragging: bool,
    last_error: Option<ValidationError>,
}

/// Messages emitted by the upload surface.
#[derive(Debug, Clone)]
pub enum Message {
    DragEnter,
    DragOver,
    DragLeave,
    /// Files dropped on the surface.
    Drop(Vec<SelectedFile>),
    /// Files picked through the file dialog.
    FileChosen(Vec<SelectedFile>),
}

/// Events propagated to the step controller.
#[derive(Debug, Clone)]
pub enum Event {
    None,
    /// A file passed validation and was registered.
    ImageSelected {
        file: SelectedFile,
        handle: ImageHandle,
    },
}

impl State {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    #[must_use]
    pub fn last_error(&self) -> Option<ValidationError> {
        self.last_error
    }

    /// Inline error text, if the last offered file was refused.
    #[must_use]
    pub fn error_message(&self) -> Option<&'static str> {
        self.last_error.map(ValidationError::message)
    }

    /// Update the state and emit an [`Event`] for the parent when needed.
    pub fn update(&mut self, message: Message, store: &mut ImageStore) -> Event {
        match message {
            Message::DragEnter | Message::DragOver => {
                self.is_dragging = true;
                Event::None
            }
            Message::DragLeave => {
                self.is_dragging = false;
                Event::None
            }
            Message::Drop(files) | Message::FileChosen(files) => {
                self.is_dragging = false;
                self.accept_first(files, store)
            }
        }
    }

    fn accept_first(&mut self, files: Vec<SelectedFile>, store: &mut ImageStore) -> Event {
        let Some(file) = files.into_iter().next() else {
            return Event::None;
        };
        self.last_error = None;

        if let Some(error) = validate(&file) {
            log::debug!("Refused upload '{}': {error}", file.name());
            self.last_error = Some(error);
            return Event::None;
        }

        let handle = store.create(file.bytes().clone(), file.media_type());
        Event::ImageSelected { file, handle }
    }
}
