// SPDX-License-Identifier: MPL-2.0
//! Step controller: the single owner of workflow state.
//!
//! The controller owns the image store, the current [`WorkflowStep`], the
//! crop overlay (when open) and the sub-surface states. It routes messages to
//! the surface that is active, applies step transitions and revokes every
//! handle a transition makes unreachable. Outside a crop in progress, at most
//! two handles (current and original) are alive.

use crate::domain::media::{ImageHandle, UploadedImage};
use crate::domain::workflow::{StepKind, Transition, WorkflowStep};
use crate::media::{ImageStore, StoredImage};
use crate::ui::captions::{self, PendingGeneration};
use crate::ui::crop;
use crate::ui::upload;

/// Messages routed by the controller.
#[derive(Debug, Clone)]
pub enum Message {
    Upload(upload::Message),
    /// Open the crop overlay over the original upload.
    OpenCrop,
    Crop(crop::Message),
    /// Move from upload to caption selection.
    Proceed,
    /// Return from caption selection to upload.
    Back,
    Captions(captions::Message),
    /// Leave the editor and start again with no image.
    StartOver,
    /// Discard the uploaded image.
    Remove,
}

impl From<upload::Message> for Message {
    fn from(message: upload::Message) -> Self {
        Message::Upload(message)
    }
}

impl From<crop::Message> for Message {
    fn from(message: crop::Message) -> Self {
        Message::Crop(message)
    }
}

impl From<captions::Message> for Message {
    fn from(message: captions::Message) -> Self {
        Message::Captions(message)
    }
}

/// Events the host must act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    None,
    /// Run this request and feed the result back as a captions message.
    GenerationRequested(PendingGeneration),
    /// The editor step was entered with this caption.
    EditorEntered { caption: String },
}

/// Workflow state container.
#[derive(Debug, Default)]
pub struct Controller {
    store: ImageStore,
    step: WorkflowStep,
    upload: upload::State,
    crop: Option<crop::State>,
    captions: captions::State,
}

impl Controller {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn step(&self) -> &WorkflowStep {
        &self.step
    }

    #[must_use]
    pub fn store(&self) -> &ImageStore {
        &self.store
    }

    #[must_use]
    pub fn upload(&self) -> &upload::State {
        &self.upload
    }

    #[must_use]
    pub fn crop(&self) -> Option<&crop::State> {
        self.crop.as_ref()
    }

    #[must_use]
    pub fn captions(&self) -> &captions::State {
        &self.captions
    }

    /// Bytes of the displayed image, if the step has one.
    #[must_use]
    pub fn current_image(&self) -> Option<&StoredImage> {
        self.step
            .image()
            .and_then(|image| self.store.get(image.current()))
    }

    /// Update the state and emit an [`Event`] for the host when needed.
    pub fn update(&mut self, message: Message) -> Event {
        match message {
            Message::Upload(msg) => self.handle_upload(msg),
            Message::OpenCrop => self.handle_open_crop(),
            Message::Crop(msg) => self.handle_crop(msg),
            Message::Proceed => {
                if self.crop.is_some() {
                    log::debug!("Ignoring proceed while the crop overlay is open");
                } else if self.transition(Transition::Proceed) {
                    self.captions.reset();
                }
                Event::None
            }
            Message::Back => {
                if self.transition(Transition::Back) {
                    self.captions.cancel_pending();
                }
                Event::None
            }
            Message::Captions(msg) => self.handle_captions(msg),
            Message::StartOver => {
                if self.transition(Transition::StartOver) {
                    self.captions.reset();
                }
                Event::None
            }
            Message::Remove => {
                if self.transition(Transition::Remove) {
                    self.crop = None;
                    self.captions.cancel_pending();
                }
                Event::None
            }
        }
    }

    fn handle_upload(&mut self, message: upload::Message) -> Event {
        if self.step.kind() != StepKind::Upload {
            log::debug!("Ignoring upload message in the {} step", self.step.kind());
            return Event::None;
        }

        if let upload::Event::ImageSelected { file, handle } =
            self.upload.update(message, &mut self.store)
        {
            let image = UploadedImage::new(Some(file), handle);
            if self.transition(Transition::SelectImage(image)) {
                self.crop = None;
            } else {
                self.store.revoke(handle);
            }
        }
        Event::None
    }

    fn handle_open_crop(&mut self) -> Event {
        if self.crop.is_none() {
            if let WorkflowStep::Upload { image: Some(image) } = &self.step {
                self.crop = Some(crop::State::open(image.original()));
                return Event::None;
            }
        }
        log::debug!("Ignoring crop request in the {} step", self.step.kind());
        Event::None
    }

    fn handle_crop(&mut self, message: crop::Message) -> Event {
        let Some(overlay) = self.crop.as_mut() else {
            log::debug!("Ignoring crop message with no crop overlay open");
            return Event::None;
        };

        match overlay.update(message, &mut self.store) {
            crop::Event::None => {}
            crop::Event::Cancelled => self.crop = None,
            crop::Event::Cropped(handle) => {
                self.crop = None;
                if !self.transition(Transition::ReplaceDisplay(handle)) {
                    self.store.revoke(handle);
                }
            }
        }
        Event::None
    }

    fn handle_captions(&mut self, message: captions::Message) -> Event {
        if self.step.kind() != StepKind::Caption {
            log::debug!("Ignoring caption message in the {} step", self.step.kind());
            return Event::None;
        }

        let image = self
            .step
            .image()
            .and_then(|image| self.store.get(image.current()));
        match self.captions.update(message, image) {
            captions::Event::None => Event::None,
            captions::Event::GenerationRequested(pending) => Event::GenerationRequested(pending),
            captions::Event::CaptionChosen(caption) => {
                if self.transition(Transition::ChooseCaption(caption.clone())) {
                    Event::EditorEntered { caption }
                } else {
                    Event::None
                }
            }
        }
    }

    /// Applies `transition` and revokes what it releases. Returns whether the
    /// step changed.
    fn transition(&mut self, transition: Transition) -> bool {
        match self.step.apply(transition) {
            Ok(released) => {
                self.release(&released);
                true
            }
            Err(e) => {
                log::debug!("{e}; ignored");
                false
            }
        }
    }

    fn release(&mut self, handles: &[ImageHandle]) {
        for &handle in handles {
            self.store.revoke(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::editing::AspectPreset;
    use crate::domain::upload::SelectedFile;
    use crate::test_utils::png_bytes;

    fn png_file(name: &str, width: u32, height: u32) -> SelectedFile {
        SelectedFile::new(name, "image/png", png_bytes(width, height))
    }

    fn with_upload() -> Controller {
        let mut controller = Controller::new();
        controller.update(upload::Message::FileChosen(vec![png_file("a.png", 20, 10)]).into());
        controller
    }

    fn crop_free(controller: &mut Controller) {
        controller.update(Message::OpenCrop);
        controller.update(
            crop::Message::ImageLoaded {
                rendered_width: 20.0,
                rendered_height: 10.0,
            }
            .into(),
        );
        controller.update(crop::Message::SetAspect(AspectPreset::Free).into());
        controller.update(crop::Message::Apply.into());
    }

    fn at_caption_with_captions() -> (Controller, captions::RequestTicket) {
        let mut controller = with_upload();
        controller.update(Message::Proceed);
        let Event::GenerationRequested(pending) =
            controller.update(captions::Message::Generate.into())
        else {
            panic!("expected generation request");
        };
        (controller, pending.ticket)
    }

    #[test]
    fn upload_stores_image_in_upload_step() {
        let controller = with_upload();
        assert_eq!(controller.step().kind(), StepKind::Upload);
        assert!(controller.step().image().is_some());
        assert_eq!(controller.store().live_count(), 1);
    }

    #[test]
    fn new_upload_releases_previous_image() {
        let mut controller = with_upload();
        crop_free(&mut controller);
        assert_eq!(controller.store().live_count(), 2);

        controller.update(upload::Message::Drop(vec![png_file("b.png", 4, 4)]).into());
        assert_eq!(controller.store().live_count(), 1);
        let image = controller.step().image().unwrap();
        assert_eq!(image.source_file().unwrap().name(), "b.png");
    }

    #[test]
    fn crop_replaces_display_and_keeps_original() {
        let mut controller = with_upload();
        let original = controller.step().image().unwrap().original();
        crop_free(&mut controller);

        let image = controller.step().image().unwrap();
        assert!(image.is_cropped());
        assert_eq!(image.original(), original);
        assert!(controller.crop().is_none());
        assert_eq!(controller.current_image().unwrap().media_type(), "image/png");
    }

    #[test]
    fn recrop_starts_from_original_and_releases_previous_crop() {
        let mut controller = with_upload();
        crop_free(&mut controller);
        let first_crop = controller.step().image().unwrap().current();

        controller.update(Message::OpenCrop);
        let source = controller.crop().unwrap().source();
        assert_eq!(source, controller.step().image().unwrap().original());

        controller.update(
            crop::Message::ImageLoaded {
                rendered_width: 20.0,
                rendered_height: 10.0,
            }
            .into(),
        );
        controller.update(crop::Message::Apply.into());
        assert!(!controller.store().contains(first_crop));
        assert_eq!(controller.store().live_count(), 2);
    }

    #[test]
    fn cancel_crop_touches_nothing() {
        let mut controller = with_upload();
        controller.update(Message::OpenCrop);
        controller.update(crop::Message::Cancel.into());
        assert!(controller.crop().is_none());
        assert!(!controller.step().image().unwrap().is_cropped());
        assert_eq!(controller.store().live_count(), 1);
    }

    #[test]
    fn proceed_without_image_is_ignored() {
        let mut controller = Controller::new();
        controller.update(Message::Proceed);
        assert_eq!(controller.step().kind(), StepKind::Upload);
    }

    #[test]
    fn proceed_is_blocked_while_cropping() {
        let mut controller = with_upload();
        controller.update(Message::OpenCrop);
        controller.update(Message::Proceed);
        assert_eq!(controller.step().kind(), StepKind::Upload);
    }

    #[test]
    fn remove_releases_all_handles() {
        let mut controller = with_upload();
        crop_free(&mut controller);
        controller.update(Message::Remove);
        assert!(controller.step().image().is_none());
        assert_eq!(controller.store().live_count(), 0);
    }

    #[test]
    fn back_invalidates_in_flight_request() {
        let (mut controller, ticket) = at_caption_with_captions();
        controller.update(Message::Back);
        assert_eq!(controller.step().kind(), StepKind::Upload);
        assert!(controller.step().image().is_some());
        assert!(!controller.captions().is_loading());

        controller.update(Message::Proceed);
        controller.update(
            captions::Message::Generated {
                ticket,
                result: Ok(vec!["late".into()]),
            }
            .into(),
        );
        assert!(controller.captions().captions().is_empty());
    }

    #[test]
    fn choosing_caption_enters_editor() {
        let (mut controller, ticket) = at_caption_with_captions();
        controller.update(
            captions::Message::Generated {
                ticket,
                result: Ok(vec!["A".into(), "B".into()]),
            }
            .into(),
        );
        controller.update(captions::Message::SelectCaption(1).into());
        let event = controller.update(captions::Message::Proceed.into());

        assert_eq!(
            event,
            Event::EditorEntered {
                caption: "B".to_string()
            }
        );
        assert_eq!(controller.step().caption(), Some("B"));
    }

    #[test]
    fn start_over_clears_everything() {
        let (mut controller, ticket) = at_caption_with_captions();
        controller.update(
            captions::Message::Generated {
                ticket,
                result: Ok(vec!["A".into()]),
            }
            .into(),
        );
        controller.update(captions::Message::SelectCaption(0).into());
        controller.update(captions::Message::Proceed.into());

        controller.update(Message::StartOver);
        assert_eq!(*controller.step(), WorkflowStep::default());
        assert_eq!(controller.store().live_count(), 0);
        assert!(controller.captions().captions().is_empty());
    }

    #[test]
    fn messages_for_inactive_surfaces_are_ignored() {
        let (mut controller, _) = at_caption_with_captions();
        controller.update(upload::Message::Drop(vec![png_file("c.png", 2, 2)]).into());
        controller.update(Message::OpenCrop);
        controller.update(Message::Remove);
        assert_eq!(controller.step().kind(), StepKind::Caption);
        assert!(controller.crop().is_none());
        assert_eq!(controller.store().live_count(), 1);
    }
}
