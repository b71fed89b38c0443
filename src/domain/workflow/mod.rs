// SPDX-License-Identifier: MPL-2.0
//! Workflow step state machine.
//!
//! The workflow moves an image through three steps: upload (with an optional
//! crop), caption selection, and the editor. Each step carries exactly the data
//! it needs, so an editor without an image cannot be constructed.
//!
//! Transitions report the image handles they make unreachable. The caller owns
//! the image store and is responsible for revoking them.

use crate::domain::media::{ImageHandle, UploadedImage};
use std::fmt;

/// Discriminant of a [`WorkflowStep`], used in logs and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    Upload,
    Caption,
    Editor,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StepKind::Upload => "upload",
            StepKind::Caption => "caption",
            StepKind::Editor => "editor",
        };
        f.write_str(name)
    }
}

/// Current step of the workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowStep {
    Upload { image: Option<UploadedImage> },
    Caption { image: UploadedImage },
    Editor { image: UploadedImage, caption: String },
}

impl Default for WorkflowStep {
    fn default() -> Self {
        WorkflowStep::Upload { image: None }
    }
}

/// Requested change of step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// A validated upload replaces whatever image the upload step holds.
    SelectImage(UploadedImage),
    /// A crop result becomes the displayed image.
    ReplaceDisplay(ImageHandle),
    Proceed,
    Back,
    ChooseCaption(String),
    StartOver,
    Remove,
}

impl Transition {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Transition::SelectImage(_) => "select-image",
            Transition::ReplaceDisplay(_) => "replace-display",
            Transition::Proceed => "proceed",
            Transition::Back => "back",
            Transition::ChooseCaption(_) => "choose-caption",
            Transition::StartOver => "start-over",
            Transition::Remove => "remove",
        }
    }
}

/// A transition that has no entry for the current step.
///
/// The step is left unchanged when this is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTransition {
    pub from: StepKind,
    pub transition: &'static str,
}

impl fmt::Display for InvalidTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "transition '{}' is not valid from the {} step",
            self.transition, self.from
        )
    }
}

impl std::error::Error for InvalidTransition {}

impl WorkflowStep {
    #[must_use]
    pub fn kind(&self) -> StepKind {
        match self {
            WorkflowStep::Upload { .. } => StepKind::Upload,
            WorkflowStep::Caption { .. } => StepKind::Caption,
            WorkflowStep::Editor { .. } => StepKind::Editor,
        }
    }

    /// The image carried by this step, if any.
    #[must_use]
    pub fn image(&self) -> Option<&UploadedImage> {
        match self {
            WorkflowStep::Upload { image } => image.as_ref(),
            WorkflowStep::Caption { image } | WorkflowStep::Editor { image, .. } => Some(image),
        }
    }

    /// Caption chosen for the editor step.
    #[must_use]
    pub fn caption(&self) -> Option<&str> {
        match self {
            WorkflowStep::Editor { caption, .. } => Some(caption),
            _ => None,
        }
    }

    /// Applies `transition`, returning the handles that are no longer
    /// referenced by the new step.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTransition`] when the transition is not allowed from
    /// the current step. `self` is unchanged in that case.
    pub fn apply(&mut self, transition: Transition) -> Result<Vec<ImageHandle>, InvalidTransition> {
        let current = std::mem::take(self);
        let (next, released) = match (current, transition) {
            (WorkflowStep::Upload { image }, Transition::SelectImage(selected)) => {
                let released = image.map(|old| old.handles()).unwrap_or_default();
                (
                    WorkflowStep::Upload {
                        image: Some(selected),
                    },
                    released,
                )
            }
            (
                WorkflowStep::Upload {
                    image: Some(mut image),
                },
                Transition::ReplaceDisplay(handle),
            ) => {
                let released = image.replace_current(handle).into_iter().collect();
                (WorkflowStep::Upload { image: Some(image) }, released)
            }
            (
                WorkflowStep::Upload {
                    image: Some(image),
                },
                Transition::Proceed,
            ) => (WorkflowStep::Caption { image }, Vec::new()),
            (
                WorkflowStep::Upload {
                    image: Some(image),
                },
                Transition::Remove,
            ) => (WorkflowStep::Upload { image: None }, image.handles()),
            (WorkflowStep::Caption { image }, Transition::Back) => {
                (WorkflowStep::Upload { image: Some(image) }, Vec::new())
            }
            (WorkflowStep::Caption { image }, Transition::ChooseCaption(caption)) => {
                (WorkflowStep::Editor { image, caption }, Vec::new())
            }
            (WorkflowStep::Editor { image, .. }, Transition::StartOver) => {
                (WorkflowStep::Upload { image: None }, image.handles())
            }
            (current, transition) => {
                let error = InvalidTransition {
                    from: current.kind(),
                    transition: transition.name(),
                };
                *self = current;
                return Err(error);
            }
        };
        *self = next;
        Ok(released)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(id: u64) -> ImageHandle {
        ImageHandle::from_raw(id)
    }

    fn image(id: u64) -> UploadedImage {
        UploadedImage::new(None, handle(id))
    }

    fn at_caption() -> WorkflowStep {
        WorkflowStep::Caption { image: image(1) }
    }

    #[test]
    fn initial_step_is_empty_upload() {
        let step = WorkflowStep::default();
        assert_eq!(step.kind(), StepKind::Upload);
        assert!(step.image().is_none());
    }

    #[test]
    fn selecting_first_image_releases_nothing() {
        let mut step = WorkflowStep::default();
        let released = step.apply(Transition::SelectImage(image(1))).unwrap();
        assert!(released.is_empty());
        assert_eq!(step.image().map(UploadedImage::current), Some(handle(1)));
    }

    #[test]
    fn selecting_over_cropped_image_releases_both_handles() {
        let mut cropped = image(1);
        cropped.replace_current(handle(2));
        let mut step = WorkflowStep::Upload {
            image: Some(cropped),
        };
        let released = step.apply(Transition::SelectImage(image(3))).unwrap();
        assert_eq!(released, vec![handle(2), handle(1)]);
    }

    #[test]
    fn replace_display_releases_superseded_crop_only() {
        let mut step = WorkflowStep::Upload {
            image: Some(image(1)),
        };
        assert!(step.apply(Transition::ReplaceDisplay(handle(2))).unwrap().is_empty());
        assert_eq!(
            step.apply(Transition::ReplaceDisplay(handle(3))).unwrap(),
            vec![handle(2)]
        );
        let image = step.image().unwrap();
        assert_eq!(image.current(), handle(3));
        assert_eq!(image.original(), handle(1));
    }

    #[test]
    fn proceed_requires_an_image() {
        let mut step = WorkflowStep::default();
        let err = step.apply(Transition::Proceed).unwrap_err();
        assert_eq!(err.from, StepKind::Upload);
        assert_eq!(err.transition, "proceed");
        assert_eq!(step, WorkflowStep::default());
    }

    #[test]
    fn back_keeps_the_image() {
        let mut step = at_caption();
        assert!(step.apply(Transition::Back).unwrap().is_empty());
        assert_eq!(step.kind(), StepKind::Upload);
        assert_eq!(step.image().map(UploadedImage::current), Some(handle(1)));
    }

    #[test]
    fn choosing_caption_enters_editor() {
        let mut step = at_caption();
        step.apply(Transition::ChooseCaption("When the code compiles".into()))
            .unwrap();
        assert_eq!(step.kind(), StepKind::Editor);
        assert_eq!(step.caption(), Some("When the code compiles"));
        assert!(step.image().is_some());
    }

    #[test]
    fn start_over_releases_everything() {
        let mut cropped = image(1);
        cropped.replace_current(handle(2));
        let mut step = WorkflowStep::Editor {
            image: cropped,
            caption: "x".into(),
        };
        let released = step.apply(Transition::StartOver).unwrap();
        assert_eq!(released, vec![handle(2), handle(1)]);
        assert_eq!(step, WorkflowStep::default());
    }

    #[test]
    fn remove_clears_upload() {
        let mut step = WorkflowStep::Upload {
            image: Some(image(4)),
        };
        assert_eq!(step.apply(Transition::Remove).unwrap(), vec![handle(4)]);
        assert!(step.image().is_none());
    }

    #[test]
    fn unlisted_transitions_leave_step_unchanged() {
        let mut step = at_caption();
        let before = step.clone();
        for transition in [
            Transition::Proceed,
            Transition::StartOver,
            Transition::Remove,
            Transition::ReplaceDisplay(handle(9)),
            Transition::SelectImage(image(9)),
        ] {
            assert!(step.apply(transition).is_err());
            assert_eq!(step, before);
        }
    }

    #[test]
    fn invalid_transition_message_names_step() {
        let err = InvalidTransition {
            from: StepKind::Editor,
            transition: "back",
        };
        assert_eq!(
            err.to_string(),
            "transition 'back' is not valid from the editor step"
        );
    }
}
