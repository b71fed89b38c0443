// SPDX-License-Identifier: MPL-2.0
//! Workflow surfaces and state management.
//!
//! Every surface follows the "state down, messages up" pattern: a `State`
//! updated by `Message`s that returns an `Event` for its parent. Rendering is
//! left to the host; these modules hold everything a view would read.
//!
//! # Surfaces
//!
//! - [`upload`] - Drag-and-drop and file-picker intake with validation
//! - [`crop`] - Crop overlay with aspect presets and drag handles
//! - [`captions`] - Tone selection, caption generation and choice
//! - [`workflow`] - Step controller owning the image store and the steps

pub mod captions;
pub mod crop;
pub mod upload;
pub mod workflow;
