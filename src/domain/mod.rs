// SPDX-License-Identifier: MPL-2.0
//! Domain layer - Core workflow rules with ZERO external dependencies.
//!
//! This module contains pure domain types, value objects, and business rules.
//! It has no dependencies on external crates (except `std`) to ensure
//! testability and architectural purity.
//!
//! # Modules
//!
//! - [`caption`]: Caption types ([`Tone`](caption::Tone), [`CaptionSet`](caption::CaptionSet))
//! - [`editing`]: Crop geometry ([`CropSelection`](editing::CropSelection),
//!   [`AspectPreset`](editing::AspectPreset))
//! - [`media`]: Image references ([`ImageHandle`](media::ImageHandle),
//!   [`UploadedImage`](media::UploadedImage))
//! - [`upload`]: Upload validation ([`SelectedFile`](upload::SelectedFile),
//!   [`validate`](upload::validate))
//! - [`workflow`]: Step state machine ([`WorkflowStep`](workflow::WorkflowStep))

pub mod caption;
pub mod editing;
pub mod media;
pub mod upload;
pub mod workflow;
