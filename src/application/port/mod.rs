// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! This module defines abstract interfaces that infrastructure adapters implement.
//! These traits use only domain types, ensuring the application layer remains
//! independent of concrete implementations.
//!
//! # Available Ports
//!
//! - [`caption`]: Caption service as seen by the caption workflow
//! - [`generator`]: Multimodal model as seen by the caption service
//!
//! # Design Notes
//!
//! - Traits are `Send + Sync` so adapters can be shared across tasks
//! - Methods return `impl Future + Send`; implementations use `async fn`
//! - Errors are port-specific enums, not the crate error type

pub mod caption;
pub mod generator;

// Re-export main types for convenience
pub use caption::{CaptionClient, CaptionError, CaptionRequest};
pub use generator::{CaptionGenerator, GenerationError, GenerationRequest, ImagePayload};
