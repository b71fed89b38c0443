// SPDX-License-Identifier: MPL-2.0
//! Infrastructure layer adapters.
//!
//! This module contains concrete implementations of the port traits defined in
//! `application::port`. These adapters wrap external services reached over
//! HTTP.
//!
//! # Available Adapters
//!
//! - [`anthropic`]: Multimodal completions via the Anthropic Messages API
//!   (implements [`CaptionGenerator`])
//! - [`http`]: Caption service clients, remote or in-process
//!   (implement [`CaptionClient`])
//!
//! [`CaptionGenerator`]: crate::application::port::CaptionGenerator
//! [`CaptionClient`]: crate::application::port::CaptionClient

pub mod anthropic;
pub mod http;

// Re-export main types for convenience
pub use anthropic::AnthropicGenerator;
pub use http::{DirectCaptionClient, HttpCaptionClient};
