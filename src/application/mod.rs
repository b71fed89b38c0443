// SPDX-License-Identifier: MPL-2.0
//! Application layer - Ports between the workflow and the outside world.
//!
//! - [`port`]: Trait definitions (interfaces) for dependency inversion
//!
//! # Dependency Rule
//!
//! - Application layer depends on domain layer (uses domain types)
//! - Infrastructure layer implements application layer ports
//! - The service and presentation layers depend on ports, never on adapters
//!
//! # Example
//!
//! ```ignore
//! use meme_machine::application::port::{CaptionClient, CaptionRequest};
//! use meme_machine::domain::caption::Tone;
//!
//! async fn first_caption(client: &impl CaptionClient, image: String) -> Option<String> {
//!     let captions = client.generate(CaptionRequest { image, tone: Tone::Funny }).await.ok()?;
//!     captions.into_iter().next()
//! }
//! ```

pub mod port;
