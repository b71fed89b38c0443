// SPDX-License-Identifier: MPL-2.0
//! Caption service: the endpoint that turns an image and a tone into captions.
//!
//! - [`captions`]: Request validation, prompt, generator call and response
//! - [`decode`]: Recovery of caption lists from raw completions
//! - [`server`]: HTTP binding with axum

pub mod captions;
pub mod decode;
pub mod server;

pub use captions::{build_prompt, CaptionRoute, RouteResponse};
pub use decode::{decode_captions, DecodeTier, Decoded};
