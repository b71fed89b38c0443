// SPDX-License-Identifier: MPL-2.0
//! Caption service request handling.
//!
//! [`CaptionRoute`] turns a request body `{ "image": <data URL>, "tone": <name> }`
//! into a status and JSON body. It is transport-agnostic: `service::server`
//! binds it to HTTP and `infrastructure::http::DirectCaptionClient` calls it
//! in-process.

use crate::application::port::caption::SERVICE_FAILURE_MESSAGE;
use crate::application::port::generator::{CaptionGenerator, GenerationRequest, ImagePayload};
use crate::config::CAPTION_COUNT;
use crate::domain::caption::Tone;
use crate::media::data_url;
use crate::service::decode::decode_captions;
use serde_json::{json, Value};

pub const IMAGE_REQUIRED_MESSAGE: &str = "Image is required";
pub const TONE_REQUIRED_MESSAGE: &str = "Valid tone is required";

pub const STATUS_OK: u16 = 200;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_INTERNAL_ERROR: u16 = 500;

// =============================================================================
// RouteResponse
// =============================================================================

/// Status code and JSON body produced by the route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteResponse {
    pub status: u16,
    pub body: Value,
}

impl RouteResponse {
    fn captions(captions: Vec<String>) -> Self {
        Self {
            status: STATUS_OK,
            body: json!({ "captions": captions }),
        }
    }

    fn error(status: u16, message: &str) -> Self {
        Self {
            status,
            body: json!({ "error": message }),
        }
    }

    fn internal_error() -> Self {
        Self::error(STATUS_INTERNAL_ERROR, SERVICE_FAILURE_MESSAGE)
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// =============================================================================
// Prompt
// =============================================================================

/// Builds the text prompt sent next to the image for `tone`.
#[must_use]
pub fn build_prompt(tone: Tone) -> String {
    format!(
        "You are a meme caption generator. Analyze this image and generate exactly \
         {CAPTION_COUNT} short, punchy meme captions.\n\
         \n\
         {instruction}\n\
         \n\
         Rules:\n\
         - Each caption should be 1-2 sentences max\n\
         - Make them suitable for top/bottom meme text format\n\
         - Be creative and original\n\
         - Reference specific elements visible in the image\n\
         \n\
         Return ONLY a JSON array of {CAPTION_COUNT} strings, no other text. Example format:\n\
         [\"Caption 1\", \"Caption 2\", \"Caption 3\", \"Caption 4\", \"Caption 5\"]",
        instruction = tone.instruction(),
    )
}

// =============================================================================
// CaptionRoute
// =============================================================================

/// Caption endpoint logic over a [`CaptionGenerator`].
#[derive(Debug)]
pub struct CaptionRoute<G> {
    generator: G,
}

impl<G: CaptionGenerator> CaptionRoute<G> {
    #[must_use]
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    #[must_use]
    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Handles one request body.
    ///
    /// Input errors answer 400; a body that is not JSON and any generator
    /// failure answer 500 with a fixed message. Success always carries at
    /// least one caption.
    pub async fn handle(&self, body: &[u8]) -> RouteResponse {
        let request: Value = match serde_json::from_slice(body) {
            Ok(value) => value,
            Err(e) => {
                log::error!("Caption generation error: invalid request body: {e}");
                return RouteResponse::internal_error();
            }
        };
        if request.is_null() {
            log::error!("Caption generation error: request body is null");
            return RouteResponse::internal_error();
        }

        let image = match request.get("image") {
            None => return RouteResponse::error(STATUS_BAD_REQUEST, IMAGE_REQUIRED_MESSAGE),
            Some(value) if is_falsy(value) => {
                return RouteResponse::error(STATUS_BAD_REQUEST, IMAGE_REQUIRED_MESSAGE)
            }
            Some(Value::String(image)) => image.as_str(),
            Some(other) => {
                log::error!("Caption generation error: image is not a string: {other}");
                return RouteResponse::internal_error();
            }
        };

        let Some(tone) = request
            .get("tone")
            .and_then(Value::as_str)
            .and_then(|name| name.parse::<Tone>().ok())
        else {
            return RouteResponse::error(STATUS_BAD_REQUEST, TONE_REQUIRED_MESSAGE);
        };

        let parts = data_url::split(image);
        let generation = GenerationRequest {
            image: ImagePayload {
                media_type: parts.media_type,
                data: parts.payload.to_string(),
            },
            prompt: build_prompt(tone),
        };

        match self.generator.complete(generation).await {
            Ok(text) => {
                let decoded = decode_captions(&text);
                log::info!(
                    "Served {} {tone} captions ({:?})",
                    decoded.captions.len(),
                    decoded.tier
                );
                RouteResponse::captions(decoded.captions)
            }
            Err(e) => {
                log::error!("Caption generation error: {e}");
                RouteResponse::internal_error()
            }
        }
    }
}

/// JSON values that a loose truthiness check treats as missing.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}
