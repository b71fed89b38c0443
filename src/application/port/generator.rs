// SPDX-License-Identifier: MPL-2.0
//! Caption generation backend port definition.
//!
//! This module defines the [`CaptionGenerator`] trait: one multimodal completion
//! for one image and one prompt. The prompting strategy lives in the caption
//! route; the model itself is a black box behind this trait.
//!
//! # Design Notes
//!
//! - Completions are returned as raw text; decoding is the caller's job
//! - Model choice and token limits are adapter configuration
//! - The trait is `Send + Sync` so one generator serves every connection

use std::fmt;
use std::future::Future;

// =============================================================================
// GenerationError
// =============================================================================

/// Errors that can occur while calling the generation backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// Credentials or endpoint are missing.
    NotConfigured(String),

    /// The request could not be sent or the response could not be read.
    RequestFailed(String),

    /// The backend answered with an error status.
    Api {
        /// HTTP status code.
        status: u16,
        /// Error body returned by the backend.
        message: String,
    },

    /// The response did not have the expected shape.
    InvalidResponse(String),
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::NotConfigured(msg) => write!(f, "Generator not configured: {msg}"),
            GenerationError::RequestFailed(msg) => write!(f, "Generation request failed: {msg}"),
            GenerationError::Api { status, message } => {
                write!(f, "Generation API error ({status}): {message}")
            }
            GenerationError::InvalidResponse(msg) => {
                write!(f, "Invalid generation response: {msg}")
            }
        }
    }
}

impl std::error::Error for GenerationError {}

// =============================================================================
// Request Types
// =============================================================================

/// Base64 image data with its media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub media_type: String,
    /// Base64 payload without any `data:` prefix.
    pub data: String,
}

/// One completion request: an image followed by a text prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub image: ImagePayload,
    pub prompt: String,
}

// =============================================================================
// CaptionGenerator Trait
// =============================================================================

/// Port for the multimodal model that writes captions.
pub trait CaptionGenerator: Send + Sync {
    /// Requests exactly one completion and returns its text.
    ///
    /// # Errors
    ///
    /// Returns a [`GenerationError`] if the backend cannot be reached, rejects
    /// the request, or answers with an unexpected shape.
    fn complete(
        &self,
        request: GenerationRequest,
    ) -> impl Future<Output = Result<String, GenerationError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_error_display() {
        let err = GenerationError::Api {
            status: 529,
            message: "overloaded".into(),
        };
        let display = err.to_string();
        assert!(display.contains("529"));
        assert!(display.contains("overloaded"));

        let err = GenerationError::NotConfigured("ANTHROPIC_API_KEY is not set".into());
        assert!(err.to_string().contains("ANTHROPIC_API_KEY"));
    }

    struct EchoGenerator;

    impl CaptionGenerator for EchoGenerator {
        async fn complete(&self, request: GenerationRequest) -> Result<String, GenerationError> {
            Ok(format!("{}:{}", request.image.media_type, request.prompt))
        }
    }

    #[tokio::test]
    async fn generator_can_be_implemented_with_async_fn() {
        let request = GenerationRequest {
            image: ImagePayload {
                media_type: "image/png".into(),
                data: "QUJD".into(),
            },
            prompt: "caption this".into(),
        };
        let text = EchoGenerator.complete(request).await.unwrap();
        assert_eq!(text, "image/png:caption this");
    }
}
