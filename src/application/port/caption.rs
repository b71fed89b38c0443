// SPDX-License-Identifier: MPL-2.0
//! Caption service port definition.
//!
//! The caption workflow talks to the caption service through [`CaptionClient`].
//! Adapters live in `infrastructure::http`: one over HTTP, one that calls the
//! service route in-process.
//!
//! # Design Notes
//!
//! - One call is one request; retries are left to the user
//! - Timeouts are applied by the caller, not by the trait
//! - The trait is `Send + Sync` so a client can be shared with spawned tasks

use crate::domain::caption::Tone;
use std::fmt;
use std::future::Future;

/// Message shown for any non-success response from the service.
pub const SERVICE_FAILURE_MESSAGE: &str = "Failed to generate captions";

/// Message shown when the caller's timeout expires.
pub const TIMEOUT_MESSAGE: &str = "Caption generation timed out. Please try again.";

// =============================================================================
// CaptionError
// =============================================================================

/// Errors surfaced to the caption workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptionError {
    /// The request could not be delivered or the response could not be read.
    Transport(String),

    /// The service answered with a non-success status.
    Service {
        /// HTTP status code.
        status: u16,
    },

    /// The response body did not contain a caption list.
    MalformedResponse(String),

    /// No answer within the configured timeout.
    TimedOut,
}

impl fmt::Display for CaptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptionError::Transport(msg) => f.write_str(msg),
            CaptionError::Service { .. } => f.write_str(SERVICE_FAILURE_MESSAGE),
            CaptionError::MalformedResponse(msg) => {
                write!(f, "Invalid response from caption service: {msg}")
            }
            CaptionError::TimedOut => f.write_str(TIMEOUT_MESSAGE),
        }
    }
}

impl std::error::Error for CaptionError {}

// =============================================================================
// CaptionRequest
// =============================================================================

/// Body of one caption request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionRequest {
    /// Image as a `data:` URL.
    pub image: String,
    pub tone: Tone,
}

// =============================================================================
// CaptionClient Trait
// =============================================================================

/// Port for requesting captions from the caption service.
pub trait CaptionClient: Send + Sync {
    /// Sends one request and returns the captions from a success response.
    ///
    /// # Errors
    ///
    /// Returns a [`CaptionError`] when the request fails, the service answers
    /// with a non-success status, or the response body is not a caption list.
    fn generate(
        &self,
        request: CaptionRequest,
    ) -> impl Future<Output = Result<Vec<String>, CaptionError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_show_fixed_message() {
        let err = CaptionError::Service { status: 500 };
        assert_eq!(err.to_string(), "Failed to generate captions");
        let err = CaptionError::Service { status: 400 };
        assert_eq!(err.to_string(), "Failed to generate captions");
    }

    #[test]
    fn transport_errors_show_their_cause() {
        let err = CaptionError::Transport("connection refused".into());
        assert_eq!(err.to_string(), "connection refused");
    }

    #[test]
    fn timeout_message_invites_retry() {
        assert!(CaptionError::TimedOut.to_string().ends_with("Please try again."));
    }
}
