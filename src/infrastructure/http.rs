// SPDX-License-Identifier: MPL-2.0
//! Caption client adapters implementing the [`CaptionClient`] trait.
//!
//! - [`HttpCaptionClient`]: posts to a caption endpoint over HTTP
//! - [`DirectCaptionClient`]: calls a [`CaptionRoute`] in the same process
//!
//! Both send the same body and interpret responses the same way: any
//! non-success status is a [`CaptionError::Service`].
//!
//! [`CaptionClient`]: crate::application::port::CaptionClient

use crate::application::port::caption::{CaptionClient, CaptionError, CaptionRequest};
use crate::application::port::generator::CaptionGenerator;
use crate::service::captions::CaptionRoute;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Serialize)]
struct RequestBody<'a> {
    image: &'a str,
    tone: &'a str,
}

impl<'a> From<&'a CaptionRequest> for RequestBody<'a> {
    fn from(request: &'a CaptionRequest) -> Self {
        Self {
            image: &request.image,
            tone: request.tone.as_str(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CaptionsBody {
    captions: Vec<String>,
}

// =============================================================================
// HttpCaptionClient
// =============================================================================

/// Caption client talking to a remote caption endpoint.
#[derive(Debug, Clone)]
pub struct HttpCaptionClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpCaptionClient {
    /// Creates a client posting to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>) -> crate::error::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("MemeMachine/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl CaptionClient for HttpCaptionClient {
    async fn generate(&self, request: CaptionRequest) -> Result<Vec<String>, CaptionError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&RequestBody::from(&request))
            .send()
            .await
            .map_err(|e| CaptionError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            log::debug!("Caption endpoint answered {status}");
            return Err(CaptionError::Service {
                status: status.as_u16(),
            });
        }

        let body: CaptionsBody = response
            .json()
            .await
            .map_err(|e| CaptionError::MalformedResponse(e.to_string()))?;
        Ok(body.captions)
    }
}

// =============================================================================
// DirectCaptionClient
// =============================================================================

/// Caption client that hands requests straight to a [`CaptionRoute`].
#[derive(Debug)]
pub struct DirectCaptionClient<G> {
    route: Arc<CaptionRoute<G>>,
}

impl<G> Clone for DirectCaptionClient<G> {
    fn clone(&self) -> Self {
        Self {
            route: Arc::clone(&self.route),
        }
    }
}

impl<G: CaptionGenerator> DirectCaptionClient<G> {
    #[must_use]
    pub fn new(route: Arc<CaptionRoute<G>>) -> Self {
        Self { route }
    }

    #[must_use]
    pub fn route(&self) -> &CaptionRoute<G> {
        &self.route
    }
}

impl<G: CaptionGenerator> CaptionClient for DirectCaptionClient<G> {
    async fn generate(&self, request: CaptionRequest) -> Result<Vec<String>, CaptionError> {
        let body = serde_json::to_vec(&RequestBody::from(&request))
            .map_err(|e| CaptionError::Transport(e.to_string()))?;

        let response = self.route.handle(&body).await;
        if !response.is_success() {
            return Err(CaptionError::Service {
                status: response.status,
            });
        }

        serde_json::from_value::<CaptionsBody>(response.body)
            .map(|body| body.captions)
            .map_err(|e| CaptionError::MalformedResponse(e.to_string()))
    }
}
