// SPDX-License-Identifier: MPL-2.0
//! Anthropic Messages API adapter implementing the [`CaptionGenerator`] trait.
//!
//! One request per completion: a single user message holding the image as a
//! base64 block followed by the prompt as a text block. The completion is the
//! text of the first content block, or an empty string when that block is not
//! text.
//!
//! [`CaptionGenerator`]: crate::application::port::CaptionGenerator

use crate::application::port::generator::{
    CaptionGenerator, GenerationError, GenerationRequest,
};
use crate::config::GeneratorConfig;
use serde::{Deserialize, Serialize};

const MESSAGES_PATH: &str = "/v1/messages";
const API_VERSION: &str = "2023-06-01";
const USER_AGENT: &str = concat!("MemeMachine/", env!("CARGO_PKG_VERSION"));

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: [RequestBlock<'a>; 2],
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum RequestBlock<'a> {
    Image { source: ImageSource<'a> },
    Text { text: &'a str },
}

#[derive(Debug, Serialize)]
struct ImageSource<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    media_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ResponseBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ResponseBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

// =============================================================================
// AnthropicGenerator
// =============================================================================

/// Caption generator backed by the Anthropic Messages API.
#[derive(Debug, Clone)]
pub struct AnthropicGenerator {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    max_tokens: u32,
    api_key: Option<String>,
}

impl AnthropicGenerator {
    /// Creates a generator from configuration, reading the API key from the
    /// environment variable named by `config.api_key_env`.
    ///
    /// A missing key is not an error here; requests fail until it is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &GeneratorConfig) -> Result<Self, GenerationError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.is_empty());
        if api_key.is_none() {
            log::warn!(
                "{} is not set; caption generation will fail",
                config.api_key_env
            );
        }
        Self::with_api_key(config, api_key)
    }

    /// Creates a generator with an explicit API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_api_key(
        config: &GeneratorConfig,
        api_key: Option<String>,
    ) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GenerationError::NotConfigured(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}{MESSAGES_PATH}", config.api_base.trim_end_matches('/')),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            api_key,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl CaptionGenerator for AnthropicGenerator {
    async fn complete(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| GenerationError::NotConfigured("API key is not set".to_string()))?;

        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: [Message {
                role: "user",
                content: [
                    RequestBlock::Image {
                        source: ImageSource {
                            kind: "base64",
                            media_type: &request.image.media_type,
                            data: &request.image.data,
                        },
                    },
                    RequestBlock::Text {
                        text: &request.prompt,
                    },
                ],
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

        Ok(match parsed.content.into_iter().next() {
            Some(ResponseBlock::Text { text }) => text,
            Some(ResponseBlock::Other) | None => String::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::port::generator::ImagePayload;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};
    use tokio::net::TcpListener;

    type Seen = Arc<Mutex<Vec<(HeaderMap, Value)>>>;

    /// Starts a fake messages API answering every request with `reply`.
    async fn fake_api(status: StatusCode, reply: Value) -> (String, Seen) {
        let seen: Seen = Arc::default();
        let recorder = Arc::clone(&seen);
        let app = Router::new().route(
            MESSAGES_PATH,
            post(move |headers: HeaderMap, Json(body): Json<Value>| {
                let recorder = Arc::clone(&recorder);
                let reply = reply.clone();
                async move {
                    recorder.lock().unwrap().push((headers, body));
                    (status, Json(reply))
                }
            }),
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (base, seen)
    }

    fn generator(api_base: &str, key: Option<&str>) -> AnthropicGenerator {
        let config = GeneratorConfig {
            api_base: api_base.to_string(),
            ..GeneratorConfig::default()
        };
        AnthropicGenerator::with_api_key(&config, key.map(str::to_string)).unwrap()
    }

    fn request() -> GenerationRequest {
        GenerationRequest {
            image: ImagePayload {
                media_type: "image/png".into(),
                data: "QUJD".into(),
            },
            prompt: "caption this".into(),
        }
    }

    #[test]
    fn endpoint_joins_base_and_path() {
        let generator = generator("https://api.example.com/", Some("k"));
        assert_eq!(generator.endpoint(), "https://api.example.com/v1/messages");
    }

    #[tokio::test]
    async fn sends_image_then_text_with_headers() {
        let (base, seen) = fake_api(
            StatusCode::OK,
            json!({ "content": [{ "type": "text", "text": "[\"A\"]" }] }),
        )
        .await;

        let text = generator(&base, Some("secret"))
            .complete(request())
            .await
            .unwrap();
        assert_eq!(text, "[\"A\"]");

        let seen = seen.lock().unwrap();
        let (headers, body) = &seen[0];
        assert_eq!(headers["x-api-key"], "secret");
        assert_eq!(headers["anthropic-version"], "2023-06-01");
        assert_eq!(body["model"], "claude-sonnet-4-20250514");
        assert_eq!(body["max_tokens"], 1024);
        let content = &body["messages"][0]["content"];
        assert_eq!(content[0]["type"], "image");
        assert_eq!(content[0]["source"]["type"], "base64");
        assert_eq!(content[0]["source"]["media_type"], "image/png");
        assert_eq!(content[0]["source"]["data"], "QUJD");
        assert_eq!(content[1], json!({ "type": "text", "text": "caption this" }));
    }

    #[tokio::test]
    async fn non_text_first_block_yields_empty_completion() {
        let (base, _) = fake_api(
            StatusCode::OK,
            json!({ "content": [{ "type": "tool_use", "id": "x" }, { "type": "text", "text": "late" }] }),
        )
        .await;
        let text = generator(&base, Some("k")).complete(request()).await.unwrap();
        assert_eq!(text, "");
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let (base, _) = fake_api(
            StatusCode::TOO_MANY_REQUESTS,
            json!({ "error": { "type": "rate_limit_error" } }),
        )
        .await;
        let err = generator(&base, Some("k"))
            .complete(request())
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Api { status: 429, .. }));
    }

    #[tokio::test]
    async fn missing_key_fails_without_sending() {
        let (base, seen) = fake_api(StatusCode::OK, json!({ "content": [] })).await;
        let err = generator(&base, None).complete(request()).await.unwrap_err();
        assert!(matches!(err, GenerationError::NotConfigured(_)));
        assert!(seen.lock().unwrap().is_empty());
    }
}
