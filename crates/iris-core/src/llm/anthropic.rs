//! Anthropic provider using the Messages API.
//!
//! Sends image + prompt with a base64 image content block ahead of the text.

use super::provider::{
    build_client, decode_error, envelope_error, require_key, send_error, status_error,
    ProviderReply, VisionProvider, VisionRequest,
};
use crate::error::VisionError;
use crate::types::Provider;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const API_VERSION: &str = "2023-06-01";

/// The Messages API rejects temperatures above 1.0.
const MAX_TEMPERATURE: f32 = 1.0;

/// Anthropic provider using the Messages API.
pub struct AnthropicProvider {
    api_key: Option<String>,
    model: String,
    endpoint: String,
    client: reqwest::Client,
}

impl AnthropicProvider {
    pub fn new(api_key: Option<&str>, model: &str, endpoint: &str, timeout: Duration) -> Self {
        Self {
            api_key: api_key.map(String::from),
            model: model.to_string(),
            endpoint: endpoint.to_string(),
            client: build_client(timeout),
        }
    }
}

// --- Request types ---

#[derive(Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: Vec<ContentBlock>,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "image")]
    Image { source: ImageSource },
    #[serde(rename = "text")]
    Text { text: String },
}

#[derive(Serialize)]
struct ImageSource {
    #[serde(rename = "type")]
    source_type: String,
    media_type: String,
    data: String,
}

// --- Response types ---

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ResponseContent>,
    model: String,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct ResponseContent {
    text: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

#[async_trait]
impl VisionProvider for AnthropicProvider {
    fn id(&self) -> Provider {
        Provider::Anthropic
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn analyze(&self, request: &VisionRequest) -> Result<ProviderReply, VisionError> {
        let api_key = require_key(self.id(), self.api_key.as_deref())?;

        let body = MessagesRequest {
            model: self.model.clone(),
            max_tokens: request.max_tokens,
            temperature: request.temperature.min(MAX_TEMPERATURE),
            messages: vec![Message {
                role: "user".to_string(),
                content: vec![
                    ContentBlock::Image {
                        source: ImageSource {
                            source_type: "base64".to_string(),
                            media_type: request.image.media_type.clone(),
                            data: request.image.data.clone(),
                        },
                    },
                    ContentBlock::Text {
                        text: request.prompt.clone(),
                    },
                ],
            }],
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| send_error(self.id(), e))?;

        if !resp.status().is_success() {
            return Err(status_error(self.id(), resp).await);
        }

        let messages_resp: MessagesResponse = resp
            .json()
            .await
            .map_err(|e| decode_error(self.id(), e))?;

        let text = messages_resp
            .content
            .into_iter()
            .filter_map(|c| c.text)
            .collect::<String>();

        if text.trim().is_empty() {
            return Err(envelope_error(
                self.id(),
                "empty response, no text content generated",
            ));
        }

        Ok(ProviderReply {
            text,
            model: messages_resp.model,
            tokens_used: messages_resp
                .usage
                .map(|u| u.input_tokens + u.output_tokens),
        })
    }
}
