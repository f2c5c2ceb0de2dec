//! Google Gemini provider using the `generateContent` API.
//!
//! The image travels as an `inline_data` part next to the instruction text.

use super::provider::{
    build_client, decode_error, envelope_error, require_key, send_error, status_error,
    ProviderReply, VisionProvider, VisionRequest,
};
use crate::error::VisionError;
use crate::types::Provider;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Gemini provider. `endpoint` is the API base; the model path is appended per call.
pub struct GeminiProvider {
    api_key: Option<String>,
    model: String,
    endpoint: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(api_key: Option<&str>, model: &str, endpoint: &str, timeout: Duration) -> Self {
        Self {
            api_key: api_key.map(String::from),
            model: model.to_string(),
            endpoint: endpoint.to_string(),
            client: build_client(timeout),
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

// --- Request types ---

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationParams,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    Inline { inline_data: InlineData },
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
struct GenerationParams {
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    temperature: f32,
}

// --- Response types ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
    model_version: Option<String>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    total_token_count: Option<u32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[async_trait]
impl VisionProvider for GeminiProvider {
    fn id(&self) -> Provider {
        Provider::Gemini
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn analyze(&self, request: &VisionRequest) -> Result<ProviderReply, VisionError> {
        let api_key = require_key(self.id(), self.api_key.as_deref())?;

        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: request.prompt.clone(),
                    },
                    Part::Inline {
                        inline_data: InlineData {
                            mime_type: request.image.media_type.clone(),
                            data: request.image.data.clone(),
                        },
                    },
                ],
            }],
            generation_config: GenerationParams {
                max_output_tokens: request.max_tokens,
                temperature: request.temperature,
            },
        };

        let resp = self
            .client
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| send_error(self.id(), e))?;

        if !resp.status().is_success() {
            return Err(status_error(self.id(), resp).await);
        }

        let gen_resp: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| decode_error(self.id(), e))?;

        let Some(candidate) = gen_resp.candidates.into_iter().next() else {
            let reason = gen_resp
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .map(|r| format!("no candidates returned (blocked: {r})"))
                .unwrap_or_else(|| "no candidates returned".to_string());
            return Err(envelope_error(self.id(), reason));
        };

        let text = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect::<String>())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(envelope_error(
                self.id(),
                "empty candidate, no text content generated",
            ));
        }

        Ok(ProviderReply {
            text,
            model: gen_resp.model_version.unwrap_or_else(|| self.model.clone()),
            tokens_used: gen_resp.usage_metadata.and_then(|u| u.total_token_count),
        })
    }
}
