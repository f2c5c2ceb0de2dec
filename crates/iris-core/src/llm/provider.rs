//! Vision provider trait and request/response types.
//!
//! Defines the interface that every provider adapter implements, plus the
//! factory that builds the adapters from config and credentials.

use crate::config::{Config, GenerationConfig};
use crate::credentials::Credentials;
use crate::error::VisionError;
use crate::image::ImagePayload;
use crate::types::Provider;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use super::anthropic::AnthropicProvider;
use super::gemini::GeminiProvider;
use super::openai::OpenAiProvider;

/// Base64-encoded image ready to send to a provider API.
#[derive(Debug, Clone)]
pub struct ImageInput {
    /// Base64-encoded image bytes
    pub data: String,
    /// MIME type (e.g., "image/jpeg", "image/png")
    pub media_type: String,
}

impl ImageInput {
    pub fn from_payload(payload: &ImagePayload) -> Self {
        Self {
            data: payload.to_base64(),
            media_type: payload.format().media_type().to_string(),
        }
    }

    /// Return a data URL suitable for OpenAI-style APIs.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}

/// One image plus one instruction, encoded once and shared by every
/// provider in a comparison.
#[derive(Debug, Clone)]
pub struct VisionRequest {
    /// The image to analyze
    pub image: ImageInput,
    /// Instruction text for the model
    pub prompt: String,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

impl VisionRequest {
    pub fn new(payload: &ImagePayload, prompt: &str, generation: &GenerationConfig) -> Self {
        Self {
            image: ImageInput::from_payload(payload),
            prompt: prompt.to_string(),
            max_tokens: generation.max_tokens,
            temperature: generation.temperature,
        }
    }
}

/// Text extracted from a provider's response envelope.
#[derive(Debug, Clone)]
pub struct ProviderReply {
    /// Generated text, unmodified
    pub text: String,
    /// Model identifier reported by the provider
    pub model: String,
    /// Number of tokens used (input + output), if reported
    pub tokens_used: Option<u32>,
}

/// Trait that all vision providers implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (we need `Arc<dyn VisionProvider>` for dynamic dispatch).
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Which provider this adapter talks to.
    fn id(&self) -> Provider;

    /// Model name sent with each request.
    fn model(&self) -> &str;

    /// Whether an API key is present.
    fn is_configured(&self) -> bool;

    /// Send one request and extract the generated text.
    ///
    /// Must fail with `MissingCredential` before touching the network when
    /// no key is configured.
    async fn analyze(&self, request: &VisionRequest) -> Result<ProviderReply, VisionError>;
}

/// Fetch the key or fail fast.
pub(crate) fn require_key(provider: Provider, key: Option<&str>) -> Result<&str, VisionError> {
    key.ok_or(VisionError::MissingCredential {
        provider,
        env_var: provider.env_var(),
    })
}

/// Map a transport-level `reqwest` failure.
pub(crate) fn send_error(provider: Provider, err: reqwest::Error) -> VisionError {
    let message = if err.is_timeout() {
        format!("timed out: {err}")
    } else {
        err.to_string()
    };
    VisionError::NetworkFailure { provider, message }
}

/// Turn a non-success response into a `ProviderError` carrying the body.
pub(crate) async fn status_error(provider: Provider, resp: reqwest::Response) -> VisionError {
    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();
    VisionError::ProviderError {
        provider,
        status_code: Some(status.as_u16()),
        message: format!("HTTP {status}: {text}"),
    }
}

/// Malformed or empty envelope.
pub(crate) fn envelope_error(provider: Provider, message: impl Into<String>) -> VisionError {
    VisionError::ProviderError {
        provider,
        status_code: None,
        message: message.into(),
    }
}

/// Map a failure while reading or decoding the response body. A client
/// timeout mid-body is still a transport failure.
pub(crate) fn decode_error(provider: Provider, err: reqwest::Error) -> VisionError {
    if err.is_timeout() {
        return send_error(provider, err);
    }
    envelope_error(provider, format!("Failed to parse response: {err}"))
}

/// Shared HTTP client with the per-call timeout applied.
pub(crate) fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to build HTTP client with timeout ({e}), using defaults");
            reqwest::Client::new()
        })
}

/// Factory that creates provider adapters from config and credentials.
pub struct ProviderFactory;

impl ProviderFactory {
    /// Create the adapter for one provider.
    ///
    /// Never fails for a missing key; the adapter reports it when called.
    pub fn create(
        provider: Provider,
        config: &Config,
        credentials: &Credentials,
    ) -> Arc<dyn VisionProvider> {
        let timeout = Duration::from_millis(config.limits.request_timeout_ms);
        let key = credentials.get(provider);
        match provider {
            Provider::OpenAi => {
                let cfg = &config.providers.openai;
                Arc::new(OpenAiProvider::new(key, &cfg.model, &cfg.endpoint, timeout))
            }
            Provider::Anthropic => {
                let cfg = &config.providers.anthropic;
                Arc::new(AnthropicProvider::new(key, &cfg.model, &cfg.endpoint, timeout))
            }
            Provider::Gemini => {
                let cfg = &config.providers.gemini;
                Arc::new(GeminiProvider::new(key, &cfg.model, &cfg.endpoint, timeout))
            }
        }
    }

    /// Create adapters for every provider, in configured order.
    pub fn create_all(config: &Config, credentials: &Credentials) -> Vec<Arc<dyn VisionProvider>> {
        Provider::ALL
            .into_iter()
            .map(|p| Self::create(p, config, credentials))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageFormat;

    #[test]
    fn test_image_input_from_payload_png() {
        let payload = ImagePayload::new(vec![0x89, 0x50, 0x4E, 0x47], ImageFormat::Png);
        let input = ImageInput::from_payload(&payload);
        assert_eq!(input.media_type, "image/png");
        assert!(!input.data.is_empty());
    }

    #[test]
    fn test_image_input_data_url() {
        let payload = ImagePayload::new(vec![1, 2, 3], ImageFormat::Jpeg);
        let url = ImageInput::from_payload(&payload).data_url();
        assert_eq!(url, "data:image/jpeg;base64,AQID");
    }

    #[test]
    fn test_request_uses_generation_config() {
        let payload = ImagePayload::new(vec![1, 2, 3], ImageFormat::Gif);
        let generation = GenerationConfig {
            max_tokens: 123,
            temperature: 0.2,
        };
        let request = VisionRequest::new(&payload, "Describe.", &generation);
        assert_eq!(request.max_tokens, 123);
        assert_eq!(request.prompt, "Describe.");
        assert_eq!(request.image.media_type, "image/gif");
    }

    #[test]
    fn test_require_key_missing() {
        let err = require_key(Provider::Gemini, None).unwrap_err();
        assert!(matches!(
            err,
            VisionError::MissingCredential {
                provider: Provider::Gemini,
                env_var: "GOOGLE_API_KEY"
            }
        ));
    }

    #[test]
    fn test_factory_creates_every_provider_in_order() {
        let config = Config::default();
        let credentials = Credentials::new().with_key(Provider::Anthropic, "sk-ant");
        let providers = ProviderFactory::create_all(&config, &credentials);

        let ids: Vec<_> = providers.iter().map(|p| p.id()).collect();
        assert_eq!(ids, Provider::ALL.to_vec());
        assert!(!providers[0].is_configured());
        assert!(providers[1].is_configured());
        assert_eq!(providers[1].model(), "claude-sonnet-4-5-20250929");
    }
}
