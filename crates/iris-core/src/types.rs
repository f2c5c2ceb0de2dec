//! Core data types: provider selector, per-provider results, comparisons.

use crate::error::{ErrorKind, VisionError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A hosted vision-language model service.
///
/// Serialized with the short identifiers used by the upload form and the
/// persisted report format (`gpt4o`, `claude`, `gemini`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provider {
    #[serde(rename = "gpt4o", alias = "openai")]
    OpenAi,
    #[serde(rename = "claude", alias = "anthropic")]
    Anthropic,
    #[serde(rename = "gemini", alias = "google")]
    Gemini,
}

impl Provider {
    /// All providers in configured order. Comparisons report in this order.
    pub const ALL: [Provider; 3] = [Provider::OpenAi, Provider::Anthropic, Provider::Gemini];

    /// Short identifier (`gpt4o`, `claude`, `gemini`).
    pub fn id(&self) -> &'static str {
        match self {
            Provider::OpenAi => "gpt4o",
            Provider::Anthropic => "claude",
            Provider::Gemini => "gemini",
        }
    }

    /// Human-readable vendor name.
    pub fn label(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OpenAI",
            Provider::Anthropic => "Anthropic",
            Provider::Gemini => "Gemini",
        }
    }

    /// Environment variable holding this provider's API key.
    pub fn env_var(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OPENAI_API_KEY",
            Provider::Anthropic => "ANTHROPIC_API_KEY",
            Provider::Gemini => "GOOGLE_API_KEY",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Provider {
    type Err = VisionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gpt4o" | "gpt-4o" | "openai" => Ok(Provider::OpenAi),
            "claude" | "anthropic" => Ok(Provider::Anthropic),
            "gemini" | "google" => Ok(Provider::Gemini),
            other => Err(VisionError::UnknownProvider(other.to_string())),
        }
    }
}

/// Why a provider produced no text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&VisionError> for AnalysisFailure {
    fn from(err: &VisionError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// The outcome of asking one provider about one image.
///
/// Exactly one of `text` and `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Which provider answered
    pub provider: Provider,

    /// Model identifier reported by the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Generated text, exactly as the provider returned it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Failure details when the call did not succeed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<AnalysisFailure>,

    /// Round-trip latency in milliseconds
    pub latency_ms: u64,

    /// Tokens used (input + output), if reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u32>,
}

impl AnalysisResult {
    pub fn success(
        provider: Provider,
        model: String,
        text: String,
        latency_ms: u64,
        tokens_used: Option<u32>,
    ) -> Self {
        Self {
            provider,
            model: Some(model),
            text: Some(text),
            error: None,
            latency_ms,
            tokens_used,
        }
    }

    pub fn failure(provider: Provider, err: &VisionError, latency_ms: u64) -> Self {
        Self {
            provider,
            model: None,
            text: None,
            error: Some(AnalysisFailure::from(err)),
            latency_ms,
            tokens_used: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.text.is_some()
    }

    /// Generated text, or `""` for a failed entry.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }
}

/// Every provider's answer to the same image and instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Analysis type name, or `custom` for a caller-supplied prompt
    pub instruction: String,

    /// One entry per provider, in configured order
    pub results: Vec<AnalysisResult>,
}

impl ComparisonResult {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }

    /// Entry for a given provider, if it was attempted.
    pub fn get(&self, provider: Provider) -> Option<&AnalysisResult> {
        self.results.iter().find(|r| r.provider == provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_parse_ids_and_aliases() {
        assert_eq!("gpt4o".parse::<Provider>().unwrap(), Provider::OpenAi);
        assert_eq!("OpenAI".parse::<Provider>().unwrap(), Provider::OpenAi);
        assert_eq!("claude".parse::<Provider>().unwrap(), Provider::Anthropic);
        assert_eq!("google".parse::<Provider>().unwrap(), Provider::Gemini);
    }

    #[test]
    fn test_provider_parse_unknown() {
        let err = "llava".parse::<Provider>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownProvider);
    }

    #[test]
    fn test_provider_serializes_to_short_id() {
        assert_eq!(
            serde_json::to_string(&Provider::Anthropic).unwrap(),
            "\"claude\""
        );
        let parsed: Provider = serde_json::from_str("\"anthropic\"").unwrap();
        assert_eq!(parsed, Provider::Anthropic);
    }

    #[test]
    fn test_failure_result_has_no_text() {
        let err = VisionError::NetworkFailure {
            provider: Provider::Gemini,
            message: "connection refused".into(),
        };
        let result = AnalysisResult::failure(Provider::Gemini, &err, 12);
        assert!(!result.is_success());
        assert_eq!(result.text(), "");
        assert_eq!(result.error.as_ref().unwrap().kind, ErrorKind::NetworkFailure);
    }

    #[test]
    fn test_comparison_counts() {
        let err = VisionError::MissingCredential {
            provider: Provider::Gemini,
            env_var: "GOOGLE_API_KEY",
        };
        let comparison = ComparisonResult {
            instruction: "story".into(),
            results: vec![
                AnalysisResult::success(Provider::OpenAi, "gpt-4o".into(), "hi".into(), 5, None),
                AnalysisResult::failure(Provider::Gemini, &err, 0),
            ],
        };
        assert_eq!(comparison.succeeded(), 1);
        assert_eq!(comparison.failed(), 1);
        assert!(comparison.get(Provider::Anthropic).is_none());
    }
}
