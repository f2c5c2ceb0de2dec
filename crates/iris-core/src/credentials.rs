//! Provider API keys.
//!
//! Built once at startup and shared read-only. A missing key only disables
//! the provider it belongs to; nothing fails until that provider is used.

use crate::config::ProvidersConfig;
use crate::types::Provider;
use std::fmt;

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok().filter(|v| !v.is_empty())
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Immutable set of per-provider API keys.
///
/// `Debug` reports only whether each key is present.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    openai: Option<String>,
    anthropic: Option<String>,
    gemini: Option<String>,
}

impl Credentials {
    /// Credentials with no keys at all.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the key for one provider. Empty keys are ignored.
    pub fn with_key(mut self, provider: Provider, key: impl Into<String>) -> Self {
        let key = key.into();
        if key.trim().is_empty() {
            return self;
        }
        *self.slot_mut(provider) = Some(key);
        self
    }

    /// Resolve keys from config values, falling back to each provider's
    /// standard environment variable.
    pub fn from_config(config: &ProvidersConfig) -> Self {
        let resolve = |raw: &str, provider: Provider| {
            resolve_env_var(raw).or_else(|| resolve_env_var(&format!("${{{}}}", provider.env_var())))
        };
        Self {
            openai: resolve(&config.openai.api_key, Provider::OpenAi),
            anthropic: resolve(&config.anthropic.api_key, Provider::Anthropic),
            gemini: resolve(&config.gemini.api_key, Provider::Gemini),
        }
    }

    pub fn get(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::OpenAi => self.openai.as_deref(),
            Provider::Anthropic => self.anthropic.as_deref(),
            Provider::Gemini => self.gemini.as_deref(),
        }
    }

    pub fn has(&self, provider: Provider) -> bool {
        self.get(provider).is_some()
    }

    fn slot_mut(&mut self, provider: Provider) -> &mut Option<String> {
        match provider {
            Provider::OpenAi => &mut self.openai,
            Provider::Anthropic => &mut self.anthropic,
            Provider::Gemini => &mut self.gemini,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = |key: &Option<String>| if key.is_some() { "set" } else { "unset" };
        f.debug_struct("Credentials")
            .field("openai", &state(&self.openai))
            .field("anthropic", &state(&self.anthropic))
            .field("gemini", &state(&self.gemini))
            .finish()
    }
}
