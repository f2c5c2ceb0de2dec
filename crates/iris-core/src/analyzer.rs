//! Unified analyzer: dispatches one image to one or all providers.
//!
//! The analyzer owns the provider adapters and is shared read-only (behind
//! `Arc`) by the web front and the CLI. Each provider call is bounded by the
//! configured timeout and is attempted exactly once.

use crate::config::{Config, GenerationConfig};
use crate::credentials::Credentials;
use crate::error::{VisionError, VisionResult};
use crate::image::ImagePayload;
use crate::llm::{ProviderFactory, ProviderReply, VisionProvider, VisionRequest};
use crate::output::{self, Report};
use crate::prompts::Instruction;
use crate::types::{AnalysisResult, ComparisonResult, Provider};
use futures_util::future::join_all;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Per-call settings shared by every provider.
#[derive(Debug, Clone)]
pub struct AnalyzerOptions {
    /// Upper bound on a single provider call
    pub timeout: Duration,
    /// Generation parameters sent with every request
    pub generation: GenerationConfig,
}

impl AnalyzerOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            timeout: Duration::from_millis(config.limits.request_timeout_ms),
            generation: config.generation.clone(),
        }
    }
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Dispatches analyses to the registered providers.
pub struct Analyzer {
    providers: Vec<Arc<dyn VisionProvider>>,
    options: AnalyzerOptions,
}

impl Analyzer {
    /// Build adapters for every known provider using exactly `credentials`.
    ///
    /// Never fails for missing keys; the affected provider reports
    /// `MissingCredential` when it is called.
    pub fn new(config: &Config, credentials: Credentials) -> Self {
        tracing::debug!("Initializing analyzer with {credentials:?}");
        let providers = ProviderFactory::create_all(config, &credentials);
        Self::with_providers(providers, AnalyzerOptions::from_config(config))
    }

    /// Build with keys from the config file, falling back to the standard
    /// environment variables.
    pub fn from_env(config: &Config) -> Self {
        Self::new(config, Credentials::from_config(&config.providers))
    }

    /// Use an explicit list of adapters. Their order is the comparison order.
    pub fn with_providers(providers: Vec<Arc<dyn VisionProvider>>, options: AnalyzerOptions) -> Self {
        Self { providers, options }
    }

    pub fn providers(&self) -> impl Iterator<Item = Provider> + '_ {
        self.providers.iter().map(|p| p.id())
    }

    /// Providers that currently hold a key, in configured order.
    pub fn configured_providers(&self) -> Vec<Provider> {
        self.providers
            .iter()
            .filter(|p| p.is_configured())
            .map(|p| p.id())
            .collect()
    }

    /// Ask one provider about one image.
    ///
    /// The instruction is resolved before anything is sent, so an invalid
    /// instruction never reaches the network. Provider errors propagate.
    pub async fn analyze_with(
        &self,
        provider: Provider,
        image: &ImagePayload,
        instruction: &Instruction,
    ) -> VisionResult<AnalysisResult> {
        let prompt = instruction.resolve()?;
        let adapter = self
            .adapter(provider)
            .ok_or_else(|| VisionError::UnknownProvider(provider.id().to_string()))?;

        let request = VisionRequest::new(image, prompt, &self.options.generation);
        tracing::info!(
            "Analyzing {} image ({} bytes) with {provider} [{}]",
            image.format(),
            image.len(),
            instruction.label()
        );

        let start = Instant::now();
        let reply = self.call(adapter.as_ref(), &request).await?;
        let latency_ms = start.elapsed().as_millis() as u64;

        tracing::info!("{provider} answered in {latency_ms}ms");
        Ok(AnalysisResult::success(
            provider,
            reply.model,
            reply.text,
            latency_ms,
            reply.tokens_used,
        ))
    }

    /// Ask every configured provider about the same image, concurrently.
    ///
    /// Providers without a key are skipped. Per-provider failures are
    /// captured in their entry and only an invalid instruction fails the
    /// whole call. Entries keep configured order.
    pub async fn compare_all(
        &self,
        image: &ImagePayload,
        instruction: &Instruction,
    ) -> VisionResult<ComparisonResult> {
        let prompt = instruction.resolve()?;
        let request = VisionRequest::new(image, prompt, &self.options.generation);
        let configured: Vec<_> = self.providers.iter().filter(|p| p.is_configured()).collect();
        if configured.is_empty() {
            tracing::warn!("No provider has an API key; nothing to compare");
        }
        tracing::info!(
            "Comparing {} providers on {} image [{}]",
            configured.len(),
            image.format(),
            instruction.label()
        );

        let calls = configured.into_iter().map(|adapter| {
            let request = &request;
            async move {
                let provider = adapter.id();
                let start = Instant::now();
                let outcome = self.call(adapter.as_ref(), request).await;
                let latency_ms = start.elapsed().as_millis() as u64;
                match outcome {
                    Ok(reply) => AnalysisResult::success(
                        provider,
                        reply.model,
                        reply.text,
                        latency_ms,
                        reply.tokens_used,
                    ),
                    Err(e) => {
                        tracing::warn!("{provider} failed: {e}");
                        AnalysisResult::failure(provider, &e, latency_ms)
                    }
                }
            }
        });

        let results = join_all(calls).await;
        let comparison = ComparisonResult {
            instruction: instruction.label().to_string(),
            results,
        };
        tracing::info!(
            "Comparison complete: {} succeeded, {} failed",
            comparison.succeeded(),
            comparison.failed()
        );
        Ok(comparison)
    }

    /// Write a result or comparison to disk as JSON.
    pub fn persist(&self, report: &Report, path: &Path) -> VisionResult<()> {
        output::persist(report, path)
    }

    fn adapter(&self, provider: Provider) -> Option<&Arc<dyn VisionProvider>> {
        self.providers.iter().find(|p| p.id() == provider)
    }

    async fn call(
        &self,
        adapter: &dyn VisionProvider,
        request: &VisionRequest,
    ) -> VisionResult<ProviderReply> {
        match tokio::time::timeout(self.options.timeout, adapter.analyze(request)).await {
            Ok(result) => result,
            Err(_) => Err(VisionError::NetworkFailure {
                provider: adapter.id(),
                message: format!("timed out after {}ms", self.options.timeout.as_millis()),
            }),
        }
    }
}
