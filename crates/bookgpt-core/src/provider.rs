//! Provider Chain Invoker
//!
//! Generation backends are tried strictly in order. A backend without
//! credentials is skipped before any I/O; a backend that errors, times out or
//! answers with nothing hands over to the next one. The invoker itself never
//! fails: it reports `Failure` with every attempt's error instead.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{BookGptError, ProviderError};
use crate::prompt::Prompt;

/// Default per-attempt timeout
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(30);

/// Raw text produced by a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    /// Provider that produced the text
    pub provider: String,
    pub content: String,
    pub token_cost: u32,
}

/// A generative text backend
#[async_trait::async_trait]
pub trait GenerationProvider: Send + Sync + std::fmt::Debug {
    /// Short name used in logs and status output
    fn name(&self) -> &str;

    /// False when required credentials or configuration are absent
    fn is_available(&self) -> bool {
        true
    }

    async fn generate(&self, prompt: &Prompt) -> Result<Completion>;
}

/// Outcome of running the chain. Never partially successful.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderResult {
    Success(Completion),
    /// Every configured provider failed or was unavailable
    Failure(Vec<ProviderError>),
}

impl ProviderResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The completion, or every attempt's error
    pub fn into_result(self) -> crate::Result<Completion> {
        match self {
            Self::Success(completion) => Ok(completion),
            Self::Failure(errors) => Err(BookGptError::ProvidersExhausted(errors)),
        }
    }
}

/// Availability of one chain entry, for status reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderStatus {
    pub name: String,
    pub available: bool,
}

#[derive(Debug, Clone)]
pub struct ProviderChain {
    providers: Vec<Arc<dyn GenerationProvider>>,
    attempt_timeout: Duration,
}

impl ProviderChain {
    pub fn new(providers: Vec<Arc<dyn GenerationProvider>>) -> Self {
        Self {
            providers,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
        }
    }

    /// A chain with no providers; every invocation fails
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    pub fn attempt_timeout(&self) -> Duration {
        self.attempt_timeout
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn statuses(&self) -> Vec<ProviderStatus> {
        self.providers
            .iter()
            .map(|p| ProviderStatus {
                name: p.name().to_string(),
                available: p.is_available(),
            })
            .collect()
    }

    /// Try each provider in order and return the first usable text
    pub async fn invoke(&self, prompt: &Prompt) -> ProviderResult {
        let mut errors = Vec::new();

        for provider in &self.providers {
            let name = provider.name().to_string();

            if !provider.is_available() {
                tracing::debug!("Provider {} skipped for {}: unavailable", name, prompt.template);
                errors.push(ProviderError::Unavailable(name));
                continue;
            }

            tracing::info!("Attempting provider {} for {}", name, prompt.template);

            match self.attempt(provider.as_ref(), prompt).await {
                Ok(completion) => {
                    tracing::info!(
                        "Provider {} succeeded for {} ({} chars)",
                        name,
                        prompt.template,
                        completion.content.len()
                    );
                    return ProviderResult::Success(completion);
                }
                Err(err) => {
                    tracing::warn!("Provider {} failed for {}: {}", name, prompt.template, err);
                    errors.push(err);
                }
            }
        }

        tracing::warn!(
            "All {} providers failed for {}",
            self.providers.len(),
            prompt.template
        );
        ProviderResult::Failure(errors)
    }

    async fn attempt(
        &self,
        provider: &dyn GenerationProvider,
        prompt: &Prompt,
    ) -> std::result::Result<Completion, ProviderError> {
        let name = provider.name().to_string();

        let completion = match tokio::time::timeout(self.attempt_timeout, provider.generate(prompt))
            .await
        {
            Ok(Ok(completion)) => completion,
            Ok(Err(err)) => {
                return Err(ProviderError::Failed {
                    provider: name,
                    reason: format!("{:#}", err),
                })
            }
            Err(_) => {
                return Err(ProviderError::Timeout {
                    provider: name,
                    secs: self.attempt_timeout.as_secs(),
                })
            }
        };

        if completion.content.trim().is_empty() {
            return Err(ProviderError::EmptyResponse(name));
        }

        Ok(completion)
    }
}
