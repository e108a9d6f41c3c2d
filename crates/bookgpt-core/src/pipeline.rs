//! Generation pipeline
//!
//! One request moves through a fixed sequence of stages:
//!
//! ```text
//! Validating -> Building -> Invoking -> Extracting -> Responding
//!                              |            |
//!                              +------------+--> Synthesizing -> Responding
//! ```
//!
//! Only validation can fail the request. A chain failure or an unusable
//! provider reply always ends in the workflow's fallback result.

use serde::Serialize;
use std::sync::Arc;

use crate::error::ValidationError;
use crate::prompt::{GenerationRequest, Prompt, PromptBuilder};
use crate::provider::ProviderChain;
use crate::workflows::Workflow;

/// Stages a request passes through, used for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    Building,
    Invoking,
    Extracting,
    Synthesizing,
    Responding,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Validating => "validating",
            Self::Building => "building",
            Self::Invoking => "invoking",
            Self::Extracting => "extracting",
            Self::Synthesizing => "synthesizing",
            Self::Responding => "responding",
        };
        f.write_str(name)
    }
}

/// Where a successful payload came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultSource {
    Provider,
    Fallback,
}

/// A successful pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated<T> {
    pub payload: T,
    pub source: ResultSource,
    /// Provider whose reply was used, `None` for fallbacks
    pub provider: Option<String>,
}

impl<T> Generated<T> {
    fn provider(payload: T, provider: String) -> Self {
        Self {
            payload,
            source: ResultSource::Provider,
            provider: Some(provider),
        }
    }

    fn fallback(payload: T) -> Self {
        Self {
            payload,
            source: ResultSource::Fallback,
            provider: None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == ResultSource::Fallback
    }
}

/// Runs any [`Workflow`] against a shared provider chain
#[derive(Debug, Clone)]
pub struct GenerationPipeline {
    chain: Arc<ProviderChain>,
}

impl GenerationPipeline {
    pub fn new(chain: Arc<ProviderChain>) -> Self {
        Self { chain }
    }

    pub fn chain(&self) -> &ProviderChain {
        &self.chain
    }

    pub async fn run<W: Workflow>(
        &self,
        workflow: &W,
        input: &W::Input,
    ) -> Result<Generated<W::Output>, ValidationError> {
        let name = workflow.name();

        tracing::debug!("[{}] {}", name, Stage::Validating);
        if let Err(err) = PromptBuilder::validate(input) {
            tracing::info!("[{}] rejected: {}", name, err);
            return Err(err);
        }

        tracing::debug!("[{}] {}", name, Stage::Building);
        let prompt = workflow.template().render(&input.template_fields());

        let generated = match self.generate(workflow, &prompt).await {
            Ok(generated) => generated,
            Err(err) => {
                tracing::warn!("[{}] using fallback: {}", name, err);
                Self::synthesize(workflow, input)
            }
        };

        tracing::info!(
            "[{}] {} with {:?} result",
            name,
            Stage::Responding,
            generated.source
        );
        Ok(generated)
    }

    /// Invoke the chain and extract a payload from the first usable reply
    async fn generate<W: Workflow>(
        &self,
        workflow: &W,
        prompt: &Prompt,
    ) -> crate::Result<Generated<W::Output>> {
        let name = workflow.name();

        tracing::debug!("[{}] {}", name, Stage::Invoking);
        let completion = self.chain.invoke(prompt).await.into_result()?;

        tracing::debug!("[{}] {}", name, Stage::Extracting);
        let payload = workflow.extract(&completion.content).map_err(|err| {
            tracing::debug!("[{}] reply from {} unusable", name, completion.provider);
            err
        })?;
        Ok(Generated::provider(payload, completion.provider))
    }

    fn synthesize<W: Workflow>(workflow: &W, input: &W::Input) -> Generated<W::Output> {
        tracing::debug!("[{}] {}", workflow.name(), Stage::Synthesizing);
        Generated::fallback(workflow.synthesize(input))
    }
}
