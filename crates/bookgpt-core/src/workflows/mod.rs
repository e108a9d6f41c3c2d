//! Use cases driven through the generation pipeline
//!
//! Each workflow bundles the three per-use-case pieces the pipeline needs:
//! a prompt template, a way to turn raw model text into a typed result, and a
//! deterministic fallback built from the request alone.

pub mod chat;
pub mod mission_vision;
pub mod revision;
pub mod stakeholder;

use serde::Serialize;

use crate::error::ExtractionError;
use crate::prompt::{GenerationRequest, PromptTemplate};

pub use chat::{BookRef, ChatRequest, ChatWorkflow};
pub use mission_vision::{MissionVisionInputs, MissionVisionOption, MissionVisionOptions, MissionVisionWorkflow};
pub use revision::{
    MissionVisionRevisionRequest, MissionVisionRevisionWorkflow, StakeholderRevisionRequest,
    StakeholderRevisionWorkflow,
};
pub use stakeholder::{
    StakeholderInput, StakeholderMapping, StakeholderMotivationInputs, StakeholderStrategy,
    StakeholderWorkflow,
};

pub trait Workflow: Send + Sync {
    type Input: GenerationRequest + Send + Sync;
    type Output: Serialize + Send;

    /// Name used in logs
    fn name(&self) -> &'static str;

    fn template(&self) -> &PromptTemplate;

    /// Turn raw provider text into a result that satisfies the shape contract
    fn extract(&self, raw: &str) -> Result<Self::Output, ExtractionError>;

    /// Deterministic, network-free default result. Must never fail.
    fn synthesize(&self, input: &Self::Input) -> Self::Output;
}

/// First `n` characters of `text`
pub(crate) fn truncate_chars(text: &str, n: usize) -> String {
    text.chars().take(n).collect()
}
