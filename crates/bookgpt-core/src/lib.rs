//! BookGPT Core - book-grounded generation with guaranteed answers
//!
//! BookGPT turns structured user input into prompts grounded in book content,
//! sends them through an ordered chain of generative text providers, and pulls
//! a structured result out of the free-form reply. When every provider fails,
//! or the reply cannot be used, a deterministic fallback is returned instead.
//!
//! # Architecture
//!
//! 1. **Prompt Builder** (`prompt`): required-field validation and `{{field}}` templates
//! 2. **Provider Chain** (`provider`): ordered, timeout-bounded provider attempts
//! 3. **Extractor** (`extract`): balanced-brace JSON scan plus shape contracts
//! 4. **Workflows** (`workflows`): chat, mission/vision, stakeholder motivation and revisions
//! 5. **Pipeline** (`pipeline`): the one state machine every workflow runs through
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use bookgpt_core::book::BookLibrary;
//! use bookgpt_core::pipeline::GenerationPipeline;
//! use bookgpt_core::provider::ProviderChain;
//! use bookgpt_core::workflows::{MissionVisionInputs, MissionVisionWorkflow};
//!
//! # async fn demo() {
//! let library = BookLibrary::builtin();
//! let workflow = MissionVisionWorkflow::new(&library);
//! let pipeline = GenerationPipeline::new(Arc::new(ProviderChain::empty()));
//!
//! let inputs = MissionVisionInputs {
//!     current_scenario: Some("Paper-based claims".into()),
//!     industry: Some("Insurance".into()),
//!     goal: Some("Automate claims handling".into()),
//!     intended_to_be: Some("A digital-first insurer".into()),
//!     ..Default::default()
//! };
//!
//! // An empty chain always ends in the fallback result
//! let generated = pipeline.run(&workflow, &inputs).await.unwrap();
//! assert_eq!(generated.payload.options.len(), 3);
//! # }
//! ```

pub mod book;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod prompt;
pub mod provider;
pub mod workflows;

pub use book::{Book, BookLibrary};
pub use error::{BookGptError, ExtractionError, ProviderError, Result, ValidationError};
pub use pipeline::{GenerationPipeline, Generated, ResultSource};
pub use prompt::{GenerationRequest, Prompt, PromptBuilder, PromptTemplate, TemplateId};
pub use provider::{Completion, GenerationProvider, ProviderChain, ProviderResult, ProviderStatus};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
