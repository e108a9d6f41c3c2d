//! BookGPT Providers - generative text backends
//!
//! Concrete [`GenerationProvider`](bookgpt_core::provider::GenerationProvider)
//! implementations and the router that assembles them into an ordered
//! [`ProviderChain`](bookgpt_core::provider::ProviderChain).
//!
//! - [`GeminiClient`]: Google Gemini `generateContent`
//! - [`OpenAICompatibleClient`]: OpenAI and any `/chat/completions` endpoint
//! - [`MockClient`]: deterministic offline replies

pub mod gemini;
pub mod mock;
pub mod openai_compatible;
pub mod router;

pub use gemini::GeminiClient;
pub use mock::MockClient;
pub use openai_compatible::OpenAICompatibleClient;
pub use router::{ProviderConfig, ProviderRouter, ProviderRouterConfig};
