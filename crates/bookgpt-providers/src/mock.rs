//! Offline backend for running without any credentials

use anyhow::Result;

use bookgpt_core::prompt::Prompt;
use bookgpt_core::provider::{Completion, GenerationProvider};

const CANNED_REPLIES: [&str; 5] = [
    "Based on the book's insights, I suggest considering the following digital transformation approach...",
    "The author emphasizes the importance of stakeholder engagement in this context. Let me elaborate...",
    "This reminds me of Chapter 5 where the book discusses similar challenges. Here's what it recommends...",
    "According to the book's framework, your situation aligns with the principles outlined in the methodology section...",
    "The book provides a comprehensive strategy for this type of scenario. Let me break it down for you...",
];

const QUESTION_PREFIX: &str = "User Question:";

/// Deterministic canned replies: the same prompt always gets the same text
#[derive(Debug, Clone)]
pub struct MockClient {
    name: String,
}

impl MockClient {
    pub fn new() -> Self {
        Self {
            name: "mock".to_string(),
        }
    }

    /// The user's question, without the chat template's prefix
    fn question(prompt: &Prompt) -> &str {
        prompt
            .user
            .strip_prefix(QUESTION_PREFIX)
            .unwrap_or(prompt.user.as_str())
            .trim()
    }

    pub fn reply_for(prompt: &Prompt) -> String {
        let question = Self::question(prompt);
        let canned = CANNED_REPLIES[question.chars().count() % CANNED_REPLIES.len()];
        let excerpt: String = question.chars().take(100).collect();
        format!("{} {}...", canned, excerpt)
    }
}

impl Default for MockClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl GenerationProvider for MockClient {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, prompt: &Prompt) -> Result<Completion> {
        tracing::debug!("Mock provider answering {}", prompt.template);
        Ok(Completion {
            provider: self.name.clone(),
            content: Self::reply_for(prompt),
            token_cost: 0,
        })
    }
}
