use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use bookgpt_core::prompt::Prompt;
use bookgpt_core::provider::{Completion, GenerationProvider};

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Any backend speaking the OpenAI `/chat/completions` protocol
#[derive(Debug, Clone)]
pub struct OpenAICompatibleClient {
    name: String,
    api_key: Option<String>,
    /// Keyless endpoints (local servers) are usable without a key
    requires_key: bool,
    base_url: String,
    model: String,
    temperature: f64,
    max_tokens: u32,
    headers: HashMap<String, String>,
    http_client: reqwest::Client,
}

impl OpenAICompatibleClient {
    pub fn new(
        name: impl Into<String>,
        api_key: Option<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            requires_key: false,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            temperature: 0.7,
            max_tokens: 2048,
            headers: HashMap::new(),
            http_client: reqwest::Client::new(),
        }
    }

    /// The hosted OpenAI API; unavailable until a key is supplied
    pub fn openai(api_key: Option<String>, model: impl Into<String>) -> Self {
        Self::new("openai", api_key, DEFAULT_OPENAI_BASE_URL, model).requiring_key()
    }

    pub fn requiring_key(mut self) -> Self {
        self.requires_key = true;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn build_request(&self, prompt: &Prompt) -> ChatCompletionRequest {
        let mut messages = Vec::with_capacity(2);
        if !prompt.system.is_empty() {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: prompt.system.clone(),
            });
        }
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: prompt.user.clone(),
        });

        ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            max_tokens: Some(self.max_tokens),
            temperature: Some(self.temperature),
        }
    }

    async fn request_completion(&self, prompt: &Prompt) -> Result<(String, u32)> {
        let mut builder = self
            .http_client
            .post(self.endpoint())
            .header("Content-Type", "application/json");

        if let Some(api_key) = &self.api_key {
            builder = builder.header("Authorization", format!("Bearer {}", api_key));
        }

        for (key, value) in &self.headers {
            builder = builder.header(key, value);
        }

        let response = builder
            .json(&self.build_request(prompt))
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", self.name))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("{} API error ({}): {}", self.name, status, error_text);
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .with_context(|| format!("Failed to parse {} response", self.name))?;

        let content = completion
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        let tokens = completion
            .usage
            .as_ref()
            .and_then(|u| u.total_tokens)
            .unwrap_or(0);

        Ok((content, tokens))
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
    usage: Option<UsageInfo>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UsageInfo {
    total_tokens: Option<u32>,
}

#[async_trait::async_trait]
impl GenerationProvider for OpenAICompatibleClient {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_available(&self) -> bool {
        !self.requires_key || self.api_key.is_some()
    }

    async fn generate(&self, prompt: &Prompt) -> Result<Completion> {
        let (content, tokens) = self.request_completion(prompt).await?;
        Ok(Completion {
            provider: self.name.clone(),
            content,
            token_cost: tokens,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookgpt_core::prompt::TemplateId;

    #[test]
    fn test_openai_needs_key() {
        assert!(!OpenAICompatibleClient::openai(None, DEFAULT_OPENAI_MODEL).is_available());
        assert!(OpenAICompatibleClient::openai(Some("sk-x".into()), DEFAULT_OPENAI_MODEL)
            .is_available());
    }

    #[test]
    fn test_local_endpoint_available_without_key() {
        let client =
            OpenAICompatibleClient::new("ollama", None, "http://localhost:11434/v1/", "llama3");
        assert!(client.is_available());
        assert_eq!(client.endpoint(), "http://localhost:11434/v1/chat/completions");
    }

    #[test]
    fn test_request_messages() {
        let client = OpenAICompatibleClient::openai(Some("k".into()), "gpt-4o-mini");
        let prompt = Prompt {
            template: TemplateId::Chat,
            system: "You discuss books.".to_string(),
            user: "User Question: hi".to_string(),
        };
        let body = serde_json::to_value(client.build_request(&prompt)).unwrap();

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "User Question: hi");
    }

    #[test]
    fn test_null_content_parses() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":null}}],"usage":null}"#,
        )
        .unwrap();
        assert!(response.choices[0].message.content.is_none());
    }
}
