use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use bookgpt_core::prompt::Prompt;
use bookgpt_core::provider::{Completion, GenerationProvider};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Google Gemini `generateContent` backend.
///
/// Built without a key it stays in the chain but reports itself unavailable.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    name: String,
    api_key: Option<String>,
    model: String,
    base_url: String,
    temperature: f64,
    max_tokens: u32,
    http_client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            name: "gemini".to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            model: model.into(),
            base_url: GEMINI_API_BASE.to_string(),
            temperature: 0.7,
            max_tokens: 2048,
            http_client: reqwest::Client::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
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

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self, api_key: &str) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, api_key
        )
    }

    fn build_request(&self, prompt: &Prompt) -> GeminiRequest {
        let system_instruction = (!prompt.system.is_empty()).then(|| GeminiSystemInstruction {
            parts: vec![GeminiPart {
                text: prompt.system.clone(),
            }],
        });

        GeminiRequest {
            system_instruction,
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiPart {
                    text: prompt.user.clone(),
                }],
            }],
            generation_config: Some(GeminiGenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_tokens,
            }),
        }
    }

    async fn request_completion(&self, prompt: &Prompt) -> Result<(String, u32)> {
        let api_key = self
            .api_key
            .as_deref()
            .context("Gemini API key is not configured")?;

        let response = self
            .http_client
            .post(self.endpoint(api_key))
            .header("Content-Type", "application/json")
            .json(&self.build_request(prompt))
            .send()
            .await
            .context("Failed to send request to Gemini")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini API error ({}): {}", status, error_text);
        }

        let completion: GeminiResponse = response
            .json()
            .await
            .context("Failed to parse Gemini response")?;

        Ok(completion.into_text_and_tokens())
    }
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    #[serde(skip_serializing_if = "Option::is_none", rename = "systemInstruction")]
    system_instruction: Option<GeminiSystemInstruction>,
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "generationConfig")]
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiSystemInstruction {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    temperature: f64,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<GeminiUsage>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Debug, Deserialize)]
struct GeminiUsage {
    #[serde(rename = "totalTokenCount")]
    total_token_count: Option<u32>,
}

impl GeminiResponse {
    /// Text of the first candidate, all parts joined
    fn into_text_and_tokens(self) -> (String, u32) {
        let content = self
            .candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<String>()
            })
            .unwrap_or_default();

        let tokens = self
            .usage_metadata
            .and_then(|u| u.total_token_count)
            .unwrap_or(0);

        (content, tokens)
    }
}

#[async_trait::async_trait]
impl GenerationProvider for GeminiClient {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
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

    fn prompt(system: &str) -> Prompt {
        Prompt {
            template: TemplateId::Chat,
            system: system.to_string(),
            user: "Who is Gatsby?".to_string(),
        }
    }

    #[test]
    fn test_blank_key_is_unavailable() {
        assert!(!GeminiClient::new(None, DEFAULT_GEMINI_MODEL).is_available());
        assert!(!GeminiClient::new(Some("  ".into()), DEFAULT_GEMINI_MODEL).is_available());
        assert!(GeminiClient::new(Some("k".into()), DEFAULT_GEMINI_MODEL).is_available());
    }

    #[test]
    fn test_request_shape() {
        let client = GeminiClient::new(Some("k".into()), "gemini-1.5-flash").with_max_tokens(500);
        let body = serde_json::to_value(client.build_request(&prompt("Be brief."))).unwrap();

        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "Be brief.");
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Who is Gatsby?");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 500);
    }

    #[test]
    fn test_empty_system_prompt_is_omitted() {
        let client = GeminiClient::new(Some("k".into()), DEFAULT_GEMINI_MODEL);
        let body = serde_json::to_value(client.build_request(&prompt(""))).unwrap();
        assert!(body.get("systemInstruction").is_none());
    }

    #[test]
    fn test_endpoint() {
        let client = GeminiClient::new(Some("k".into()), "gemini-1.5-flash")
            .with_base_url("http://localhost:9000/v1beta/");
        assert_eq!(
            client.endpoint("k"),
            "http://localhost:9000/v1beta/models/gemini-1.5-flash:generateContent?key=k"
        );
    }

    #[test]
    fn test_response_parts_joined() {
        let response: GeminiResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Hello "},{"text":"there"}]}}],
                "usageMetadata":{"totalTokenCount":12}}"#,
        )
        .unwrap();
        assert_eq!(response.into_text_and_tokens(), ("Hello there".to_string(), 12));
    }

    #[tokio::test]
    async fn test_generate_without_key_fails_before_io() {
        let client = GeminiClient::new(None, DEFAULT_GEMINI_MODEL);
        let err = client.generate(&prompt("")).await.unwrap_err();
        assert!(err.to_string().contains("not configured"));
    }
}
