use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use bookgpt_core::provider::{GenerationProvider, ProviderChain};

use crate::gemini::{GeminiClient, DEFAULT_GEMINI_MODEL};
use crate::mock::MockClient;
use crate::openai_compatible::{
    OpenAICompatibleClient, DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL,
};

/// Env var naming the provider config file
pub const CONFIG_PATH_ENV: &str = "BOOKGPT_LLM_CONFIG";

/// Config file picked up from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "bookgpt_llm_config.json";

/// Order used when providers come from environment variables
const ENV_ORDER: [&str; 2] = ["gemini", "openai"];

#[derive(Debug, Deserialize)]
pub struct ProviderRouterConfig {
    pub default: Option<String>,
    pub fallbacks: Option<Vec<String>>,
    pub providers: HashMap<String, ProviderConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    Gemini {
        api_key: Option<String>,
        api_key_env: Option<String>,
        model: Option<String>,
        temperature: Option<f64>,
        max_tokens: Option<u32>,
    },
    #[serde(rename = "openai")]
    OpenAI {
        api_key: Option<String>,
        api_key_env: Option<String>,
        model: Option<String>,
        base_url: Option<String>,
        temperature: Option<f64>,
        max_tokens: Option<u32>,
    },
    #[serde(rename = "openai_compatible")]
    OpenAICompatible {
        name: Option<String>,
        api_key: Option<String>,
        api_key_env: Option<String>,
        base_url: String,
        model: String,
        temperature: Option<f64>,
        max_tokens: Option<u32>,
        headers: Option<HashMap<String, String>>,
    },
    Mock,
}

/// Builds the ordered list of generation backends
#[derive(Debug, Clone)]
pub struct ProviderRouter {
    providers: Vec<Arc<dyn GenerationProvider>>,
}

impl ProviderRouter {
    /// Config file when one is found, environment variables otherwise
    pub fn from_env() -> Result<Self> {
        let lookup = |name: &str| std::env::var(name).ok();
        if let Some(config) = Self::load_config_from_file(&lookup)? {
            return Self::from_config(config, &lookup);
        }

        Ok(Self::from_lookup(&lookup))
    }

    /// A router holding only the offline mock backend
    pub fn mock() -> Self {
        Self {
            providers: vec![Arc::new(MockClient::new())],
        }
    }

    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self> {
        let config = Self::read_config(path.as_ref())?;
        Self::from_config(config, &|name: &str| std::env::var(name).ok())
    }

    pub fn from_config(
        config: ProviderRouterConfig,
        lookup: &dyn Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let mut order = Vec::new();
        if let Some(default) = config.default {
            order.push(default);
        }
        if let Some(fallbacks) = config.fallbacks {
            order.extend(fallbacks);
        }

        if order.is_empty() {
            let mut names: Vec<String> = config.providers.keys().cloned().collect();
            names.sort();
            order = names;
        }

        let mut providers = Vec::new();
        let mut seen = HashSet::new();
        for name in order {
            if seen.contains(&name) {
                continue;
            }
            let Some(provider_config) = config.providers.get(&name) else {
                tracing::warn!("LLM config names unknown provider {}, ignoring", name);
                continue;
            };
            providers.push(Self::build_provider(&name, provider_config, lookup));
            seen.insert(name);
        }

        if providers.is_empty() {
            anyhow::bail!("No valid LLM providers configured.");
        }

        Ok(Self { providers })
    }

    /// Gemini then OpenAI, each present whether or not its key is set
    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Self {
        let providers = ENV_ORDER
            .iter()
            .filter_map(|name| Self::build_provider_from_env(name, lookup))
            .collect();
        Self { providers }
    }

    pub fn names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub fn into_chain(self, attempt_timeout: Duration) -> ProviderChain {
        ProviderChain::new(self.providers).with_timeout(attempt_timeout)
    }

    /// Config named by `BOOKGPT_LLM_CONFIG`, else the default file when present.
    ///
    /// A named file that is missing, and any file that cannot be read or
    /// parsed, is an error rather than a silent switch to env providers.
    fn load_config_from_file(
        lookup: &dyn Fn(&str) -> Option<String>,
    ) -> Result<Option<ProviderRouterConfig>> {
        let path = match lookup(CONFIG_PATH_ENV).filter(|p| !p.trim().is_empty()) {
            Some(path) => PathBuf::from(path),
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !path.exists() {
                    return Ok(None);
                }
                path
            }
        };

        Self::read_config(&path).map(Some)
    }

    fn read_config(path: &Path) -> Result<ProviderRouterConfig> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read LLM config at {:?}", path))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Invalid LLM config JSON at {:?}", path))?;
        tracing::info!("Loaded LLM provider config from {:?}", path);
        Ok(config)
    }

    fn build_provider(
        name: &str,
        config: &ProviderConfig,
        lookup: &dyn Fn(&str) -> Option<String>,
    ) -> Arc<dyn GenerationProvider> {
        match config {
            ProviderConfig::Gemini {
                api_key,
                api_key_env,
                model,
                temperature,
                max_tokens,
            } => {
                let api_key = resolve_api_key(
                    api_key,
                    api_key_env,
                    &["GEMINI_API_KEY", "GOOGLE_API_KEY"],
                    lookup,
                );
                let model = model
                    .clone()
                    .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());
                let mut client = GeminiClient::new(api_key, model).with_name(name);
                if let Some(value) = *temperature {
                    client = client.with_temperature(value);
                }
                if let Some(value) = *max_tokens {
                    client = client.with_max_tokens(value);
                }
                Arc::new(client)
            }
            ProviderConfig::OpenAI {
                api_key,
                api_key_env,
                model,
                base_url,
                temperature,
                max_tokens,
            } => {
                let api_key = resolve_api_key(api_key, api_key_env, &["OPENAI_API_KEY"], lookup);
                let model = model
                    .clone()
                    .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string());
                let base_url = base_url
                    .clone()
                    .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string());
                let mut client = OpenAICompatibleClient::new(name, api_key, base_url, model)
                    .requiring_key();
                if let Some(value) = *temperature {
                    client = client.with_temperature(value);
                }
                if let Some(value) = *max_tokens {
                    client = client.with_max_tokens(value);
                }
                Arc::new(client)
            }
            ProviderConfig::OpenAICompatible {
                name: display_name,
                api_key,
                api_key_env,
                base_url,
                model,
                temperature,
                max_tokens,
                headers,
            } => {
                let api_key = resolve_api_key(api_key, api_key_env, &[], lookup);
                let display_name = display_name.clone().unwrap_or_else(|| name.to_string());
                let mut client = OpenAICompatibleClient::new(
                    display_name,
                    api_key,
                    base_url.clone(),
                    model.clone(),
                );
                if let Some(value) = *temperature {
                    client = client.with_temperature(value);
                }
                if let Some(value) = *max_tokens {
                    client = client.with_max_tokens(value);
                }
                if let Some(extra_headers) = headers {
                    for (key, value) in extra_headers {
                        client = client.with_header(key.clone(), value.clone());
                    }
                }
                Arc::new(client)
            }
            ProviderConfig::Mock => Arc::new(MockClient::new()),
        }
    }

    fn build_provider_from_env(
        name: &str,
        lookup: &dyn Fn(&str) -> Option<String>,
    ) -> Option<Arc<dyn GenerationProvider>> {
        match name {
            "gemini" => {
                let api_key = first_set(&["GEMINI_API_KEY", "GOOGLE_API_KEY"], lookup);
                let model =
                    lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());
                Some(Arc::new(GeminiClient::new(api_key, model)))
            }
            "openai" => {
                let api_key = first_set(&["OPENAI_API_KEY"], lookup);
                let model =
                    lookup("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string());
                let mut client = OpenAICompatibleClient::openai(api_key, model);
                if let Some(base_url) = lookup("OPENAI_BASE_URL") {
                    client = client.with_base_url(base_url);
                }
                Some(Arc::new(client))
            }
            _ => None,
        }
    }
}

/// First of `names` holding a non-blank value
fn first_set(names: &[&str], lookup: &dyn Fn(&str) -> Option<String>) -> Option<String> {
    names
        .iter()
        .filter_map(|name| lookup(*name))
        .find(|value| !value.trim().is_empty())
}

fn resolve_api_key(
    explicit: &Option<String>,
    env_hint: &Option<String>,
    default_envs: &[&str],
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Option<String> {
    if let Some(value) = explicit.clone() {
        return Some(value);
    }
    if let Some(env_name) = env_hint {
        if let Some(value) = first_set(&[env_name.as_str()], lookup) {
            return Some(value);
        }
    }
    first_set(default_envs, lookup)
}
