//! Gateway configuration

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use crate::error::GatewayError;
use crate::{DEFAULT_HOST, DEFAULT_PORT};

/// Per-attempt provider timeout used when nothing else is configured
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 30;

/// Main gateway configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Serve every request from the offline mock backend
    pub mock_mode: bool,

    /// Timeout for a single provider attempt, in seconds
    pub provider_timeout_secs: u64,

    /// Provider chain configuration file; environment variables are used when unset
    pub llm_config_path: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            mock_mode: false,
            provider_timeout_secs: DEFAULT_PROVIDER_TIMEOUT_SECS,
            llm_config_path: None,
        }
    }
}

impl GatewayConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the host
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_mock_mode(mut self, enabled: bool) -> Self {
        self.mock_mode = enabled;
        self
    }

    pub fn with_provider_timeout_secs(mut self, secs: u64) -> Self {
        self.provider_timeout_secs = secs;
        self
    }

    pub fn with_llm_config_path(mut self, path: impl Into<String>) -> Self {
        self.llm_config_path = Some(path.into());
        self
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> crate::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| GatewayError::InvalidConfig(format!("{}:{}: {}", self.host, self.port, e)))
    }

    /// Load configuration from a file, TOML when the extension says so and JSON otherwise
    pub fn from_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::from_str(&content)?,
            _ => serde_json::from_str(&content)?,
        };
        Ok(config)
    }

    /// Apply `BOOKGPT_HOST`, `PORT`, `BOOKGPT_MOCK_MODE` and
    /// `BOOKGPT_PROVIDER_TIMEOUT_SECS` from the process environment
    pub fn with_env_overrides(self) -> crate::Result<Self> {
        self.with_overrides_from(&|key: &str| std::env::var(key).ok())
    }

    /// Same as [`with_env_overrides`](Self::with_env_overrides) with an explicit lookup
    pub fn with_overrides_from(
        mut self,
        lookup: &dyn Fn(&str) -> Option<String>,
    ) -> crate::Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(host) = get("BOOKGPT_HOST") {
            self.host = host;
        }
        if let Some(port) = get("PORT") {
            self.port = port
                .parse()
                .map_err(|_| GatewayError::InvalidConfig(format!("PORT is not a port number: {}", port)))?;
        }
        if let Some(mock) = get("BOOKGPT_MOCK_MODE") {
            self.mock_mode = matches!(mock.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on");
        }
        if let Some(secs) = get("BOOKGPT_PROVIDER_TIMEOUT_SECS") {
            self.provider_timeout_secs = secs.parse().map_err(|_| {
                GatewayError::InvalidConfig(format!(
                    "BOOKGPT_PROVIDER_TIMEOUT_SECS is not a number of seconds: {}",
                    secs
                ))
            })?;
        }
        Ok(self)
    }
}
