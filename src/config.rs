//! TagRelay configuration management

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main TagRelay configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagRelayConfig {
    /// Allowed CORS origins (empty = any origin)
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Intake service configuration
    #[serde(default)]
    pub intake: IntakeConfig,

    /// Enrichment service configuration
    #[serde(default)]
    pub enrichment: EnrichmentConfig,

    /// Messenger webhook configuration
    #[serde(default)]
    pub messenger: MessengerConfig,
}

impl TagRelayConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Render the configuration as pretty TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }
}

/// Intake service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Enrichment service endpoint that receives `{message}`
    pub enrichment_url: String,

    /// Optional timeout for the enrichment call in seconds (unset = client default)
    pub request_timeout_secs: Option<u64>,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            enrichment_url: "http://localhost:4000".to_string(),
            request_timeout_secs: None,
        }
    }
}

impl IntakeConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// Enrichment service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Completion model configuration
    pub model: ModelConfig,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4000,
            model: ModelConfig::default(),
        }
    }
}

/// Chat-completion provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// OpenAI-compatible API base URL
    pub base_url: String,

    /// Model identifier
    pub model: String,

    /// Output token limit per completion
    pub max_tokens: u32,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// Optional timeout for the completion call in seconds (unset = client default)
    pub request_timeout_secs: Option<u64>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "mixtral-8x7b-32768".to_string(),
            max_tokens: 100,
            api_key_env: "GROQ_API_KEY".to_string(),
            request_timeout_secs: None,
        }
    }
}

impl ModelConfig {
    /// Resolve the API key from the environment.
    ///
    /// Tries the configured variable name first, then its UPPER_CASE form.
    pub fn resolve_api_key(&self) -> Result<String> {
        resolve_env(&self.api_key_env).ok_or_else(|| {
            Error::Config(format!(
                "API key not found in environment variable {}",
                self.api_key_env
            ))
        })
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// Messenger webhook configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MessengerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Environment variable holding the webhook verify token
    pub verify_token_env: String,
}

impl Default for MessengerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            verify_token_env: "VERIFY_TOKEN".to_string(),
        }
    }
}

impl MessengerConfig {
    /// Resolve the verify token from the environment, if set
    pub fn resolve_verify_token(&self) -> Option<String> {
        resolve_env(&self.verify_token_env)
    }
}

fn resolve_env(name: &str) -> Option<String> {
    std::env::var(name)
        .or_else(|_| std::env::var(name.to_uppercase()))
        .ok()
        .filter(|v| !v.is_empty())
}
