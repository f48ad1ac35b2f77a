use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{validation::ConfigValidator, ConfigResult};

pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Main service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound for an uploaded request body, in bytes
    pub max_payload_size: usize,
    pub model: ModelConfig,
    /// Overrides the built-in prompt when set
    pub prompt_file: Option<PathBuf>,
    pub log_dir: Option<String>,
    pub log_level: Option<String>,
}

/// External model connection settings
#[derive(Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default, skip_serializing)]
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    /// Applied to every outbound model call
    pub request_timeout_secs: u64,
}

// Keeps the credential out of logs.
impl std::fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl ModelConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout_secs: 60,
        }
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_payload_size: 20 * 1024 * 1024,
            model: ModelConfig::default(),
            prompt_file: None,
            log_dir: None,
            log_level: None,
        }
    }
}

impl AnalyzerConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            model: ModelConfig::new(api_key),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        ConfigValidator::validate(self)
    }
}
