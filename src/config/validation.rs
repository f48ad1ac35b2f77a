use url::Url;

use super::*;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(config: &AnalyzerConfig) -> ConfigResult<()> {
        Self::validate_server_settings(config)?;
        Self::validate_model(&config.model)?;

        if let Some(level) = &config.log_level {
            Self::validate_log_level(level)?;
        }

        Ok(())
    }

    fn validate_server_settings(config: &AnalyzerConfig) -> ConfigResult<()> {
        if config.host.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "host".to_string(),
            });
        }

        if config.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "port".to_string(),
                value: config.port.to_string(),
                reason: "Port must be > 0".to_string(),
            });
        }

        if config.max_payload_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_payload_size".to_string(),
                value: config.max_payload_size.to_string(),
                reason: "Must be > 0".to_string(),
            });
        }

        Ok(())
    }

    fn validate_model(model: &ModelConfig) -> ConfigResult<()> {
        if model.api_key.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "api_key (GEMINI_API_KEY)".to_string(),
            });
        }

        if model.model.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "model".to_string(),
            });
        }

        match Url::parse(&model.api_base) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => {
                return Err(ConfigError::InvalidValue {
                    field: "api_base".to_string(),
                    value: model.api_base.clone(),
                    reason: format!("Unsupported scheme '{}'", url.scheme()),
                })
            }
            Err(e) => {
                return Err(ConfigError::InvalidValue {
                    field: "api_base".to_string(),
                    value: model.api_base.clone(),
                    reason: e.to_string(),
                })
            }
        }

        if model.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_secs".to_string(),
                value: model.request_timeout_secs.to_string(),
                reason: "Must be > 0".to_string(),
            });
        }

        Ok(())
    }

    fn validate_log_level(level: &str) -> ConfigResult<()> {
        match level.to_ascii_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            _ => Err(ConfigError::InvalidValue {
                field: "log_level".to_string(),
                value: level.to_string(),
                reason: "Must be one of trace, debug, info, warn, error".to_string(),
            }),
        }
    }
}
