//! Config management use case

use crate::error::{EstreiaError, Result};
use crate::infrastructure::config::{parse_send_time, parse_timezone};
use crate::infrastructure::Config;
use std::path::{Path, PathBuf};

const VALID_KEYS: &str =
    "api_base_url, api_timeout_ms, api_token, timezone, send_time, recipient, templates_dir";

/// Service for managing the configuration file
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// Create a new config service for the file at `path`
    pub fn new(path: PathBuf) -> Self {
        ConfigService { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get a single config value; unset optional values are empty
    pub fn get(&self, key: &str) -> Result<String> {
        let config = Config::load(&self.path)?;

        match key {
            "api_base_url" => Ok(config.api_base_url),
            "api_timeout_ms" => Ok(config.api_timeout_ms.to_string()),
            "api_token" => Ok(config.api_token.unwrap_or_default()),
            "timezone" => Ok(config.timezone.unwrap_or_default()),
            "send_time" => Ok(config.send_time),
            "recipient" => Ok(config.recipient.unwrap_or_default()),
            "templates_dir" => Ok(config
                .templates_dir
                .map(|p| p.display().to_string())
                .unwrap_or_default()),
            _ => Err(unknown_key(key)),
        }
    }

    /// Set a config value. An empty value clears optional keys.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut config = Config::load(&self.path)?;
        let value = value.trim();
        let optional = |v: &str| (!v.is_empty()).then(|| v.to_string());

        match key {
            "api_base_url" => {
                if !(value.starts_with("http://") || value.starts_with("https://")) {
                    return Err(EstreiaError::Config(format!(
                        "Invalid api_base_url: '{}'. Expected an http:// or https:// URL",
                        value
                    )));
                }
                config.api_base_url = value.to_string();
            }
            "api_timeout_ms" => {
                config.api_timeout_ms = value
                    .parse::<u64>()
                    .ok()
                    .filter(|v| *v > 0)
                    .ok_or_else(|| {
                        EstreiaError::Config(format!(
                            "Invalid api_timeout_ms: '{}'. Expected a positive number of milliseconds",
                            value
                        ))
                    })?;
            }
            "api_token" => config.api_token = optional(value),
            "timezone" => {
                if !value.is_empty() {
                    parse_timezone(value)?;
                }
                config.timezone = optional(value);
            }
            "send_time" => {
                let time = parse_send_time(value)?;
                config.send_time = time.format("%H:%M").to_string();
            }
            "recipient" => config.recipient = optional(value),
            "templates_dir" => config.templates_dir = optional(value).map(PathBuf::from),
            _ => return Err(unknown_key(key)),
        }

        config.save(&self.path)?;
        tracing::debug!(key, path = %self.path.display(), "config updated");
        Ok(())
    }

    /// List all config values
    pub fn list(&self) -> Result<Config> {
        Config::load(&self.path)
    }
}

fn unknown_key(key: &str) -> EstreiaError {
    EstreiaError::Config(format!(
        "Unknown config key: '{}'. Valid keys are: {}",
        key, VALID_KEYS
    ))
}
