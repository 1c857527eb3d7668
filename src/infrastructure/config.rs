//! Configuration management

use crate::domain::reminder::default_send_time;
use crate::error::{EstreiaError, Result};
use chrono::NaiveTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "estreia.toml";
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_API_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub api_timeout_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    /// IANA zone name; system local zone when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    /// Local send time for future reminders (HH:MM)
    pub send_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templates_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_timeout_ms: DEFAULT_API_TIMEOUT_MS,
            api_token: None,
            timezone: None,
            send_time: default_send_time().format("%H:%M").to_string(),
            recipient: None,
            templates_dir: None,
        }
    }
}

impl Config {
    /// Config file location: explicit path, then $ESTREIA_CONFIG, then ./estreia.toml
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os("ESTREIA_CONFIG").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Load config from a TOML file; a missing file yields defaults
    pub fn load(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
            Err(e) => return Err(EstreiaError::Io(e)),
        };

        toml::from_str(&contents).map_err(|e| {
            EstreiaError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Save config to a TOML file, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| EstreiaError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, contents)?;

        Ok(())
    }

    /// Apply ESTREIA_* environment variable overrides
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("ESTREIA_API_BASE_URL").filter(|v| !v.is_empty()) {
            self.api_base_url = url;
        }
        // Non-numeric or zero timeouts are ignored
        if let Some(timeout) = lookup("ESTREIA_API_TIMEOUT")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|v| *v > 0)
        {
            self.api_timeout_ms = timeout;
        }
        if let Some(token) = lookup("ESTREIA_API_TOKEN").filter(|v| !v.is_empty()) {
            self.api_token = Some(token);
        }
        if let Some(tz) = lookup("ESTREIA_TZ").filter(|v| !v.is_empty()) {
            self.timezone = Some(tz);
        }
        self
    }

    /// Configured send time
    pub fn send_time(&self) -> Result<NaiveTime> {
        parse_send_time(&self.send_time)
    }

    /// Configured zone, or None for the system local zone
    pub fn timezone(&self) -> Result<Option<Tz>> {
        self.timezone.as_deref().map(parse_timezone).transpose()
    }
}

/// Parse a send time given as HH:MM or HH:MM:SS
pub fn parse_send_time(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value.trim(), "%H:%M:%S"))
        .map_err(|_| {
            EstreiaError::Config(format!(
                "Invalid send_time: '{}'. Expected HH:MM (e.g., 09:00)",
                value
            ))
        })
}

/// Parse an IANA zone name (e.g., America/Sao_Paulo)
pub fn parse_timezone(value: &str) -> Result<Tz> {
    value
        .trim()
        .parse::<Tz>()
        .map_err(|_| EstreiaError::Config(format!("Unknown time zone: '{}'", value)))
}
