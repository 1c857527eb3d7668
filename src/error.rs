//! Error types for estreia

use thiserror::Error;

/// Main error type for estreia
#[derive(Debug, Error)]
pub enum EstreiaError {
    #[error("Invalid release date: {0}")]
    InvalidReleaseDate(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Reminder error: {0}")]
    Reminder(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl EstreiaError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            EstreiaError::InvalidReleaseDate(_) => 3,
            EstreiaError::Api(_) => 4,
            EstreiaError::Config(_) => 5,
            _ => 1,
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn display_with_suggestions(&self) -> String {
        match self {
            EstreiaError::InvalidReleaseDate(input) => {
                format!(
                    "Invalid release date: '{}'\n\n\
                    Accepted formats:\n\
                    • Calendar date: YYYY-MM-DD (e.g., 2025-12-25)\n\
                    • Instant with offset: 2025-12-25T00:00:00.000Z\n\
                    • Local date-time: 2025-12-25T18:30:00\n\n\
                    Examples:\n\
                    estreia check 2025-12-25\n\
                    estreia delay 2025-12-25T00:00:00Z",
                    input
                )
            }
            EstreiaError::Api(msg) => {
                format!(
                    "{}\n\n\
                    Suggestions:\n\
                    • Check that the API is running: estreia config api_base_url\n\
                    • Set ESTREIA_API_TOKEN if the API requires authentication\n\
                    • Raise the timeout: estreia config api_timeout_ms 30000",
                    msg
                )
            }
            EstreiaError::Config(msg) => {
                if msg.contains("Unknown config key") {
                    format!(
                        "{}\n\n\
                        Example: estreia config send_time 09:00",
                        msg
                    )
                } else if msg.contains("time zone") {
                    format!(
                        "{}\n\n\
                        Use an IANA zone name, e.g. America/Sao_Paulo\n\
                        Example: estreia config timezone America/Sao_Paulo",
                        msg
                    )
                } else {
                    msg.clone()
                }
            }
            _ => self.to_string(),
        }
    }
}

/// Result type using EstreiaError
pub type Result<T> = std::result::Result<T, EstreiaError>;
