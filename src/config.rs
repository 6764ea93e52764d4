//! Application configuration management.
//!
//! Configuration is read from environment variables using the `envy` crate,
//! after an optional `.env` file has been loaded.

use serde::Deserialize;

/// Shortest temporary password recovery may issue.
pub const MIN_TEMPORARY_PASSWORD_LENGTH: usize = 6;

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read environment: {0}")]
    Env(#[from] envy::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (required): PostgreSQL connection string
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `MESSAGE_LOCALE` (optional): locale of response messages, defaults to "en"
/// - `MESSAGES_PATH` (optional): JSON file overriding individual messages
/// - `TEMPORARY_PASSWORD_LENGTH` (optional): length of issued temporary passwords, defaults to 10
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_locale")]
    pub message_locale: String,

    #[serde(default)]
    pub messages_path: Option<String>,

    #[serde(default = "default_temporary_password_length")]
    pub temporary_password_length: usize,
}

fn default_port() -> u16 {
    3000
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_temporary_password_length() -> usize {
    10
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file is loaded first if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is missing, a value cannot be
    /// parsed into its expected type, or a value is out of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = envy::from_env::<Config>()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject values that parse but cannot work.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.temporary_password_length < MIN_TEMPORARY_PASSWORD_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "TEMPORARY_PASSWORD_LENGTH must be at least {MIN_TEMPORARY_PASSWORD_LENGTH}, got {}",
                self.temporary_password_length
            )));
        }

        Ok(())
    }
}
