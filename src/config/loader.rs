//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::CheckinConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `notify.bot_token`.
pub const TELEGRAM_TOKEN_ENV_VAR: &str = "CHECKIN_TELEGRAM_BOT_TOKEN";

/// Fatal startup errors. Any of these halts the process.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("Key error: {0}")]
    Keys(String),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<CheckinConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let mut config: CheckinConfig = toml::from_str(&content)?;

    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Pull secrets that should not live in the config file from the environment.
pub fn apply_env_overrides(config: &mut CheckinConfig) {
    if let Ok(token) = std::env::var(TELEGRAM_TOKEN_ENV_VAR) {
        if !token.trim().is_empty() {
            config.notify.bot_token = token.trim().to_string();
        }
    }
}
