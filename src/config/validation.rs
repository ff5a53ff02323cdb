//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate URLs, value ranges and notification settings
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: CheckinConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;

use crate::config::schema::CheckinConfig;

/// A single semantic problem with a configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g. "api.base_url").
    pub field: &'static str,
    /// What is wrong with it.
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &CheckinConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.api.base_url.is_empty() {
        errors.push(ValidationError::new("api.base_url", "must be set"));
    } else if let Err(e) = url::Url::parse(&config.api.base_url) {
        errors.push(ValidationError::new("api.base_url", format!("invalid URL: {}", e)));
    }

    for (field, path) in [
        ("api.challenge_path", &config.api.challenge_path),
        ("api.authorize_path", &config.api.authorize_path),
        ("api.checkin_transaction_path", &config.api.checkin_transaction_path),
        ("api.checkin_path", &config.api.checkin_path),
    ] {
        if !path.starts_with('/') {
            errors.push(ValidationError::new(field, "must start with '/'"));
        }
    }

    if config.api.timeout_secs == 0 {
        errors.push(ValidationError::new("api.timeout_secs", "must be greater than 0"));
    }

    if let Err(e) = url::Url::parse(&config.chain.rpc_url) {
        errors.push(ValidationError::new("chain.rpc_url", format!("invalid URL: {}", e)));
    }

    if !matches!(
        config.chain.commitment.as_str(),
        "processed" | "confirmed" | "finalized"
    ) {
        errors.push(ValidationError::new(
            "chain.commitment",
            format!("unknown commitment '{}'", config.chain.commitment),
        ));
    }

    if config.chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("chain.rpc_timeout_secs", "must be greater than 0"));
    }

    if config.chain.poll_interval_ms == 0 {
        errors.push(ValidationError::new("chain.poll_interval_ms", "must be greater than 0"));
    }

    if config.gate.daily_quota == 0 {
        errors.push(ValidationError::new("gate.daily_quota", "must be greater than 0"));
    }

    if config.gate.fetch_limit == 0 || config.gate.fetch_limit > 1000 {
        errors.push(ValidationError::new("gate.fetch_limit", "must be between 1 and 1000"));
    }

    if config.submission.max_attempts == 0 {
        errors.push(ValidationError::new("submission.max_attempts", "must be at least 1"));
    }

    if config.submission.max_delay_ms < config.submission.retry_delay_ms {
        errors.push(ValidationError::new(
            "submission.max_delay_ms",
            "must not be smaller than retry_delay_ms",
        ));
    }

    if config.run.summary_path.is_empty() {
        errors.push(ValidationError::new("run.summary_path", "must be set"));
    }

    if config.notify.enabled {
        if config.notify.bot_token.is_empty() {
            errors.push(ValidationError::new("notify.bot_token", "required when notify is enabled"));
        }
        if config.notify.chat_id.is_empty() {
            errors.push(ValidationError::new("notify.chat_id", "required when notify is enabled"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
