//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for a check-in run.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for a check-in run.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CheckinConfig {
    /// Rewards API endpoints.
    pub api: ApiConfig,

    /// Blockchain RPC settings.
    pub chain: ChainConfig,

    /// Daily activity gate.
    pub gate: GateConfig,

    /// Transaction submission retry policy.
    pub submission: SubmissionConfig,

    /// Where the account keys come from.
    pub keys: KeysConfig,

    /// Run-level settings (summary sink, pacing).
    pub run: RunConfig,

    /// Optional end-of-run notification.
    #[serde(default)]
    pub notify: NotifyConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Rewards API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the rewards API (e.g., "https://rewards.example.com").
    pub base_url: String,

    /// Challenge endpoint, queried with `?wallet=<address>`.
    pub challenge_path: String,

    /// Authorize endpoint receiving the signed challenge.
    pub authorize_path: String,

    /// Endpoint returning the unsigned check-in transaction.
    pub checkin_transaction_path: String,

    /// Endpoint confirming a submitted check-in.
    pub checkin_path: String,

    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,

    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            challenge_path: "/auth/challenge".to_string(),
            authorize_path: "/auth/authorize".to_string(),
            checkin_transaction_path: "/checkin/transaction".to_string(),
            checkin_path: "/checkin".to_string(),
            timeout_secs: 30,
            user_agent: concat!("daily-checkin/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Blockchain connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs, tried in order for reads.
    #[serde(default)]
    pub failover_urls: Vec<String>,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Commitment level: "processed", "confirmed" or "finalized".
    pub commitment: String,

    /// Maximum time to wait for a submitted transaction to confirm.
    pub confirmation_timeout_secs: u64,

    /// Interval between signature status polls in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://api.devnet.solana.com".to_string(),
            failover_urls: Vec::new(),
            rpc_timeout_secs: 30,
            commitment: "confirmed".to_string(),
            confirmation_timeout_secs: 60,
            poll_interval_ms: 1000,
        }
    }
}

/// Daily activity gate configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GateConfig {
    /// Enable the gate. When disabled every account proceeds.
    pub enabled: bool,

    /// Same-day transaction count at which the check-in is skipped.
    pub daily_quota: usize,

    /// Number of most recent signatures fetched per address.
    pub fetch_limit: usize,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            daily_quota: 100,
            fetch_limit: 100,
        }
    }
}

/// Backoff strategy between submission attempts.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackoffKind {
    /// Same delay before every retry.
    #[default]
    Fixed,
    /// Doubling delay with jitter, capped at `max_delay_ms`.
    Exponential,
}

/// Transaction submission configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SubmissionConfig {
    /// Total number of broadcast attempts (at least 1).
    pub max_attempts: u32,

    /// Delay between attempts in milliseconds (base delay for exponential).
    pub retry_delay_ms: u64,

    /// Backoff strategy.
    pub backoff: BackoffKind,

    /// Upper bound on a single exponential delay in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            max_attempts: 8,
            retry_delay_ms: 1000,
            backoff: BackoffKind::Fixed,
            max_delay_ms: 8000,
        }
    }
}

/// Key source configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct KeysConfig {
    /// Path to the key file (JSON array or one base58 key per line).
    pub path: String,
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            path: "private_keys.json".to_string(),
        }
    }
}

/// Run-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RunConfig {
    /// Summary JSON file, overwritten each run.
    pub summary_path: String,

    /// Pause between accounts in milliseconds.
    pub account_delay_ms: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            summary_path: "summary.json".to_string(),
            account_delay_ms: 0,
        }
    }
}

/// Telegram notification configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Send the run summary when the run completes.
    pub enabled: bool,

    /// Telegram Bot API base URL.
    pub api_base: String,

    /// Bot token. Prefer `CHECKIN_TELEGRAM_BOT_TOKEN` over the file.
    pub bot_token: String,

    /// Destination chat id.
    pub chat_id: String,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_base: "https://api.telegram.org".to_string(),
            bot_token: String::new(),
            chat_id: String::new(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Write Prometheus text exposition here at end of run.
    pub metrics_path: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_path: None,
        }
    }
}
