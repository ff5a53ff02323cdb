//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize, env overrides)
//!     → validation.rs (semantic checks)
//!     → CheckinConfig (validated, immutable for the run)
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; any failure is fatal
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    ApiConfig, BackoffKind, ChainConfig, CheckinConfig, GateConfig, KeysConfig, LogFormat,
    NotifyConfig, ObservabilityConfig, RunConfig, SubmissionConfig,
};
