//! daily-checkin
//!
//! Runs the daily check-in once for every configured account, then exits.
//!
//! # Architecture Overview
//!
//! ```text
//!   config.toml ──▶ config ──┐
//!   key file    ──▶ KeyStore ┤
//!                            ▼
//!                      lifecycle::App
//!                            │
//!            ┌───────────────┼─────────────────────────────┐
//!            ▼               ▼                             ▼
//!     ActivityGate      AuthSession ── rewards API   TransactionSubmitter
//!     (RPC signatures)  (challenge/authorize)        (RPC send + confirm, retry)
//!            └───────────────┴──────── CheckInFlow ────────┘
//!                                          │ AccountOutcome per account
//!                                          ▼
//!                 RunReport ──▶ summary.json, Telegram, metrics textfile
//! ```
//!
//! The exit code is non-zero only when startup fails (config, keys, clients).
//! Per-account failures are reported in the summary instead.

use std::path::{Path, PathBuf};

use clap::Parser;
use daily_checkin::blockchain::KeyStore;
use daily_checkin::config::{load_config, CheckinConfig, ObservabilityConfig};
use daily_checkin::lifecycle::{App, StartupError};
use daily_checkin::observability::{logging, metrics};

#[derive(Parser, Debug)]
#[command(name = "daily-checkin", version)]
#[command(about = "Run the daily rewards check-in for every configured account", long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, env = "CHECKIN_CONFIG", default_value = "config.toml")]
    config: PathBuf,

    /// Key file, overriding `keys.path` and `CHECKIN_PRIVATE_KEYS`.
    #[arg(short, long)]
    keys: Option<PathBuf>,

    /// Summary output file, overriding `run.summary_path`.
    #[arg(short, long)]
    summary: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match load_config(&args.config) {
        Ok(config) => config,
        Err(e) => {
            logging::init_logging(&ObservabilityConfig::default());
            tracing::error!(config = %args.config.display(), error = %e, "Failed to load configuration");
            return Err(e.into());
        }
    };
    let config = apply_cli_overrides(config, &args);

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "daily-checkin starting");

    // An explicit --keys beats CHECKIN_PRIVATE_KEYS; the configured path does not.
    let keys = match &args.keys {
        Some(path) => KeyStore::from_file(path),
        None => KeyStore::load(Path::new(&config.keys.path)),
    };
    let keys = match keys {
        Ok(keys) => keys,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load keys");
            return Err(e.into());
        }
    };

    let metrics_handle = config
        .observability
        .metrics_path
        .as_ref()
        .and_then(|_| metrics::install_recorder());

    let mut app = App::build(config, keys).map_err(|e: StartupError| {
        tracing::error!(error = %e, "Startup failed");
        e
    })?;
    if let Some(handle) = metrics_handle {
        app = app.with_metrics(handle);
    }

    let report = app.run().await;
    println!("{}", report.summary.render());

    tracing::info!("Run complete");
    Ok(())
}

fn apply_cli_overrides(mut config: CheckinConfig, args: &Args) -> CheckinConfig {
    if let Some(keys) = &args.keys {
        config.keys.path = keys.display().to_string();
    }
    if let Some(summary) = &args.summary {
        config.run.summary_path = summary.display().to_string();
    }
    config
}
