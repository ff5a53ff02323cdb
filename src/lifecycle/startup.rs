//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize all subsystems in dependency order from a validated config
//! - Run the accounts once, then flush the summary, notification and metrics sinks
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Nothing after startup can fail the process; sink errors are logged

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusHandle;
use thiserror::Error;

use crate::blockchain::{ChainClient, ChainError, KeyStore, SolanaChainClient, TransactionSubmitter};
use crate::checkin::{ActivityGate, CheckInFlow, Runner};
use crate::config::{CheckinConfig, ConfigError};
use crate::observability::metrics;
use crate::report::notify::NotifyError;
use crate::report::{notify_best_effort, Notifier, RunReport, TelegramNotifier};
use crate::resilience::{Sleeper, TokioSleeper};
use crate::rewards::{ApiError, HttpRewardsApi, RewardsApi};

/// Anything that stops the process before the first account is processed.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("chain client: {0}")]
    Chain(#[from] ChainError),

    #[error("rewards client: {0}")]
    Api(#[from] ApiError),

    #[error("notifier: {0}")]
    Notify(#[from] NotifyError),
}

/// A fully wired run.
pub struct App {
    config: CheckinConfig,
    keys: KeyStore,
    runner: Runner,
    notifier: Option<Box<dyn Notifier>>,
    metrics: Option<PrometheusHandle>,
}

impl App {
    /// Wire real RPC and HTTP clients from configuration.
    pub fn build(config: CheckinConfig, keys: KeyStore) -> Result<Self, StartupError> {
        let chain: Arc<dyn ChainClient> = Arc::new(SolanaChainClient::new(config.chain.clone())?);
        let api: Arc<dyn RewardsApi> = Arc::new(HttpRewardsApi::new(config.api.clone())?);
        let sleeper: Arc<dyn Sleeper> = Arc::new(TokioSleeper);

        let notifier: Option<Box<dyn Notifier>> = if config.notify.enabled {
            Some(Box::new(TelegramNotifier::new(&config.notify)?))
        } else {
            None
        };

        Ok(Self::with_components(config, keys, chain, api, sleeper, notifier))
    }

    /// Wire the run from already built components.
    pub fn with_components(
        config: CheckinConfig,
        keys: KeyStore,
        chain: Arc<dyn ChainClient>,
        api: Arc<dyn RewardsApi>,
        sleeper: Arc<dyn Sleeper>,
        notifier: Option<Box<dyn Notifier>>,
    ) -> Self {
        let gate = ActivityGate::from_config(chain.clone(), &config.gate);
        let submitter = TransactionSubmitter::from_config(chain, sleeper.clone(), &config.submission);
        let flow = CheckInFlow::new(gate, api, submitter);
        let runner = Runner::new(
            flow,
            sleeper,
            Duration::from_millis(config.run.account_delay_ms),
        );

        tracing::info!(
            accounts = keys.len(),
            quota = config.gate.daily_quota,
            max_attempts = config.submission.max_attempts,
            "Subsystems initialized"
        );

        Self {
            config,
            keys,
            runner,
            notifier,
            metrics: None,
        }
    }

    /// Dump metrics to `observability.metrics_path` at the end of the run.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Process every account once and flush the sinks.
    pub async fn run(self) -> RunReport {
        let report = self.runner.run(self.keys.accounts()).await;

        let summary_path = Path::new(&self.config.run.summary_path);
        match report.write_json(summary_path) {
            Ok(()) => tracing::info!(path = %summary_path.display(), "Summary written"),
            Err(e) => tracing::error!(path = %summary_path.display(), error = %e, "Failed to write summary"),
        }

        if let Some(notifier) = &self.notifier {
            notify_best_effort(notifier.as_ref(), &report.render_message()).await;
        }

        if let (Some(handle), Some(path)) = (&self.metrics, &self.config.observability.metrics_path) {
            if let Err(e) = metrics::write_snapshot(handle, Path::new(path)) {
                tracing::error!(path = %path, error = %e, "Failed to write metrics");
            }
        }

        report
    }
}
