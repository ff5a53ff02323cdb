//! Run metrics.
//!
//! # Metrics
//! - `checkin_accounts_total` (counter): accounts by outcome (success, failed, skipped)
//! - `checkin_submission_attempts_total` (counter): broadcast attempts by result
//! - `checkin_gate_checks_total` (counter): gate decisions (skip, proceed, error)
//!
//! Without an installed recorder the `metrics` macros are no-ops. A run with
//! `observability.metrics_path` installs a Prometheus recorder and dumps the
//! text exposition to that file on exit, for a node-exporter textfile collector.

use std::path::Path;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub fn record_account_outcome(outcome: &'static str) {
    metrics::counter!("checkin_accounts_total", "outcome" => outcome).increment(1);
}

pub fn record_submission_attempt(result: &'static str) {
    metrics::counter!("checkin_submission_attempts_total", "result" => result).increment(1);
}

pub fn record_gate_decision(decision: &'static str) {
    metrics::counter!("checkin_gate_checks_total", "decision" => decision).increment(1);
}

/// Install the global Prometheus recorder.
pub fn install_recorder() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::error!(error = %e, "Failed to install metrics recorder");
            None
        }
    }
}

/// Write the current exposition to `path`, replacing any previous file.
pub fn write_snapshot(handle: &PrometheusHandle, path: &Path) -> std::io::Result<()> {
    std::fs::write(path, handle.render())
}
