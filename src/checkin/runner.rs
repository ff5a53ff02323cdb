//! Sequential run over all accounts.
//!
//! Accounts are processed one at a time, in input order. Each account's flow
//! returns an outcome value; the stream of outcomes is collected and folded
//! into a [`RunReport`]. A panic inside one account's flow is caught and
//! recorded as a failure so the remaining accounts still run.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures_util::{stream, FutureExt, StreamExt};
use tracing::Instrument;
use uuid::Uuid;

use crate::blockchain::Account;
use crate::checkin::flow::CheckInFlow;
use crate::observability::metrics;
use crate::report::{AccountOutcome, RunReport};
use crate::resilience::Sleeper;

/// Drives [`CheckInFlow`] over an account list.
pub struct Runner {
    flow: CheckInFlow,
    sleeper: Arc<dyn Sleeper>,
    account_delay: Duration,
}

impl Runner {
    pub fn new(flow: CheckInFlow, sleeper: Arc<dyn Sleeper>, account_delay: Duration) -> Self {
        Self {
            flow,
            sleeper,
            account_delay,
        }
    }

    /// Process every account once and report. Never fails.
    pub async fn run(&self, accounts: &[Account]) -> RunReport {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        tracing::info!(run_id = %run_id, accounts = accounts.len(), "Check-in run starting");

        let outcomes: Vec<AccountOutcome> = stream::iter(accounts.iter().enumerate())
            .then(|(index, account)| self.process_one(index, accounts.len(), account))
            .collect()
            .await;

        let report = RunReport::new(run_id, started_at, Utc::now(), outcomes);
        tracing::info!(
            run_id = %run_id,
            success = report.summary.success,
            failed = report.summary.failed,
            skipped = report.summary.skipped,
            "{}",
            report.summary.render()
        );
        report
    }

    async fn process_one(&self, index: usize, total: usize, account: &Account) -> AccountOutcome {
        if index > 0 && !self.account_delay.is_zero() {
            self.sleeper.sleep(self.account_delay).await;
        }

        let address = account.address();
        let span = tracing::info_span!("account", n = index + 1, of = total, address = %address);

        let outcome = match AssertUnwindSafe(self.flow.process(account).instrument(span))
            .catch_unwind()
            .await
        {
            Ok(outcome) => outcome,
            Err(panic) => {
                let message = format!("unexpected failure: {}", panic_message(panic.as_ref()));
                tracing::error!(address = %address, "{}", message);
                AccountOutcome::failed(address, message)
            }
        };

        metrics::record_account_outcome(outcome.label());
        outcome
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic".to_string()
    }
}
