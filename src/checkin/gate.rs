//! Daily activity gate.
//!
//! An account that already has `daily_quota` confirmed transactions since the
//! start of the local calendar day is skipped for this run.
//!
//! # Known limitation
//! Only the `fetch_limit` most recent signatures are inspected (100 by
//! default). The count is "same-day transactions among the last N", not an
//! unbounded daily count, so an account with exactly N same-day transactions
//! and a quota above N can never be gated.

use std::sync::Arc;

use chrono::{DateTime, Local, NaiveTime, TimeZone, Timelike};
use solana_sdk::pubkey::Pubkey;

use crate::blockchain::{ActivityRecord, ChainClient, ChainResult};
use crate::config::GateConfig;
use crate::observability::metrics;

/// Decides whether an account has already been active enough today.
#[derive(Clone)]
pub struct ActivityGate {
    chain: Arc<dyn ChainClient>,
    enabled: bool,
    daily_quota: usize,
    fetch_limit: usize,
}

impl ActivityGate {
    pub fn new(chain: Arc<dyn ChainClient>, daily_quota: usize, fetch_limit: usize) -> Self {
        Self {
            chain,
            enabled: true,
            daily_quota,
            fetch_limit,
        }
    }

    pub fn from_config(chain: Arc<dyn ChainClient>, config: &GateConfig) -> Self {
        Self {
            enabled: config.enabled,
            ..Self::new(chain, config.daily_quota, config.fetch_limit)
        }
    }

    /// Evaluate the gate for `address` as of now, in local time.
    pub async fn should_skip(&self, address: &Pubkey) -> ChainResult<bool> {
        self.should_skip_at(address, Local::now()).await
    }

    /// Evaluate the gate for `address` as of `now`. "Today" is the calendar
    /// day of `now` in its own time zone.
    pub async fn should_skip_at<Tz: TimeZone>(&self, address: &Pubkey, now: DateTime<Tz>) -> ChainResult<bool> {
        if !self.enabled {
            return Ok(false);
        }

        let records = match self.chain.recent_signatures(address, self.fetch_limit).await {
            Ok(records) => records,
            Err(e) => {
                metrics::record_gate_decision("error");
                return Err(e);
            }
        };

        let day_start = start_of_day(&now);
        let today = count_since(&records, day_start);
        let skip = today >= self.daily_quota;

        tracing::info!(
            address = %address,
            fetched = records.len(),
            today,
            quota = self.daily_quota,
            skip,
            "Activity gate evaluated"
        );
        metrics::record_gate_decision(if skip { "skip" } else { "proceed" });

        Ok(skip)
    }
}

/// Unix timestamp of midnight at the start of `now`'s calendar day.
pub fn start_of_day<Tz: TimeZone>(now: &DateTime<Tz>) -> i64 {
    let midnight = now.date_naive().and_time(NaiveTime::MIN);
    match now.timezone().from_local_datetime(&midnight).earliest() {
        Some(start) => start.timestamp(),
        // Midnight skipped by a DST jump; fall back to elapsed local seconds.
        None => now.timestamp() - i64::from(now.time().num_seconds_from_midnight()),
    }
}

/// Records stamped at or after `since`. Records without a block time are ignored.
pub fn count_since(records: &[ActivityRecord], since: i64) -> usize {
    records
        .iter()
        .filter(|r| r.block_time.is_some_and(|t| t >= since))
        .count()
}
