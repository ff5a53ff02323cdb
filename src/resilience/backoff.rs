//! Retry delay policies: fixed interval, or exponential backoff with jitter.

use rand::Rng;
use std::time::Duration;

use crate::config::{BackoffKind, SubmissionConfig};

/// Delay schedule between retry attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Same delay before every retry.
    Fixed(Duration),
    /// Doubling delay starting at `base`, capped at `max`, plus up to 10% jitter.
    Exponential { base: Duration, max: Duration },
}

impl Backoff {
    /// Build the policy described by the submission config.
    pub fn from_config(config: &SubmissionConfig) -> Self {
        match config.backoff {
            BackoffKind::Fixed => Backoff::Fixed(Duration::from_millis(config.retry_delay_ms)),
            BackoffKind::Exponential => Backoff::Exponential {
                base: Duration::from_millis(config.retry_delay_ms),
                max: Duration::from_millis(config.max_delay_ms),
            },
        }
    }

    /// Delay to wait after the given failed attempt (1-based).
    pub fn delay(&self, failed_attempt: u32) -> Duration {
        match *self {
            Backoff::Fixed(delay) => delay,
            Backoff::Exponential { base, max } => calculate_backoff(
                failed_attempt,
                base.as_millis() as u64,
                max.as_millis() as u64,
            ),
        }
    }
}

/// Calculate exponential backoff delay with jitter.
pub fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::from_millis(0);
    }

    let exponential_base = 2u64.saturating_pow(attempt - 1);
    let delay_ms = base_ms.saturating_mul(exponential_base);
    let capped_delay = delay_ms.min(max_ms);

    // Apply jitter (0 to 10% of the delay)
    let jitter_range = capped_delay / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped_delay + jitter)
}
