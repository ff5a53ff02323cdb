//! Signed transaction submission with bounded retry.
//!
//! # Responsibilities
//! - Serialize a signed transaction exactly once
//! - Broadcast and wait for confirmation
//! - Retry the same bytes on failure, sleeping between attempts
//!
//! Nothing is re-signed or rebuilt between attempts. A blockhash that expires
//! mid-retry therefore exhausts the budget rather than being refreshed.

use std::sync::Arc;

use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use thiserror::Error;

use crate::blockchain::client::ChainClient;
use crate::blockchain::types::ChainError;
use crate::config::SubmissionConfig;
use crate::observability::metrics;
use crate::resilience::{Backoff, Sleeper};

/// Submission gave up. Carries the last underlying chain error.
#[derive(Debug, Error)]
#[error("submission failed after {attempts} attempt(s): {last_error}")]
pub struct SubmissionError {
    /// Attempts actually made.
    pub attempts: u32,
    /// The failure of the final attempt.
    #[source]
    pub last_error: ChainError,
}

/// Submits signed transactions to a [`ChainClient`] with retry.
#[derive(Clone)]
pub struct TransactionSubmitter {
    chain: Arc<dyn ChainClient>,
    sleeper: Arc<dyn Sleeper>,
    max_attempts: u32,
    backoff: Backoff,
}

impl TransactionSubmitter {
    /// Create a submitter. `max_attempts` below 1 is raised to 1.
    pub fn new(
        chain: Arc<dyn ChainClient>,
        sleeper: Arc<dyn Sleeper>,
        max_attempts: u32,
        backoff: Backoff,
    ) -> Self {
        Self {
            chain,
            sleeper,
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// Create a submitter from the `[submission]` config section.
    pub fn from_config(
        chain: Arc<dyn ChainClient>,
        sleeper: Arc<dyn Sleeper>,
        config: &SubmissionConfig,
    ) -> Self {
        Self::new(chain, sleeper, config.max_attempts, Backoff::from_config(config))
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Serialize `tx` once and submit it until confirmed or out of attempts.
    pub async fn submit(&self, tx: &Transaction) -> Result<Signature, SubmissionError> {
        let payload = bincode::serialize(tx).map_err(|e| SubmissionError {
            attempts: 0,
            last_error: ChainError::InvalidTransaction(format!("Serialization failed: {}", e)),
        })?;

        self.submit_payload(&payload).await
    }

    /// Submit already serialized transaction bytes.
    pub async fn submit_payload(&self, payload: &[u8]) -> Result<Signature, SubmissionError> {
        let mut attempt = 0;

        loop {
            attempt += 1;

            let error = match self.try_once(payload).await {
                Ok(signature) => {
                    metrics::record_submission_attempt("confirmed");
                    tracing::info!(signature = %signature, attempt, "Transaction confirmed");
                    return Ok(signature);
                }
                Err(e) => e,
            };

            metrics::record_submission_attempt("failed");

            if attempt >= self.max_attempts {
                tracing::error!(attempts = attempt, error = %error, "Submission attempts exhausted");
                return Err(SubmissionError {
                    attempts: attempt,
                    last_error: error,
                });
            }

            let delay = self.backoff.delay(attempt);
            tracing::warn!(
                attempt,
                max_attempts = self.max_attempts,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "Submission attempt failed, retrying"
            );
            self.sleeper.sleep(delay).await;
        }
    }

    async fn try_once(&self, payload: &[u8]) -> Result<Signature, ChainError> {
        let signature = self.chain.send_raw_transaction(payload).await?;
        tracing::debug!(signature = %signature, "Transaction broadcast, awaiting confirmation");
        self.chain.confirm_transaction(&signature).await?;
        Ok(signature)
    }
}
