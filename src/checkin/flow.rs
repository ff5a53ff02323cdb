//! Per-account check-in state machine.
//!
//! ```text
//! Start ──gate──▶ GateChecked ──auth──▶ Authenticated ──fetch──▶ TxFetched
//!   │                                                              │
//!   └─ quota reached: Skipped ─▶ Done          sign + submit (retry) ▼
//!                                      Done ◀── Reported ◀──report── TxSubmitted
//!
//! Any error moves to Failed, which yields a Failed outcome for this account.
//! ```

use std::fmt;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use solana_sdk::transaction::Transaction;
use thiserror::Error;

use crate::blockchain::{Account, ChainError, SubmissionError, TransactionSubmitter};
use crate::checkin::gate::ActivityGate;
use crate::report::AccountOutcome;
use crate::rewards::{ApiError, AuthSession, RewardsApi};

/// Why one account's check-in stopped. Never escapes the account boundary.
#[derive(Debug, Error)]
pub enum CheckInError {
    #[error("activity check failed: {0}")]
    Gate(#[source] ChainError),

    #[error("authentication failed: {0}")]
    Auth(#[source] ApiError),

    #[error("fetching check-in transaction failed: {0}")]
    Fetch(#[source] ApiError),

    #[error("invalid check-in transaction: {0}")]
    Transaction(String),

    #[error(transparent)]
    Submission(#[from] SubmissionError),

    #[error("check-in report failed: {0}")]
    Report(#[source] ApiError),
}

/// Where an account is in its check-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Start,
    GateChecked,
    Authenticated,
    TxFetched,
    TxSubmitted,
    Reported,
    Done,
    Failed,
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Runs the check-in for one account at a time.
#[derive(Clone)]
pub struct CheckInFlow {
    gate: ActivityGate,
    auth: AuthSession,
    api: Arc<dyn RewardsApi>,
    submitter: TransactionSubmitter,
}

impl CheckInFlow {
    pub fn new(
        gate: ActivityGate,
        api: Arc<dyn RewardsApi>,
        submitter: TransactionSubmitter,
    ) -> Self {
        Self {
            gate,
            auth: AuthSession::new(api.clone()),
            api,
            submitter,
        }
    }

    /// Process one account. Always returns an outcome.
    pub async fn process(&self, account: &Account) -> AccountOutcome {
        let address = account.address();
        let mut state = FlowState::Start;

        match self.execute(account, &mut state).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(address = %address, state = %state, error = %e, "Check-in failed");
                transition(&mut state, FlowState::Failed);
                AccountOutcome::failed(address, e.to_string())
            }
        }
    }

    async fn execute(&self, account: &Account, state: &mut FlowState) -> Result<AccountOutcome, CheckInError> {
        let address = account.address();

        if self.gate.should_skip(&address).await.map_err(CheckInError::Gate)? {
            tracing::info!(address = %address, "Daily activity quota reached, skipping");
            transition(state, FlowState::Done);
            return Ok(AccountOutcome::skipped(address));
        }
        transition(state, FlowState::GateChecked);

        let token = self.auth.authenticate(account).await.map_err(CheckInError::Auth)?;
        transition(state, FlowState::Authenticated);

        let encoded = self.api.checkin_transaction(&token).await.map_err(CheckInError::Fetch)?;
        let mut tx = decode_transaction(&encoded)?;
        transition(state, FlowState::TxFetched);

        account
            .partial_sign(&mut tx)
            .map_err(|e| CheckInError::Transaction(e.to_string()))?;
        let signature = self.submitter.submit(&tx).await?;
        transition(state, FlowState::TxSubmitted);

        let status = self
            .api
            .report_checkin(&token, &signature.to_string())
            .await
            .map_err(CheckInError::Report)?;
        transition(state, FlowState::Reported);

        tracing::info!(address = %address, signature = %signature, "Check-in complete");
        transition(state, FlowState::Done);
        Ok(AccountOutcome::success(address, signature.to_string(), status))
    }
}

fn transition(state: &mut FlowState, next: FlowState) {
    tracing::debug!(from = %state, to = %next, "Check-in state");
    *state = next;
}

/// Decode the API's base64 bincode transaction.
pub fn decode_transaction(encoded: &str) -> Result<Transaction, CheckInError> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| CheckInError::Transaction(format!("bad base64: {}", e)))?;
    bincode::deserialize(&bytes).map_err(|e| CheckInError::Transaction(format!("bad encoding: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::mock::{records_at, MockChain};
    use crate::config::SubmissionConfig;
    use crate::resilience::retries::mock::RecordingSleeper;
    use crate::rewards::mock::{unsigned_checkin_tx, MockApi};
    use solana_sdk::signature::{Keypair, Signer};

    struct Harness {
        flow: CheckInFlow,
        chain: Arc<MockChain>,
        api: Arc<MockApi>,
    }

    fn harness(chain: MockChain, api: MockApi) -> Harness {
        let chain = Arc::new(chain);
        let api = Arc::new(api);
        let gate = ActivityGate::new(chain.clone(), 100, 100);
        let submitter = TransactionSubmitter::from_config(
            chain.clone(),
            Arc::new(RecordingSleeper::default()),
            &SubmissionConfig::default(),
        );
        Harness {
            flow: CheckInFlow::new(gate, api.clone(), submitter),
            chain,
            api,
        }
    }

    fn account() -> Account {
        Account::from_keypair(Keypair::new())
    }

    #[tokio::test]
    async fn test_full_flow_success() {
        let h = harness(MockChain::default(), MockApi::default());
        let account = account();

        let outcome = h.flow.process(&account).await;

        let AccountOutcome::Success { address, signature, status } = outcome else {
            panic!("expected success");
        };
        assert_eq!(address, account.address().to_string());
        assert_eq!(h.api.reported_signatures(), vec![signature]);
        assert_eq!(status["checked"], true);
        assert_eq!(h.chain.send_calls(), 1);
    }

    #[tokio::test]
    async fn test_submitted_payload_carries_account_signature() {
        let h = harness(MockChain::default(), MockApi::default());
        let account = account();
        h.flow.process(&account).await;

        let payload = &h.chain.sent_payloads()[0];
        let tx: Transaction = bincode::deserialize(payload).unwrap();
        assert!(tx.verify().is_ok());
        assert_eq!(tx.message.account_keys[0], account.address());
    }

    #[tokio::test]
    async fn test_quota_short_circuits() {
        let now = chrono::Local::now().timestamp();
        let h = harness(MockChain::default().with_history(records_at(150, now)), MockApi::default());

        let outcome = h.flow.process(&account()).await;

        assert!(matches!(outcome, AccountOutcome::Skipped { .. }));
        assert_eq!(h.api.challenge_calls(), 0);
        assert_eq!(h.chain.send_calls(), 0);
    }

    #[tokio::test]
    async fn test_gate_error_fails_account() {
        let h = harness(MockChain::default().failing_history(), MockApi::default());
        let outcome = h.flow.process(&account()).await;

        let AccountOutcome::Failed { message, .. } = outcome else {
            panic!("expected failure");
        };
        assert!(message.starts_with("activity check failed"));
        assert_eq!(h.api.challenge_calls(), 0);
    }

    #[tokio::test]
    async fn test_auth_error_keeps_server_message() {
        let h = harness(MockChain::default(), MockApi::default().failing_authorize("wallet not eligible"));
        let outcome = h.flow.process(&account()).await;

        let AccountOutcome::Failed { message, .. } = outcome else {
            panic!("expected failure");
        };
        assert!(message.contains("authentication failed"));
        assert!(message.contains("wallet not eligible"));
        assert_eq!(h.chain.send_calls(), 0);
    }

    #[tokio::test]
    async fn test_fetch_error() {
        let h = harness(MockChain::default(), MockApi::default().failing_transaction("maintenance"));
        let outcome = h.flow.process(&account()).await;
        assert!(matches!(outcome, AccountOutcome::Failed { ref message, .. } if message.contains("maintenance")));
    }

    #[tokio::test]
    async fn test_undecodable_transaction() {
        let h = harness(MockChain::default(), MockApi::default().garbage_transaction());
        let outcome = h.flow.process(&account()).await;
        assert!(matches!(outcome, AccountOutcome::Failed { ref message, .. } if message.contains("invalid check-in transaction")));
        assert_eq!(h.chain.send_calls(), 0);
    }

    #[tokio::test]
    async fn test_submission_exhausted_skips_report() {
        let h = harness(MockChain::default().failing_sends(u32::MAX), MockApi::default());
        let outcome = h.flow.process(&account()).await;

        assert!(matches!(outcome, AccountOutcome::Failed { ref message, .. } if message.contains("after 8 attempt(s)")));
        assert_eq!(h.chain.send_calls(), 8);
        assert!(h.api.reported_signatures().is_empty());
    }

    #[tokio::test]
    async fn test_report_error() {
        let h = harness(MockChain::default(), MockApi::default().failing_report("already checked in"));
        let outcome = h.flow.process(&account()).await;

        assert!(matches!(outcome, AccountOutcome::Failed { ref message, .. } if message.contains("already checked in")));
        assert_eq!(h.chain.send_calls(), 1);
    }

    #[test]
    fn test_decode_transaction() {
        let signer = Keypair::new();
        let tx = unsigned_checkin_tx(&signer.pubkey());
        let encoded = STANDARD.encode(bincode::serialize(&tx).unwrap());
        assert_eq!(decode_transaction(&encoded).unwrap(), tx);
        assert!(decode_transaction("%%%").is_err());
    }
}
