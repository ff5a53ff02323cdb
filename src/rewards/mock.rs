//! In-memory [`RewardsApi`] for unit tests.

use std::collections::HashSet;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::transaction::Transaction;

use crate::rewards::client::RewardsApi;
use crate::rewards::types::{ApiError, ApiResult, AuthToken, AuthorizeRequest};

#[derive(Debug, Default)]
pub struct MockApi {
    challenge_error: Option<String>,
    authorize_error: Option<String>,
    /// Addresses whose authorize call fails. Empty means all of them.
    authorize_error_for: HashSet<String>,
    transaction_error: Option<String>,
    garbage_transaction: bool,
    report_error: Option<String>,
    /// Addresses whose challenge call panics.
    panic_for: HashSet<String>,
    challenges: AtomicU32,
    authorized: Mutex<Vec<AuthorizeRequest>>,
    reported: Mutex<Vec<String>>,
}

impl MockApi {
    pub fn failing_challenge(mut self, message: &str) -> Self {
        self.challenge_error = Some(message.to_string());
        self
    }

    pub fn failing_authorize(mut self, message: &str) -> Self {
        self.authorize_error = Some(message.to_string());
        self
    }

    pub fn failing_authorize_for(mut self, address: &Pubkey, message: &str) -> Self {
        self.authorize_error = Some(message.to_string());
        self.authorize_error_for.insert(address.to_string());
        self
    }

    pub fn failing_transaction(mut self, message: &str) -> Self {
        self.transaction_error = Some(message.to_string());
        self
    }

    pub fn garbage_transaction(mut self) -> Self {
        self.garbage_transaction = true;
        self
    }

    pub fn failing_report(mut self, message: &str) -> Self {
        self.report_error = Some(message.to_string());
        self
    }

    pub fn panicking_for(mut self, address: &Pubkey) -> Self {
        self.panic_for.insert(address.to_string());
        self
    }

    pub fn challenge_calls(&self) -> u32 {
        self.challenges.load(Ordering::SeqCst)
    }

    pub fn authorize_requests(&self) -> Vec<AuthorizeRequest> {
        self.authorized.lock().unwrap().clone()
    }

    pub fn reported_signatures(&self) -> Vec<String> {
        self.reported.lock().unwrap().clone()
    }
}

fn status(endpoint: &str, status: u16, message: &str) -> ApiError {
    ApiError::Status {
        endpoint: endpoint.to_string(),
        status,
        message: Some(message.to_string()),
    }
}

/// Unsigned transaction that needs `signer`'s signature.
pub fn unsigned_checkin_tx(signer: &Pubkey) -> Transaction {
    let ix = Instruction::new_with_bytes(
        Pubkey::new_unique(),
        b"daily check-in",
        vec![AccountMeta::new(*signer, true)],
    );
    Transaction::new_with_payer(&[ix], Some(signer))
}

#[async_trait]
impl RewardsApi for MockApi {
    async fn challenge(&self, address: &str) -> ApiResult<String> {
        self.challenges.fetch_add(1, Ordering::SeqCst);
        if self.panic_for.contains(address) {
            panic!("challenge handler crashed for {}", address);
        }
        match &self.challenge_error {
            Some(message) => Err(status("challenge", 400, message)),
            None => Ok(format!("sign in as {}", address)),
        }
    }

    async fn authorize(&self, request: &AuthorizeRequest) -> ApiResult<AuthToken> {
        self.authorized.lock().unwrap().push(request.clone());
        if let Some(message) = &self.authorize_error {
            if self.authorize_error_for.is_empty() || self.authorize_error_for.contains(&request.address) {
                return Err(status("authorize", 401, message));
            }
        }
        Ok(AuthToken::new(format!("token-{}", request.address)))
    }

    async fn checkin_transaction(&self, token: &AuthToken) -> ApiResult<String> {
        if let Some(message) = &self.transaction_error {
            return Err(status("checkin transaction", 500, message));
        }
        if self.garbage_transaction {
            return Ok(STANDARD.encode(b"definitely not a transaction"));
        }
        let address = token.as_str().trim_start_matches("token-");
        let signer = Pubkey::from_str(address).expect("mock token carries the address");
        let bytes = bincode::serialize(&unsigned_checkin_tx(&signer)).unwrap();
        Ok(STANDARD.encode(bytes))
    }

    async fn report_checkin(&self, _token: &AuthToken, signature: &str) -> ApiResult<serde_json::Value> {
        self.reported.lock().unwrap().push(signature.to_string());
        match &self.report_error {
            Some(message) => Err(status("checkin", 409, message)),
            None => Ok(serde_json::json!({ "checked": true, "accumulative_days": 3 })),
        }
    }
}
