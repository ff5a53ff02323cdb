//! In-memory [`ChainClient`] for unit tests.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;

use crate::blockchain::client::ChainClient;
use crate::blockchain::types::{ActivityRecord, ChainError, ChainResult};

#[derive(Debug, Default)]
pub struct MockChain {
    history: Vec<ActivityRecord>,
    history_error: bool,
    send_failures: u32,
    confirm_failures: u32,
    sends: AtomicU32,
    confirms: AtomicU32,
    history_calls: AtomicU32,
    payloads: Mutex<Vec<Vec<u8>>>,
}

impl MockChain {
    /// Signature history returned for every address, newest first.
    pub fn with_history(mut self, history: Vec<ActivityRecord>) -> Self {
        self.history = history;
        self
    }

    /// Make the signature fetch fail.
    pub fn failing_history(mut self) -> Self {
        self.history_error = true;
        self
    }

    /// Fail the first `n` broadcasts.
    pub fn failing_sends(mut self, n: u32) -> Self {
        self.send_failures = n;
        self
    }

    /// Fail the first `n` confirmations.
    pub fn failing_confirms(mut self, n: u32) -> Self {
        self.confirm_failures = n;
        self
    }

    pub fn send_calls(&self) -> u32 {
        self.sends.load(Ordering::SeqCst)
    }

    pub fn confirm_calls(&self) -> u32 {
        self.confirms.load(Ordering::SeqCst)
    }

    pub fn history_calls(&self) -> u32 {
        self.history_calls.load(Ordering::SeqCst)
    }

    pub fn sent_payloads(&self) -> Vec<Vec<u8>> {
        self.payloads.lock().unwrap().clone()
    }
}

/// `n` records stamped at `block_time`.
pub fn records_at(n: usize, block_time: i64) -> Vec<ActivityRecord> {
    (0..n)
        .map(|i| ActivityRecord {
            signature: format!("sig{}", i),
            block_time: Some(block_time),
        })
        .collect()
}

#[async_trait]
impl ChainClient for MockChain {
    async fn recent_signatures(&self, _address: &Pubkey, limit: usize) -> ChainResult<Vec<ActivityRecord>> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        if self.history_error {
            return Err(ChainError::Rpc("connection refused".to_string()));
        }
        Ok(self.history.iter().take(limit).cloned().collect())
    }

    async fn send_raw_transaction(&self, payload: &[u8]) -> ChainResult<Signature> {
        let n = self.sends.fetch_add(1, Ordering::SeqCst);
        self.payloads.lock().unwrap().push(payload.to_vec());
        if n < self.send_failures {
            return Err(ChainError::Rpc("blockhash not found".to_string()));
        }
        Ok(Signature::new_unique())
    }

    async fn confirm_transaction(&self, signature: &Signature) -> ChainResult<()> {
        let n = self.confirms.fetch_add(1, Ordering::SeqCst);
        if n < self.confirm_failures {
            return Err(ChainError::ConfirmationTimeout {
                signature: *signature,
                secs: 60,
            });
        }
        Ok(())
    }
}
