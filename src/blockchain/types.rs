//! Chain-specific types and error definitions.

use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::signature::Signature;
use thiserror::Error;

// Re-export ChainConfig from config module to avoid duplication
pub use crate::config::schema::ChainConfig;

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum ChainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Transaction was not confirmed within expected time.
    #[error("Transaction {signature} not confirmed after {secs} seconds")]
    ConfirmationTimeout { signature: Signature, secs: u64 },

    /// Transaction landed but failed on-chain.
    #[error("Transaction rejected: {0}")]
    Rejected(String),

    /// Invalid secret key format or derivation error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Transaction bytes could not be decoded, signed or encoded.
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),
}

/// Result type for blockchain operations.
pub type ChainResult<T> = Result<T, ChainError>;

/// One confirmed signature for an address, as reported by the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityRecord {
    /// Transaction signature (base58).
    pub signature: String,
    /// Block time in unix seconds, when the node knows it.
    pub block_time: Option<i64>,
}

/// Parse a commitment name from configuration.
///
/// Unknown names fall back to `confirmed`; validation rejects them earlier.
pub fn parse_commitment(name: &str) -> CommitmentConfig {
    match name {
        "processed" => CommitmentConfig::processed(),
        "finalized" => CommitmentConfig::finalized(),
        _ => CommitmentConfig::confirmed(),
    }
}
