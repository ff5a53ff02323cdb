//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Key file / environment (base58 secret keys)
//!     → wallet.rs (key loading, detached and partial signing)
//!     → client.rs (RPC connection with timeouts and failover)
//!     → transaction.rs (serialize once, broadcast, confirm, retry)
//! ```
//!
//! # Security Constraints
//! - Secret keys ONLY from the key file or environment
//! - Never log secret keys or auth tokens
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod transaction;
pub mod types;
pub mod wallet;

#[cfg(test)]
pub(crate) mod mock;

pub use client::{ChainClient, SolanaChainClient};
pub use transaction::{SubmissionError, TransactionSubmitter};
pub use types::{ActivityRecord, ChainConfig, ChainError, ChainResult};
pub use wallet::{Account, KeyStore};
