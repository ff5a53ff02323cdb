//! Account key management and signing.
//!
//! # Security
//! - Secret keys come from a key file or the `CHECKIN_PRIVATE_KEYS` environment variable
//! - Keys are never logged or serialized
//! - Each key is loaded once and stays immutable for the run

use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature, Signer};
use solana_sdk::transaction::Transaction;

use crate::blockchain::types::{ChainError, ChainResult};
use crate::config::ConfigError;

/// Environment variable holding comma separated base58 secret keys.
pub const PRIVATE_KEYS_ENV_VAR: &str = "CHECKIN_PRIVATE_KEYS";

/// One managed identity: a keypair and the address derived from it.
#[derive(Clone)]
pub struct Account {
    keypair: Arc<Keypair>,
    address: Pubkey,
}

impl Account {
    /// Create an account from a base58 encoded 64-byte secret key.
    ///
    /// # Security
    /// The key is decoded and stored in memory only. It is never logged.
    pub fn from_base58(secret: &str) -> ChainResult<Self> {
        let bytes = bs58::decode(secret.trim())
            .into_vec()
            .map_err(|e| ChainError::Wallet(format!("Invalid base58 secret key: {}", e)))?;

        if bytes.len() != 64 {
            return Err(ChainError::Wallet(format!(
                "Invalid secret key length: expected 64 bytes, got {}",
                bytes.len()
            )));
        }

        let keypair = Keypair::try_from(bytes.as_slice())
            .map_err(|e| ChainError::Wallet(format!("Invalid secret key: {}", e)))?;

        Ok(Self::from_keypair(keypair))
    }

    /// Wrap an existing keypair.
    pub fn from_keypair(keypair: Keypair) -> Self {
        let address = keypair.pubkey();
        Self {
            keypair: Arc::new(keypair),
            address,
        }
    }

    /// The account's public address.
    pub fn address(&self) -> Pubkey {
        self.address
    }

    /// Detached ed25519 signature over raw message bytes.
    pub fn sign_message(&self, message: &[u8]) -> Signature {
        self.keypair.sign_message(message)
    }

    /// Add this account's signature to a transaction that other parties may
    /// already have signed. Existing signatures are left untouched.
    pub fn partial_sign(&self, tx: &mut Transaction) -> ChainResult<()> {
        let blockhash = tx.message.recent_blockhash;
        tx.try_partial_sign(&[self.keypair.as_ref()], blockhash)
            .map_err(|e| ChainError::InvalidTransaction(format!("Signing failed: {}", e)))
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address)
            .finish()
    }
}

/// The validated, de-duplicated list of accounts for a run.
#[derive(Debug, Clone)]
pub struct KeyStore {
    accounts: Vec<Account>,
}

impl KeyStore {
    /// Load keys, preferring the environment variable over the key file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::env::var(PRIVATE_KEYS_ENV_VAR) {
            Ok(value) if !value.trim().is_empty() => {
                if path.exists() {
                    tracing::warn!(
                        ignored = %path.display(),
                        source = PRIVATE_KEYS_ENV_VAR,
                        "Key file ignored, keys come from the environment"
                    );
                }
                tracing::info!(source = PRIVATE_KEYS_ENV_VAR, "Loading keys from environment");
                Self::from_secrets(value.split(',').map(str::trim).filter(|s| !s.is_empty()))
            }
            _ => Self::from_file(path),
        }
    }

    /// Load keys from a file: a JSON array of strings, or one key per line.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        tracing::info!(path = %path.display(), "Loading keys from file");
        Self::parse(&content)
    }

    /// Parse key file contents.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let trimmed = content.trim_start();
        if trimmed.starts_with('[') {
            let keys: Vec<String> = serde_json::from_str(trimmed)
                .map_err(|e| ConfigError::Keys(format!("Invalid JSON key list: {}", e)))?;
            Self::from_secrets(keys.iter().map(String::as_str))
        } else {
            Self::from_secrets(
                content
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty() && !line.starts_with('#')),
            )
        }
    }

    /// Build the store from raw secrets. Any invalid key or an empty list is fatal.
    pub fn from_secrets<'a>(secrets: impl IntoIterator<Item = &'a str>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        let mut accounts = Vec::new();

        for (index, secret) in secrets.into_iter().enumerate() {
            let account = Account::from_base58(secret)
                .map_err(|e| ConfigError::Keys(format!("key #{}: {}", index + 1, e)))?;

            if !seen.insert(account.address()) {
                tracing::warn!(address = %account.address(), "Duplicate key ignored");
                continue;
            }
            accounts.push(account);
        }

        if accounts.is_empty() {
            return Err(ConfigError::Keys("no secret keys configured".to_string()));
        }

        tracing::info!(accounts = accounts.len(), "Key store initialized");
        Ok(Self { accounts })
    }

    /// Accounts in input order.
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
