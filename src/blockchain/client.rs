//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to the JSON-RPC endpoint (primary + failovers)
//! - Query recent confirmed signatures for an address
//! - Broadcast raw transaction bytes and wait for confirmation
//! - Handle timeouts and network errors gracefully

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::json;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_client::GetConfirmedSignaturesForAddress2Config;
use solana_client::rpc_request::RpcRequest;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use tokio::time::{interval, timeout};

use crate::blockchain::types::{parse_commitment, ActivityRecord, ChainConfig, ChainError, ChainResult};

/// Capability over a blockchain connection.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Most recent confirmed signatures for `address`, newest first.
    async fn recent_signatures(&self, address: &Pubkey, limit: usize) -> ChainResult<Vec<ActivityRecord>>;

    /// Broadcast a serialized transaction, returning its signature.
    async fn send_raw_transaction(&self, payload: &[u8]) -> ChainResult<Signature>;

    /// Wait until `signature` reaches the configured commitment.
    async fn confirm_transaction(&self, signature: &Signature) -> ChainResult<()>;
}

/// Solana JSON-RPC client wrapper with failover support.
#[derive(Clone)]
pub struct SolanaChainClient {
    /// List of RPC clients (primary + failovers).
    providers: Vec<Arc<RpcClient>>,
    /// Configuration.
    config: ChainConfig,
    /// Commitment used for reads and confirmation.
    commitment: CommitmentConfig,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl SolanaChainClient {
    /// Create a new chain client.
    ///
    /// No network call is made here; an unreachable node surfaces on first use.
    pub fn new(config: ChainConfig) -> ChainResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);
        let commitment = parse_commitment(&config.commitment);
        let mut providers = Vec::new();

        // 1. Add primary provider
        url::Url::parse(&config.rpc_url).map_err(|e| {
            ChainError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        providers.push(Arc::new(RpcClient::new_with_timeout_and_commitment(
            config.rpc_url.clone(),
            timeout_duration,
            commitment,
        )));

        // 2. Add failover providers
        for url_str in &config.failover_urls {
            if url::Url::parse(url_str).is_ok() {
                providers.push(Arc::new(RpcClient::new_with_timeout_and_commitment(
                    url_str.clone(),
                    timeout_duration,
                    commitment,
                )));
            } else {
                tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL");
            }
        }

        tracing::info!(
            rpc_url = %config.rpc_url,
            failovers = providers.len() - 1,
            commitment = %config.commitment,
            "Chain client initialized"
        );

        Ok(Self {
            providers,
            config,
            commitment,
            timeout_duration,
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    fn primary(&self) -> &RpcClient {
        self.providers[0].as_ref()
    }
}

#[async_trait]
impl ChainClient for SolanaChainClient {
    async fn recent_signatures(&self, address: &Pubkey, limit: usize) -> ChainResult<Vec<ActivityRecord>> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_signatures_for_address_with_config(
                address,
                GetConfirmedSignaturesForAddress2Config {
                    before: None,
                    until: None,
                    limit: Some(limit),
                    commitment: Some(self.commitment),
                },
            );
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(statuses)) => {
                    return Ok(statuses
                        .into_iter()
                        .map(|s| ActivityRecord {
                            signature: s.signature,
                            block_time: s.block_time,
                        })
                        .collect());
                }
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, error = %e, "RPC error, trying next provider");
                }
                Err(_) => {
                    tracing::warn!(provider_idx = i, "RPC timeout, trying next provider");
                }
            }
        }
        Err(ChainError::Rpc("All RPC providers failed to get signatures".to_string()))
    }

    async fn send_raw_transaction(&self, payload: &[u8]) -> ChainResult<Signature> {
        // Broadcast goes to the primary only; resending through a failover is
        // the submitter's retry, not ours.
        let encoded = STANDARD.encode(payload);
        let params = json!([
            encoded,
            {
                "encoding": "base64",
                "skipPreflight": false,
                "preflightCommitment": self.commitment.commitment.to_string(),
            }
        ]);
        let fut = self.primary().send::<String>(RpcRequest::SendTransaction, params);
        let signature = match timeout(self.timeout_duration, fut).await {
            Ok(Ok(signature)) => signature,
            Ok(Err(e)) => return Err(ChainError::Rpc(e.to_string())),
            Err(_) => return Err(ChainError::Timeout(self.config.rpc_timeout_secs)),
        };

        Signature::from_str(&signature)
            .map_err(|e| ChainError::Rpc(format!("Node returned invalid signature '{}': {}", signature, e)))
    }

    async fn confirm_transaction(&self, signature: &Signature) -> ChainResult<()> {
        let secs = self.config.confirmation_timeout_secs;
        let poll_interval = Duration::from_millis(self.config.poll_interval_ms);

        let result = timeout(Duration::from_secs(secs), async {
            let mut ticker = interval(poll_interval);

            loop {
                ticker.tick().await;

                let status = match self
                    .primary()
                    .get_signature_status_with_commitment(signature, self.commitment)
                    .await
                {
                    Ok(status) => status,
                    Err(e) => {
                        tracing::debug!(signature = %signature, error = %e, "Status poll failed");
                        continue;
                    }
                };

                match status {
                    Some(Ok(())) => return Ok(()),
                    Some(Err(e)) => return Err(ChainError::Rejected(e.to_string())),
                    None => {
                        tracing::debug!(signature = %signature, "Transaction pending");
                    }
                }
            }
        })
        .await;

        match result {
            Ok(status) => status,
            Err(_) => Err(ChainError::ConfirmationTimeout {
                signature: *signature,
                secs,
            }),
        }
    }
}

impl std::fmt::Debug for SolanaChainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolanaChainClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("commitment", &self.config.commitment)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}
