//! Challenge-response sign-in.
//!
//! ```text
//! GET  challenge?wallet=<address>           → "<challenge>"
//! sign(challenge bytes) with the account key (detached ed25519)
//! POST authorize {address, address_encoded, signature} → token
//! ```
//!
//! No retry here: a failed sign-in ends only the current account's flow.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::blockchain::Account;
use crate::rewards::client::RewardsApi;
use crate::rewards::types::{ApiResult, AuthToken, AuthorizeRequest};

/// Authenticates accounts against the rewards API.
#[derive(Clone)]
pub struct AuthSession {
    api: Arc<dyn RewardsApi>,
}

impl AuthSession {
    pub fn new(api: Arc<dyn RewardsApi>) -> Self {
        Self { api }
    }

    /// Run the two-step handshake for `account`.
    pub async fn authenticate(&self, account: &Account) -> ApiResult<AuthToken> {
        let address = account.address().to_string();
        let challenge = self.api.challenge(&address).await?;
        tracing::debug!(challenge_len = challenge.len(), "Challenge received");

        let request = signed_authorization(account, &challenge);
        let token = self.api.authorize(&request).await?;
        tracing::debug!("Authorized");
        Ok(token)
    }
}

/// Build the authorize body: a detached signature over the raw challenge bytes.
pub fn signed_authorization(account: &Account, challenge: &str) -> AuthorizeRequest {
    let signature = account.sign_message(challenge.as_bytes());
    let address = account.address();

    AuthorizeRequest {
        address: address.to_string(),
        address_encoded: STANDARD.encode(address.to_bytes()),
        signature: STANDARD.encode(signature.as_ref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewards::mock::MockApi;
    use crate::rewards::types::ApiError;
    use solana_sdk::pubkey::Pubkey;
    use solana_sdk::signature::{Keypair, Signature};

    fn account() -> Account {
        Account::from_keypair(Keypair::new())
    }

    #[test]
    fn test_signed_authorization_verifies() {
        let account = account();
        let request = signed_authorization(&account, "challenge-nonce");

        assert_eq!(request.address, account.address().to_string());
        let key_bytes = STANDARD.decode(&request.address_encoded).unwrap();
        assert_eq!(Pubkey::try_from(key_bytes.as_slice()).unwrap(), account.address());

        let sig_bytes = STANDARD.decode(&request.signature).unwrap();
        let signature = Signature::try_from(sig_bytes.as_slice()).unwrap();
        assert!(signature.verify(&key_bytes, b"challenge-nonce"));
    }

    #[tokio::test]
    async fn test_authenticate_returns_token() {
        let api = Arc::new(MockApi::default());
        let session = AuthSession::new(api.clone());
        let account = account();

        let token = session.authenticate(&account).await.unwrap();

        assert_eq!(token.as_str(), format!("token-{}", account.address()));
        let authorized = api.authorize_requests();
        assert_eq!(authorized.len(), 1);
        assert_eq!(authorized[0].address, account.address().to_string());
    }

    #[tokio::test]
    async fn test_challenge_failure_skips_authorize() {
        let api = Arc::new(MockApi::default().failing_challenge("wallet banned"));
        let session = AuthSession::new(api.clone());

        let err = session.authenticate(&account()).await.unwrap_err();

        assert_eq!(err.upstream_message(), Some("wallet banned"));
        assert!(api.authorize_requests().is_empty());
    }

    #[tokio::test]
    async fn test_authorize_failure_propagates() {
        let api = Arc::new(MockApi::default().failing_authorize("invalid signature"));
        let session = AuthSession::new(api);

        let err = session.authenticate(&account()).await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 401, .. }));
        assert!(err.to_string().contains("invalid signature"));
    }
}
