//! HTTP client for the rewards API.
//!
//! # Responsibilities
//! - Issue challenge, authorize, check-in transaction and check-in calls
//! - Attach the bearer token on authenticated calls
//! - Decode the `{ data: ... }` envelope and upstream error messages once

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::config::ApiConfig;
use crate::rewards::types::{
    extract_upstream_message, ApiError, ApiResult, AuthToken, AuthorizeData, AuthorizeRequest,
    CheckinReport, CheckinTransactionData, Envelope,
};

/// The rewards API operations used by a check-in.
#[async_trait]
pub trait RewardsApi: Send + Sync {
    /// Fetch the sign-in challenge for `address`.
    async fn challenge(&self, address: &str) -> ApiResult<String>;

    /// Exchange a signed challenge for a token.
    async fn authorize(&self, request: &AuthorizeRequest) -> ApiResult<AuthToken>;

    /// Fetch the unsigned check-in transaction (base64).
    async fn checkin_transaction(&self, token: &AuthToken) -> ApiResult<String>;

    /// Report a submitted check-in signature. Returns the confirmation payload.
    async fn report_checkin(&self, token: &AuthToken, signature: &str) -> ApiResult<serde_json::Value>;
}

/// [`RewardsApi`] over HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpRewardsApi {
    client: Client,
    config: ApiConfig,
}

impl HttpRewardsApi {
    /// Create a client from the `[api]` config section.
    pub fn new(config: ApiConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ApiError::Transport {
                endpoint: "client".to_string(),
                message: e.to_string(),
            })?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn call<T: DeserializeOwned>(&self, endpoint: &str, request: RequestBuilder) -> ApiResult<T> {
        let response = request.send().await.map_err(|e| ApiError::Transport {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })?;

        decode_envelope(endpoint, response).await
    }
}

/// Read the body of a success response, or turn a failure into a structured error.
async fn success_body(endpoint: &str, response: Response) -> ApiResult<String> {
    let status = response.status();
    let body = response.text().await.map_err(|e| ApiError::Transport {
        endpoint: endpoint.to_string(),
        message: e.to_string(),
    })?;

    if !status.is_success() {
        tracing::debug!(endpoint, status = status.as_u16(), "Rewards API error response");
        return Err(ApiError::Status {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            message: extract_upstream_message(&body),
        });
    }
    Ok(body)
}

/// Turn a response into the `data` payload or a structured error.
async fn decode_envelope<T: DeserializeOwned>(endpoint: &str, response: Response) -> ApiResult<T> {
    let body = success_body(endpoint, response).await?;

    let envelope: Envelope<T> = serde_json::from_str(&body).map_err(|e| ApiError::Decode {
        endpoint: endpoint.to_string(),
        message: e.to_string(),
    })?;

    envelope.data.ok_or_else(|| ApiError::Decode {
        endpoint: endpoint.to_string(),
        message: envelope
            .message
            .unwrap_or_else(|| "missing 'data' field".to_string()),
    })
}

/// Any 2xx from the check-in report is a confirmation; the transaction has
/// already landed. Keeps `data` when the server sends one, else the whole body.
async fn decode_report(endpoint: &str, response: Response) -> ApiResult<serde_json::Value> {
    let body = success_body(endpoint, response).await?;
    Ok(report_status(&body))
}

fn report_status(body: &str) -> serde_json::Value {
    let value = match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => value,
        Err(_) if body.trim().is_empty() => return serde_json::Value::Null,
        Err(_) => return serde_json::Value::String(body.trim().to_string()),
    };

    match value.get("data") {
        Some(data) if !data.is_null() => data.clone(),
        _ => value,
    }
}

#[async_trait]
impl RewardsApi for HttpRewardsApi {
    async fn challenge(&self, address: &str) -> ApiResult<String> {
        let request = self
            .client
            .get(self.url(&self.config.challenge_path))
            .query(&[("wallet", address)]);
        self.call("challenge", request).await
    }

    async fn authorize(&self, body: &AuthorizeRequest) -> ApiResult<AuthToken> {
        let request = self.client.post(self.url(&self.config.authorize_path)).json(body);
        let data: AuthorizeData = self.call("authorize", request).await?;
        Ok(AuthToken::new(data.token))
    }

    async fn checkin_transaction(&self, token: &AuthToken) -> ApiResult<String> {
        let request = self
            .client
            .get(self.url(&self.config.checkin_transaction_path))
            .bearer_auth(token.as_str());
        let data: CheckinTransactionData = self.call("checkin transaction", request).await?;
        Ok(data.hash)
    }

    async fn report_checkin(&self, token: &AuthToken, signature: &str) -> ApiResult<serde_json::Value> {
        let request = self
            .client
            .post(self.url(&self.config.checkin_path))
            .bearer_auth(token.as_str())
            .json(&CheckinReport {
                hash: signature.to_string(),
            });
        let response = request.send().await.map_err(|e| ApiError::Transport {
            endpoint: "checkin".to_string(),
            message: e.to_string(),
        })?;
        decode_report("checkin", response).await
    }
}
