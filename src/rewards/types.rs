//! Rewards API wire types and error definitions.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the rewards API, decoded once at the HTTP boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The server answered with a non-success status.
    #[error("{endpoint} returned HTTP {status}{}", upstream_suffix(.message))]
    Status {
        endpoint: String,
        status: u16,
        /// The server's own error message, when it sent one.
        message: Option<String>,
    },

    /// The request never got a response (connect, timeout, TLS).
    #[error("{endpoint} request failed: {message}")]
    Transport { endpoint: String, message: String },

    /// A success response whose body did not have the expected shape.
    #[error("{endpoint} returned an unexpected body: {message}")]
    Decode { endpoint: String, message: String },
}

fn upstream_suffix(message: &Option<String>) -> String {
    match message {
        Some(m) => format!(": {}", m),
        None => String::new(),
    }
}

impl ApiError {
    /// The upstream message, if the server provided one.
    pub fn upstream_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// Result type for rewards API calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Bearer credential for one account. Never logged.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

/// Standard response wrapper: every payload sits under `data`.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of the authorize call.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AuthorizeRequest {
    /// Base58 address.
    pub address: String,
    /// Base64 of the raw public key bytes.
    pub address_encoded: String,
    /// Base64 detached signature over the challenge.
    pub signature: String,
}

#[derive(Debug, Deserialize)]
pub struct AuthorizeData {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct CheckinTransactionData {
    /// Base64 of the bincode serialized, unsigned transaction.
    pub hash: String,
}

/// Body of the check-in confirmation call.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CheckinReport {
    /// Signature of the submitted transaction.
    pub hash: String,
}

/// Pull a human readable error message out of an error body.
///
/// Servers disagree on the field name, so the common ones are tried in order.
pub fn extract_upstream_message(body: &str) -> Option<String> {
    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(_) => {
            let trimmed = body.trim();
            return (!trimmed.is_empty() && trimmed.len() <= 200).then(|| trimmed.to_string());
        }
    };

    ["message", "error", "msg"]
        .iter()
        .find_map(|key| value.get(key).and_then(|v| v.as_str()))
        .or_else(|| value.get("data").and_then(|d| d.get("message")).and_then(|v| v.as_str()))
        .map(str::to_string)
}
