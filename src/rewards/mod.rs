//! Rewards API subsystem.
//!
//! # Data Flow
//! ```text
//! Account
//!     → auth.rs (challenge → detached signature → authorize → token)
//!     → client.rs (bearer calls: check-in transaction, check-in report)
//!     → types.rs (envelope decoding, ApiError with upstream message)
//! ```

pub mod auth;
pub mod client;
pub mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use auth::AuthSession;
pub use client::{HttpRewardsApi, RewardsApi};
pub use types::{ApiError, ApiResult, AuthToken, AuthorizeRequest};
