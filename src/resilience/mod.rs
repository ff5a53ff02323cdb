//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Transaction submission:
//!     → attempt fails
//!     → backoff.rs (delay for this attempt: fixed or exponential + jitter)
//!     → retries.rs (Sleeper waits, then the caller retries)
//! ```
//!
//! # Design Decisions
//! - Only transaction submission retries; every other call gets one attempt
//! - The attempt budget is a hard upper bound, with at least one attempt
//! - Sleeping is injectable so retry timing is testable without real time

pub mod backoff;
pub mod retries;

pub use backoff::Backoff;
pub use retries::{Sleeper, TokioSleeper};
