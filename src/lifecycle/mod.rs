//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! main.rs:
//!     Parse CLI → Load config → Load keys → Init logging/metrics
//! startup.rs:
//!     Build clients → Wire gate/submitter/flow/runner → Run → Flush sinks → Exit
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then keys, then clients
//! - Exit code is non-zero only for startup failures

pub mod startup;

pub use startup::{App, StartupError};
