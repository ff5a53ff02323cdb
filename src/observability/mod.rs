//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events, per-account spans)
//!     → metrics.rs (outcome and attempt counters)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Prometheus textfile written at end of run
//! ```
//!
//! # Design Decisions
//! - Every account is processed inside a span carrying its address
//! - Secrets never appear in fields
//! - Metrics are optional; the macros are no-ops without a recorder

pub mod logging;
pub mod metrics;
