//! Check-in orchestration.
//!
//! # Data Flow
//! ```text
//! runner.rs (accounts, in order, one at a time)
//!     → flow.rs (per-account state machine)
//!         → gate.rs (daily activity quota, via ChainClient)
//!         → rewards::AuthSession (token)
//!         → rewards API (unsigned transaction) → sign
//!         → blockchain::TransactionSubmitter (broadcast + confirm, retry)
//!         → rewards API (report signature)
//!     → AccountOutcome per account
//!     → report::RunReport (folded counts)
//! ```
//!
//! # Design Decisions
//! - One account's failure never stops the run
//! - The gate decides once, before anything is submitted
//! - No state is shared between accounts

pub mod flow;
pub mod gate;
pub mod runner;

pub use flow::{CheckInError, CheckInFlow, FlowState};
pub use gate::ActivityGate;
pub use runner::Runner;
