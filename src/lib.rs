//! Daily check-in runner for a set of blockchain accounts.

pub mod blockchain;
pub mod checkin;
pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod report;
pub mod resilience;
pub mod rewards;

pub use checkin::{CheckInFlow, Runner};
pub use config::CheckinConfig;
pub use lifecycle::App;
pub use report::{AccountOutcome, RunReport};
