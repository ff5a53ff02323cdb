//! Run reporting: outcome aggregation, summary file, notification.

pub mod notify;
pub mod summary;

pub use notify::{notify_best_effort, Notifier, TelegramNotifier};
pub use summary::{AccountOutcome, RunReport, Summary};
