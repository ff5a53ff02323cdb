//! Per-account outcomes and the run summary.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use uuid::Uuid;

/// Terminal result of processing one account. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum AccountOutcome {
    /// Daily quota already reached; nothing submitted.
    Skipped { address: String },
    /// Check-in transaction confirmed and reported.
    Success {
        address: String,
        signature: String,
        /// Confirmation payload returned by the rewards API.
        status: serde_json::Value,
    },
    /// Processing stopped; `message` is the triggering error.
    Failed { address: String, message: String },
}

impl AccountOutcome {
    pub fn skipped(address: Pubkey) -> Self {
        AccountOutcome::Skipped {
            address: address.to_string(),
        }
    }

    pub fn success(address: Pubkey, signature: String, status: serde_json::Value) -> Self {
        AccountOutcome::Success {
            address: address.to_string(),
            signature,
            status,
        }
    }

    pub fn failed(address: Pubkey, message: impl Into<String>) -> Self {
        AccountOutcome::Failed {
            address: address.to_string(),
            message: message.into(),
        }
    }

    pub fn address(&self) -> &str {
        match self {
            AccountOutcome::Skipped { address }
            | AccountOutcome::Success { address, .. }
            | AccountOutcome::Failed { address, .. } => address,
        }
    }

    /// Metric label for this outcome.
    pub fn label(&self) -> &'static str {
        match self {
            AccountOutcome::Skipped { .. } => "skipped",
            AccountOutcome::Success { .. } => "success",
            AccountOutcome::Failed { .. } => "failed",
        }
    }
}

/// Aggregate counts. Skipped accounts count in neither `success` nor `failed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl Summary {
    /// Fold a sequence of outcomes into counts.
    pub fn fold<'a>(outcomes: impl IntoIterator<Item = &'a AccountOutcome>) -> Self {
        outcomes.into_iter().fold(Summary::default(), |acc, outcome| {
            let mut next = Summary {
                total: acc.total + 1,
                ..acc
            };
            match outcome {
                AccountOutcome::Skipped { .. } => next.skipped += 1,
                AccountOutcome::Success { .. } => next.success += 1,
                AccountOutcome::Failed { .. } => next.failed += 1,
            }
            next
        })
    }

    /// One-line human summary.
    pub fn render(&self) -> String {
        format!("Sukses: {} Akun, Gagal: {} Akun", self.success, self.failed)
    }
}

/// Everything one run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub summary: Summary,
    pub outcomes: Vec<AccountOutcome>,
}

impl RunReport {
    pub fn new(
        run_id: Uuid,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        outcomes: Vec<AccountOutcome>,
    ) -> Self {
        Self {
            run_id,
            started_at,
            finished_at,
            summary: Summary::fold(&outcomes),
            outcomes,
        }
    }

    /// Multi-line text for notifications.
    pub fn render_message(&self) -> String {
        let mut lines = vec![
            "Daily check-in finished".to_string(),
            self.summary.render(),
            format!("Dilewati: {} Akun", self.summary.skipped),
        ];
        for outcome in &self.outcomes {
            if let AccountOutcome::Failed { address, message } = outcome {
                lines.push(format!("- {}: {}", short_address(address), message));
            }
        }
        lines.join("\n")
    }

    /// Write the report as JSON, replacing any previous file.
    pub fn write_json(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_vec_pretty(self)?;
        std::fs::write(path, json)
    }
}

fn short_address(address: &str) -> String {
    if address.len() <= 10 {
        return address.to_string();
    }
    format!("{}…{}", &address[..4], &address[address.len() - 4..])
}
