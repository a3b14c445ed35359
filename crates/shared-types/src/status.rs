//! # Transaction Status
//!
//! Lifecycle of a submitted transaction:
//!
//! ```text
//! Unknown ──submit──→ Pending ──verify ok──→ Committed ──block published──→ Finalized
//!                        │
//!                        └──rejected──→ Failed(message)
//! ```
//!
//! `Unknown` is the cache-miss default and is never persisted.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Transaction lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TransactionStatus {
    /// Not seen by this registry.
    #[default]
    Unknown,
    /// Accepted for processing, not yet verified.
    Pending,
    /// Rejected by ownership or verifier checks.
    Failed,
    /// Verified and appended to its stream.
    Committed,
    /// Included in a published block.
    Finalized,
}

impl TransactionStatus {
    /// Ordering used to refuse status downgrades.
    pub fn rank(self) -> u8 {
        match self {
            TransactionStatus::Unknown => 0,
            TransactionStatus::Pending => 1,
            TransactionStatus::Failed => 2,
            TransactionStatus::Committed => 3,
            TransactionStatus::Finalized => 4,
        }
    }

    /// True when moving from `self` to `next` would lose progress.
    pub fn is_downgrade_to(self, next: TransactionStatus) -> bool {
        next.rank() < self.rank()
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransactionStatus::Unknown => "unknown",
            TransactionStatus::Pending => "pending",
            TransactionStatus::Failed => "failed",
            TransactionStatus::Committed => "committed",
            TransactionStatus::Finalized => "finalized",
        };
        f.write_str(name)
    }
}

/// Cached status of one transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TransactionStatusRecord {
    /// Current state.
    pub status: TransactionStatus,
    /// Human-readable reason, set for `Failed`.
    #[serde(default)]
    pub message: String,
}

impl TransactionStatusRecord {
    /// Record without a message.
    pub fn new(status: TransactionStatus) -> Self {
        Self {
            status,
            message: String::new(),
        }
    }

    /// `Failed` record carrying `message`.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: TransactionStatus::Failed,
            message: message.into(),
        }
    }
}
