//! # Outbound Ports
//!
//! Verifiers are external collaborators. Embedding applications implement
//! `Verifier` for their payload family and register it at start-up.

use async_trait::async_trait;
use shared_types::Transaction;

use crate::domain::{Result, VerificationResult};

/// Verifier for one payload family.
#[async_trait]
pub trait Verifier: Send + Sync {
    /// Accept or reject `transaction` given the prior `stream`.
    ///
    /// Return `Err` only when no verdict could be reached.
    async fn verify(&self, transaction: &Transaction, stream: &[Transaction])
        -> Result<VerificationResult>;
}
