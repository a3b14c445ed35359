//! # Inbound Ports

use async_trait::async_trait;
use shared_types::Transaction;

use crate::domain::{Result, VerifyOutcome};

/// Verify procedure run by workers for transactions on their own queue.
#[async_trait]
pub trait TransactionProcessor: Send + Sync {
    /// Verify `transaction` against its stream, append it and record its status.
    ///
    /// Rejections are `Ok(VerifyOutcome::Rejected)`. An `Err` means the
    /// transaction was left untouched and must be redelivered.
    async fn verify(&self, transaction: &Transaction) -> Result<VerifyOutcome>;
}
