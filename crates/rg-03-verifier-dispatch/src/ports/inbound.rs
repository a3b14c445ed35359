//! # Inbound Ports

use async_trait::async_trait;
use shared_types::Transaction;

use crate::domain::{Result, VerificationResult};

/// Verifies a transaction against the prior history of its stream.
#[async_trait]
pub trait TransactionVerifier: Send + Sync {
    /// Verify `transaction` given `stream`, the stream's transactions in order.
    ///
    /// # Errors
    /// * `DispatchError::UnknownFamily` - no verifier serves the payload family
    /// * `DispatchError::Verifier` - the verifier failed to answer
    async fn verify_transaction(
        &self,
        transaction: &Transaction,
        stream: &[Transaction],
    ) -> Result<VerificationResult>;
}
