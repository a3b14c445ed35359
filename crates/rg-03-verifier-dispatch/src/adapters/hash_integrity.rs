//! # Hash Integrity Verifier
//!
//! Development verifier. Accepts any payload whose header carries its
//! SHA-256 and whose nonce is fresh on the stream. Signatures are not checked.

use async_trait::async_trait;
use shared_types::{sha256, Transaction};
use tracing::debug;

use crate::domain::{Result, VerificationResult};
use crate::ports::Verifier;

/// Checks payload integrity and nonce freshness only.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashIntegrityVerifier;

#[async_trait]
impl Verifier for HashIntegrityVerifier {
    async fn verify(
        &self,
        transaction: &Transaction,
        stream: &[Transaction],
    ) -> Result<VerificationResult> {
        let header = &transaction.header;
        if header.payload_hash != sha256(&transaction.payload) {
            return Ok(VerificationResult::invalid("Payload hash does not match payload"));
        }
        if stream.iter().any(|prior| prior.header.nonce == header.nonce) {
            return Ok(VerificationResult::invalid(format!(
                "Nonce {} already used on stream",
                header.nonce
            )));
        }

        debug!(payload_type = %header.payload_type, "[rg-03] Payload hash verified");
        Ok(VerificationResult::valid())
    }
}
