//! # Verifier Registry
//!
//! Explicit `family → verifier` table built at start-up. Implements the
//! `TransactionVerifier` inbound port by looking up the family of the
//! payload type and forwarding the transaction with its stream history.

use async_trait::async_trait;
use shared_types::Transaction;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::{payload_family, DispatchError, Result, VerificationResult};
use crate::ports::{TransactionVerifier, Verifier};

/// Routes transactions to the verifier registered for their family.
#[derive(Clone, Default)]
pub struct VerifierRegistry {
    verifiers: HashMap<String, Arc<dyn Verifier>>,
}

impl VerifierRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `verifier` for `family`, replacing any previous entry.
    pub fn register(&mut self, family: impl Into<String>, verifier: Arc<dyn Verifier>) {
        self.verifiers.insert(family.into(), verifier);
    }

    /// Builder form of [`register`](Self::register).
    pub fn with_verifier(mut self, family: impl Into<String>, verifier: Arc<dyn Verifier>) -> Self {
        self.register(family, verifier);
        self
    }

    /// Registered families, sorted.
    pub fn families(&self) -> Vec<&str> {
        let mut families: Vec<&str> = self.verifiers.keys().map(String::as_str).collect();
        families.sort_unstable();
        families
    }
}

#[async_trait]
impl TransactionVerifier for VerifierRegistry {
    async fn verify_transaction(
        &self,
        transaction: &Transaction,
        stream: &[Transaction],
    ) -> Result<VerificationResult> {
        let payload_type = &transaction.header.payload_type;
        let Some(family) = payload_family(payload_type) else {
            warn!(payload_type = %payload_type, "[rg-03] Payload type has no family");
            return Ok(VerificationResult::invalid(format!(
                "Invalid payload type {}",
                payload_type
            )));
        };

        let verifier = self
            .verifiers
            .get(family)
            .ok_or_else(|| DispatchError::UnknownFamily(family.to_string()))?;

        debug!(family, history = stream.len(), "[rg-03] Dispatching to verifier");
        verifier.verify(transaction, stream).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::HashIntegrityVerifier;
    use shared_types::{sha256, FederatedStreamId, TransactionHeader};
    use std::sync::Mutex;
    use uuid::Uuid;

    /// Records the stream length it was called with and rejects.
    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl Verifier for Recorder {
        async fn verify(
            &self,
            _transaction: &Transaction,
            stream: &[Transaction],
        ) -> Result<VerificationResult> {
            self.seen.lock().unwrap().push(stream.len());
            Ok(VerificationResult::invalid("recorded"))
        }
    }

    fn transaction(payload_type: &str) -> Transaction {
        Transaction {
            header: TransactionHeader {
                federated_stream_id: FederatedStreamId::new("registry", Uuid::nil()),
                payload_type: payload_type.to_string(),
                payload_hash: sha256(b"p").to_vec(),
                nonce: "n".to_string(),
            },
            header_signature: vec![],
            payload: b"p".to_vec(),
        }
    }

    #[tokio::test]
    async fn test_routes_by_family() {
        let recorder = Arc::new(Recorder::default());
        let registry = VerifierRegistry::new()
            .with_verifier("dev", Arc::new(HashIntegrityVerifier))
            .with_verifier("chat.v1", recorder.clone());

        let accepted = registry
            .verify_transaction(&transaction("dev.Event"), &[])
            .await
            .unwrap();
        assert!(accepted.valid);

        let history = vec![transaction("chat.v1.Posted"), transaction("chat.v1.Posted")];
        let rejected = registry
            .verify_transaction(&transaction("chat.v1.Posted"), &history)
            .await
            .unwrap();
        assert!(!rejected.valid);
        assert_eq!(*recorder.seen.lock().unwrap(), vec![2]);
    }

    #[tokio::test]
    async fn test_unknown_family_is_error() {
        let registry = VerifierRegistry::new().with_verifier("dev", Arc::new(HashIntegrityVerifier));
        let err = registry
            .verify_transaction(&transaction("other.Event"), &[])
            .await
            .unwrap_err();
        assert_eq!(err, DispatchError::UnknownFamily("other".to_string()));
        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn test_payload_type_without_family_is_rejected() {
        let registry = VerifierRegistry::new().with_verifier("dev", Arc::new(HashIntegrityVerifier));
        let result = registry
            .verify_transaction(&transaction("Event"), &[])
            .await
            .unwrap();
        assert!(!result.valid);
        assert!(result.error_message.contains("Invalid payload type"));
    }

    #[test]
    fn test_families_are_sorted() {
        let registry = VerifierRegistry::new()
            .with_verifier("b", Arc::new(HashIntegrityVerifier))
            .with_verifier("a", Arc::new(HashIntegrityVerifier));
        assert_eq!(registry.families(), vec!["a", "b"]);
    }
}
