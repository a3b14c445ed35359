//! # Adapters
//!
//! Verifiers selectable from configuration: the development
//! `HashIntegrityVerifier` and `RemoteVerifier` for family services.

mod hash_integrity;
mod remote;

pub use hash_integrity::HashIntegrityVerifier;
pub use remote::{
    parse_verifier_url, RemoteVerifier, VerifyTransactionRequest, CONNECT_TIMEOUT,
    REQUEST_TIMEOUT,
};

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::domain::Result;
use crate::ports::Verifier;

/// Verifier selectable in configuration.
///
/// ```json
/// {"dev": "hash_integrity", "chat": {"remote": {"url": "http://chat-verifier:5000/verify"}}}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifierKind {
    /// `HashIntegrityVerifier`.
    HashIntegrity,
    /// `RemoteVerifier` posting to `url`.
    Remote {
        /// Verification endpoint of the family service.
        url: String,
    },
}

impl VerifierKind {
    /// Remote verifier at `url`.
    pub fn remote(url: impl Into<String>) -> Self {
        VerifierKind::Remote { url: url.into() }
    }

    /// Check the entry for `family` without building a client.
    pub fn validate(&self, family: &str) -> Result<()> {
        match self {
            VerifierKind::HashIntegrity => Ok(()),
            VerifierKind::Remote { url } => parse_verifier_url(family, url).map(|_| ()),
        }
    }

    /// Instantiate the verifier for `family`.
    ///
    /// # Errors
    /// * `DispatchError::InvalidVerifier` - the remote entry is malformed
    pub fn build(&self, family: &str) -> Result<Arc<dyn Verifier>> {
        Ok(match self {
            VerifierKind::HashIntegrity => Arc::new(HashIntegrityVerifier),
            VerifierKind::Remote { url } => Arc::new(RemoteVerifier::new(family, url)?),
        })
    }
}
