//! # Remote Verifier
//!
//! Forwards a transaction and its stream history to the verifier service of
//! its family over HTTP.
//!
//! ```text
//! POST {url}
//! {"transaction": "<hex>", "stream": ["<hex>", ...]}
//!
//! 200 OK
//! {"valid": false, "error_message": "Certificate already claimed"}
//! ```
//!
//! Transactions travel in their canonical wire encoding, hex encoded, so the
//! service hashes exactly the bytes the registry stores.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use shared_types::{CodecError, Transaction};
use tracing::{debug, warn};

use crate::domain::{DispatchError, Result, VerificationResult};
use crate::ports::Verifier;

type CodecResult<T> = std::result::Result<T, CodecError>;

/// Upper bound for one verification round trip.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound for establishing the connection.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Body of a verification request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyTransactionRequest {
    /// Hex of the transaction's wire encoding.
    pub transaction: String,
    /// Hex of each prior stream transaction, in stream order.
    pub stream: Vec<String>,
}

impl VerifyTransactionRequest {
    /// Encode `transaction` and its prior `stream`.
    pub fn new(transaction: &Transaction, stream: &[Transaction]) -> CodecResult<Self> {
        Ok(Self {
            transaction: hex::encode(transaction.to_bytes()?),
            stream: stream
                .iter()
                .map(|t| t.to_bytes().map(hex::encode))
                .collect::<CodecResult<_>>()?,
        })
    }

    /// Decode the request back into transactions (verifier side).
    pub fn decode(&self) -> CodecResult<(Transaction, Vec<Transaction>)> {
        let transaction = decode_hex(&self.transaction)?;
        let stream = self
            .stream
            .iter()
            .map(|encoded| decode_hex(encoded))
            .collect::<CodecResult<_>>()?;
        Ok((transaction, stream))
    }
}

fn decode_hex(encoded: &str) -> CodecResult<Transaction> {
    let bytes = hex::decode(encoded).map_err(|e| CodecError::Deserialization(e.to_string()))?;
    Transaction::from_bytes(&bytes)
}

/// Parse and check a verifier URL.
pub fn parse_verifier_url(family: &str, url: &str) -> Result<Url> {
    let invalid = |message: String| DispatchError::InvalidVerifier {
        family: family.to_string(),
        message,
    };
    let parsed = Url::parse(url).map_err(|e| invalid(format!("{url}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(invalid(format!("{url}: unsupported scheme {scheme}"))),
    }
}

/// Verifier service of one family, reached over HTTP.
#[derive(Debug, Clone)]
pub struct RemoteVerifier {
    family: String,
    url: Url,
    client: Client,
}

impl RemoteVerifier {
    /// Client for the verifier of `family` at `url`.
    ///
    /// # Errors
    /// * `DispatchError::InvalidVerifier` - malformed URL or client setup failure
    pub fn new(family: impl Into<String>, url: &str) -> Result<Self> {
        let family = family.into();
        let url = parse_verifier_url(&family, url)?;
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| DispatchError::InvalidVerifier {
                family: family.clone(),
                message: e.to_string(),
            })?;
        Ok(Self {
            family,
            url,
            client,
        })
    }

    /// Endpoint requests are posted to.
    pub fn url(&self) -> &Url {
        &self.url
    }

    fn failure(&self, message: impl Into<String>) -> DispatchError {
        DispatchError::Verifier {
            family: self.family.clone(),
            message: message.into(),
        }
    }
}

#[async_trait]
impl Verifier for RemoteVerifier {
    async fn verify(
        &self,
        transaction: &Transaction,
        stream: &[Transaction],
    ) -> Result<VerificationResult> {
        let request = VerifyTransactionRequest::new(transaction, stream)
            .map_err(|e| self.failure(e.to_string()))?;

        let response = self
            .client
            .post(self.url.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(
                    family = %self.family,
                    url = %self.url,
                    error = %e,
                    "[rg-03] Verifier request failed"
                );
                if e.is_connect() {
                    self.failure(format!("cannot connect to {}", self.url))
                } else {
                    self.failure(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(family = %self.family, %status, "[rg-03] Verifier returned an error status");
            return Err(self.failure(format!("verifier answered {status}")));
        }

        let result: VerificationResult = response
            .json()
            .await
            .map_err(|e| self.failure(format!("unreadable verdict: {e}")))?;
        debug!(family = %self.family, valid = result.valid, "[rg-03] Remote verdict");
        Ok(result)
    }
}
