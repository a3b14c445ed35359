//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Submission**: `FederatedStreamId`, `TransactionHeader`, `Transaction`
//! - **Storage**: `StreamTransaction`
//! - **Chain**: `BlockHeader`, `BlockPublication`, `Block`, `NewBlock`

use crate::errors::CodecError;
use crate::hashes::{sha256, BlockHash, Hash, TransactionHash};
use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use uuid::Uuid;

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, CodecError> {
    bincode::serialize(value).map_err(|e| CodecError::Serialization(e.to_string()))
}

// =============================================================================
// CLUSTER A: SUBMISSION
// =============================================================================

/// Globally identifies a stream: the owning registry plus the stream UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FederatedStreamId {
    /// Name of the registry that owns the stream.
    pub registry: String,
    /// Stream identifier within that registry.
    pub stream_id: Uuid,
}

impl FederatedStreamId {
    /// Create a stream id for `registry`.
    pub fn new(registry: impl Into<String>, stream_id: Uuid) -> Self {
        Self {
            registry: registry.into(),
            stream_id,
        }
    }
}

/// Signed part of a transaction.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionHeader {
    /// Target stream.
    pub federated_stream_id: FederatedStreamId,
    /// Fully qualified payload type, e.g. `project_origin.electricity.v1.IssuedEvent`.
    pub payload_type: String,
    /// Hash of `Transaction::payload` as computed by the client.
    #[serde_as(as = "Bytes")]
    pub payload_hash: Vec<u8>,
    /// Client-chosen nonce making otherwise identical transactions distinct.
    pub nonce: String,
}

/// An immutable, signed transaction addressed to a stream.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Signed header.
    pub header: TransactionHeader,
    /// Signature over the header, checked by the family verifier.
    #[serde_as(as = "Bytes")]
    pub header_signature: Vec<u8>,
    /// Opaque payload.
    #[serde_as(as = "Bytes")]
    pub payload: Vec<u8>,
}

impl Transaction {
    /// Canonical wire encoding. Queue messages carry exactly these bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        encode(self)
    }

    /// Decode a transaction from its wire encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// Content hash over the canonical encoding.
    pub fn hash(&self) -> Result<TransactionHash, CodecError> {
        Ok(TransactionHash::of_bytes(&self.to_bytes()?))
    }

    /// Registry named by the header.
    pub fn registry(&self) -> &str {
        &self.header.federated_stream_id.registry
    }

    /// Stream named by the header.
    pub fn stream_id(&self) -> Uuid {
        self.header.federated_stream_id.stream_id
    }
}

// =============================================================================
// CLUSTER B: STORAGE
// =============================================================================

/// A transaction accepted onto a stream.
///
/// `stream_index` values of one stream are exactly `0, 1, 2, …`.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamTransaction {
    /// Hash of the encoded transaction.
    pub transaction_hash: TransactionHash,
    /// Owning stream.
    pub stream_id: Uuid,
    /// Position within the stream.
    pub stream_index: u64,
    /// The encoded `Transaction`.
    #[serde_as(as = "Bytes")]
    pub payload: Vec<u8>,
}

impl StreamTransaction {
    /// Build the stored record for `transaction` at `stream_index`.
    pub fn from_transaction(
        transaction: &Transaction,
        stream_index: u64,
    ) -> Result<Self, CodecError> {
        let payload = transaction.to_bytes()?;
        Ok(Self {
            transaction_hash: TransactionHash::of_bytes(&payload),
            stream_id: transaction.stream_id(),
            stream_index,
            payload,
        })
    }

    /// Decode the stored payload back into a transaction.
    pub fn transaction(&self) -> Result<Transaction, CodecError> {
        Transaction::from_bytes(&self.payload)
    }
}

// =============================================================================
// CLUSTER C: THE CHAIN
// =============================================================================

/// Header of a block. `BlockHash` is the hash of its encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    /// Hash of the previous block's header, zero for the first block.
    pub previous_header_hash: Hash,
    /// Hash of the previous block's publication, zero for the first block.
    pub previous_publication_hash: Hash,
    /// Merkle root over the covered transaction payloads.
    pub merkle_root_hash: Hash,
    /// Creation time, millisecond precision.
    pub created_at: DateTime<Utc>,
}

impl BlockHeader {
    /// Canonical encoding of the header.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        encode(self)
    }

    /// Block hash of this header.
    pub fn hash(&self) -> Result<BlockHash, CodecError> {
        Ok(BlockHash(sha256(&self.to_bytes()?)))
    }
}

/// Current time truncated to whole milliseconds, so headers survive
/// storage round-trips bit-for-bit.
pub fn block_timestamp() -> DateTime<Utc> {
    let now = Utc::now();
    now.duration_trunc(TimeDelta::milliseconds(1)).unwrap_or(now)
}

/// Proof that a block header was anchored in an external immutable log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockPublication {
    /// Header hash written to the process log.
    LogEntry {
        /// Hash of the published header.
        block_header_hash: Hash,
    },
}

impl BlockPublication {
    /// Canonical encoding of the publication.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        encode(self)
    }

    /// Hash linked into the next block's `previous_publication_hash`.
    pub fn hash(&self) -> Result<Hash, CodecError> {
        Ok(sha256(&self.to_bytes()?))
    }
}

/// A block as returned by queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Block header.
    pub header: BlockHeader,
    /// Publication, present once finalized.
    pub publication: Option<BlockPublication>,
    /// One-based position in the chain.
    pub height: u64,
    /// Covered transactions, only when requested.
    pub transactions: Vec<Transaction>,
}

/// A freshly created (or still unpublished) block handed to the finalizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBlock {
    /// Header to publish.
    pub header: BlockHeader,
    /// Covered transactions in id order.
    pub transaction_hashes: Vec<TransactionHash>,
}
