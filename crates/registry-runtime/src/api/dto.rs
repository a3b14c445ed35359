//! JSON shapes of the HTTP surface. Binary fields travel as lowercase hex.

use chrono::{DateTime, Utc};
use rg_02_transaction_store::{SiblingPosition, TransactionProof};
use serde::{Deserialize, Serialize};
use shared_types::{
    Block, BlockPublication, CodecError, FederatedStreamId, Hash, StreamTransaction, Transaction,
    TransactionHeader,
};
use uuid::Uuid;

use crate::api::error::ApiError;

/// Default page size of `GET /v1/blocks`.
pub const DEFAULT_BLOCK_PAGE: usize = 10;

/// Largest page size of `GET /v1/blocks`.
pub const MAX_BLOCK_PAGE: usize = 100;

/// A transaction as submitted and returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDto {
    pub registry: String,
    pub stream_id: Uuid,
    pub payload_type: String,
    pub payload_hash: String,
    pub nonce: String,
    #[serde(default)]
    pub header_signature: String,
    pub payload: String,
}

impl TransactionDto {
    /// Decode the hex fields into a transaction.
    pub fn into_transaction(self) -> Result<Transaction, ApiError> {
        Ok(Transaction {
            header: TransactionHeader {
                federated_stream_id: FederatedStreamId::new(self.registry, self.stream_id),
                payload_type: self.payload_type,
                payload_hash: decode_hex("payload_hash", &self.payload_hash)?,
                nonce: self.nonce,
            },
            header_signature: decode_hex("header_signature", &self.header_signature)?,
            payload: decode_hex("payload", &self.payload)?,
        })
    }
}

impl From<&Transaction> for TransactionDto {
    fn from(tx: &Transaction) -> Self {
        Self {
            registry: tx.header.federated_stream_id.registry.clone(),
            stream_id: tx.header.federated_stream_id.stream_id,
            payload_type: tx.header.payload_type.clone(),
            payload_hash: hex::encode(&tx.header.payload_hash),
            nonce: tx.header.nonce.clone(),
            header_signature: hex::encode(&tx.header_signature),
            payload: hex::encode(&tx.payload),
        }
    }
}

fn decode_hex(field: &str, value: &str) -> Result<Vec<u8>, ApiError> {
    hex::decode(value).map_err(|e| ApiError::BadRequest(format!("{field}: {e}")))
}

/// Body of `POST /v1/transactions`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SendTransactionsRequest {
    pub transactions: Vec<TransactionDto>,
}

/// Response of `POST /v1/transactions`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SendTransactionsResponse {
    pub transaction_hashes: Vec<String>,
}

/// One entry of a stream listing.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StreamTransactionDto {
    pub transaction_hash: String,
    pub stream_index: u64,
    pub transaction: TransactionDto,
}

impl TryFrom<&StreamTransaction> for StreamTransactionDto {
    type Error = CodecError;

    fn try_from(record: &StreamTransaction) -> Result<Self, Self::Error> {
        Ok(Self {
            transaction_hash: record.transaction_hash.to_string(),
            stream_index: record.stream_index,
            transaction: TransactionDto::from(&record.transaction()?),
        })
    }
}

/// Query of `GET /v1/blocks`.
#[derive(Debug, Clone, Deserialize)]
pub struct BlocksQuery {
    #[serde(default)]
    pub skip: usize,
    #[serde(default = "default_take")]
    pub take: usize,
    #[serde(default)]
    pub include_transactions: bool,
}

fn default_take() -> usize {
    DEFAULT_BLOCK_PAGE
}

/// External anchor of a block.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PublicationDto {
    LogEntry { block_header_hash: String },
}

impl From<&BlockPublication> for PublicationDto {
    fn from(publication: &BlockPublication) -> Self {
        match publication {
            BlockPublication::LogEntry { block_header_hash } => PublicationDto::LogEntry {
                block_header_hash: hex::encode(block_header_hash),
            },
        }
    }
}

/// A block with its header fields flattened.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BlockDto {
    pub height: u64,
    pub block_hash: String,
    pub previous_header_hash: String,
    pub previous_publication_hash: String,
    pub merkle_root_hash: String,
    pub created_at: DateTime<Utc>,
    pub publication: Option<PublicationDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transactions: Option<Vec<TransactionDto>>,
}

impl BlockDto {
    /// Flatten `block`; transactions are listed only when asked for.
    pub fn from_block(block: &Block, include_transactions: bool) -> Result<Self, CodecError> {
        let header = &block.header;
        Ok(Self {
            height: block.height,
            block_hash: header.hash()?.to_string(),
            previous_header_hash: hex::encode(header.previous_header_hash),
            previous_publication_hash: hex::encode(header.previous_publication_hash),
            merkle_root_hash: hex::encode(header.merkle_root_hash),
            created_at: header.created_at,
            publication: block.publication.as_ref().map(PublicationDto::from),
            transactions: include_transactions
                .then(|| block.transactions.iter().map(TransactionDto::from).collect()),
        })
    }
}

/// One step of a proof path.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProofStepDto {
    pub hash: String,
    pub position: SiblingPosition,
}

/// Inclusion proof of a transaction in its block.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MerkleProofDto {
    pub transaction_hash: String,
    pub payload: String,
    pub block_hash: String,
    pub block_height: u64,
    pub leaf_index: usize,
    pub leaf_hash: String,
    pub merkle_root_hash: String,
    pub path: Vec<ProofStepDto>,
}

impl From<&TransactionProof> for MerkleProofDto {
    fn from(proof: &TransactionProof) -> Self {
        Self {
            transaction_hash: proof.transaction_hash.to_string(),
            payload: hex::encode(&proof.payload),
            block_hash: proof.block_hash.to_string(),
            block_height: proof.block_height,
            leaf_index: proof.proof.leaf_index,
            leaf_hash: hex::encode(proof.proof.leaf_hash),
            merkle_root_hash: hex::encode(proof.proof.root),
            path: proof
                .proof
                .path
                .iter()
                .map(|node| ProofStepDto {
                    hash: hex::encode(node.hash),
                    position: node.position,
                })
                .collect(),
        }
    }
}

/// Decode a 32-byte hex hash from a proof step or header field.
pub fn parse_hash(value: &str) -> Option<Hash> {
    let bytes = hex::decode(value).ok()?;
    bytes.try_into().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{sha256, BlockHeader, ZERO_HASH};

    fn sample() -> Transaction {
        Transaction {
            header: TransactionHeader {
                federated_stream_id: FederatedStreamId::new("registry", Uuid::new_v4()),
                payload_type: "dev.Event".to_string(),
                payload_hash: sha256(b"abc").to_vec(),
                nonce: "7".to_string(),
            },
            header_signature: vec![0xde, 0xad],
            payload: b"abc".to_vec(),
        }
    }

    #[test]
    fn test_transaction_dto_preserves_transaction() {
        let tx = sample();
        let dto = TransactionDto::from(&tx);
        assert_eq!(dto.payload, "616263");
        assert_eq!(dto.header_signature, "dead");
        assert_eq!(dto.into_transaction().unwrap(), tx);
    }

    #[test]
    fn test_bad_hex_is_a_bad_request() {
        let mut dto = TransactionDto::from(&sample());
        dto.payload = "zz".to_string();
        let err = dto.into_transaction().unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(ref m) if m.starts_with("payload:")));
    }

    #[test]
    fn test_missing_signature_defaults_to_empty() {
        let json = serde_json::json!({
            "registry": "registry",
            "stream_id": Uuid::nil(),
            "payload_type": "dev.Event",
            "payload_hash": hex::encode(sha256(b"")),
            "nonce": "1",
            "payload": ""
        });
        let dto: TransactionDto = serde_json::from_value(json).unwrap();
        assert!(dto.into_transaction().unwrap().header_signature.is_empty());
    }

    #[test]
    fn test_block_dto_hides_transactions_unless_asked() {
        let tx = sample();
        let block = Block {
            header: BlockHeader {
                previous_header_hash: ZERO_HASH,
                previous_publication_hash: ZERO_HASH,
                merkle_root_hash: sha256(b"abc"),
                created_at: shared_types::block_timestamp(),
            },
            publication: None,
            height: 1,
            transactions: vec![tx],
        };

        let without = serde_json::to_value(BlockDto::from_block(&block, false).unwrap()).unwrap();
        assert!(without.get("transactions").is_none());
        assert!(without["publication"].is_null());

        let with = BlockDto::from_block(&block, true).unwrap();
        assert_eq!(with.transactions.unwrap().len(), 1);
        assert_eq!(with.block_hash, block.header.hash().unwrap().to_string());
    }

    #[test]
    fn test_publication_is_tagged() {
        let dto = PublicationDto::from(&BlockPublication::LogEntry {
            block_header_hash: ZERO_HASH,
        });
        let json = serde_json::to_value(dto).unwrap();
        assert_eq!(json["type"], "log_entry");
        assert_eq!(json["block_header_hash"], hex::encode(ZERO_HASH));
    }

    #[test]
    fn test_parse_hash() {
        assert_eq!(parse_hash(&hex::encode(ZERO_HASH)), Some(ZERO_HASH));
        assert_eq!(parse_hash("abcd"), None);
        assert_eq!(parse_hash("not hex"), None);
    }
}
