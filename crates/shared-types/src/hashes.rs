//! # Content Hashes
//!
//! SHA-256 identifiers for transactions and block headers.

use crate::errors::CodecError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// A 32-byte SHA-256 digest.
pub type Hash = [u8; 32];

/// Zero-filled hash used as the "previous" link of the first block.
pub const ZERO_HASH: Hash = [0u8; 32];

/// SHA-256 of `data`.
pub fn sha256(data: &[u8]) -> Hash {
    Sha256::digest(data).into()
}

/// SHA-256 of `left || right`.
pub fn sha256_pair(left: &Hash, right: &Hash) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

fn parse_hex_hash(s: &str) -> Result<Hash, CodecError> {
    let bytes = hex::decode(s).map_err(|e| CodecError::InvalidHash(e.to_string()))?;
    bytes
        .try_into()
        .map_err(|b: Vec<u8>| CodecError::InvalidHash(format!("expected 32 bytes, got {}", b.len())))
}

/// Externally visible transaction identifier: SHA-256 of the encoded transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransactionHash(pub Hash);

impl TransactionHash {
    /// Hash of an already-encoded transaction.
    pub fn of_bytes(encoded: &[u8]) -> Self {
        Self(sha256(encoded))
    }

    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &Hash {
        &self.0
    }
}

impl fmt::Display for TransactionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for TransactionHash {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hex_hash(s).map(Self)
    }
}

/// Block identifier: SHA-256 of the encoded block header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockHash(pub Hash);

impl BlockHash {
    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &Hash {
        &self.0
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for BlockHash {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hex_hash(s).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            hex::encode(sha256(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_sha256_pair_matches_concatenation() {
        let a = sha256(b"a");
        let b = sha256(b"b");
        let mut joined = a.to_vec();
        joined.extend_from_slice(&b);
        assert_eq!(sha256_pair(&a, &b), sha256(&joined));
    }

    #[test]
    fn test_transaction_hash_display_parse() {
        let hash = TransactionHash::of_bytes(b"payload");
        let parsed: TransactionHash = hash.to_string().parse().unwrap();
        assert_eq!(parsed, hash);
    }

    #[test]
    fn test_rejects_short_hash() {
        let err = "abcd".parse::<BlockHash>().unwrap_err();
        assert!(err.to_string().contains("expected 32 bytes"));
    }

    #[test]
    fn test_rejects_non_hex() {
        assert!("not-hex".parse::<TransactionHash>().is_err());
    }
}
