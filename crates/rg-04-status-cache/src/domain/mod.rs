//! # Domain Layer

pub mod errors;

pub use errors::{CacheError, Result};

use shared_types::TransactionHash;

/// Cache key of a transaction's status: its lowercase hex hash.
pub fn status_key(hash: &TransactionHash) -> String {
    hash.to_string()
}
