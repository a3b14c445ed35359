//! # Algorithms
//!
//! - `block_builder`: block range selection, Merkle root and header chaining

pub mod block_builder;

pub use block_builder::BlockBuilder;
