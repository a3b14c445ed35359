//! # Algorithms
//!
//! - `hash_ring`: consistent hash ring with weighted virtual nodes

mod hash_ring;

pub use hash_ring::{ring_position, ConsistentHashRing};
