//! # Merkle Tree
//!
//! Binary SHA-256 tree over transaction payloads.
//!
//! ## Algorithm
//!
//! 1. Leaf `i` is `H(payload[i])`
//! 2. Leaves are padded to the next power of two by repeating the last leaf
//! 3. Each parent is `H(left || right)`, built bottom-up
//!
//! A single transaction yields `root = H(payload)` and an empty proof path.

use serde::{Deserialize, Serialize};
use shared_types::{sha256, sha256_pair, Hash};

/// Merkle tree stored in array form: `[root, level1..., leaves...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree {
    nodes: Vec<Hash>,
    leaf_count: usize,
    padded_leaf_count: usize,
}

impl MerkleTree {
    /// Build a tree over `payloads` in order. `None` for an empty input.
    pub fn from_payloads<'a, I>(payloads: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        Self::from_leaves(payloads.into_iter().map(sha256).collect())
    }

    /// Build a tree over already-hashed leaves.
    pub fn from_leaves(mut leaves: Vec<Hash>) -> Option<Self> {
        let leaf_count = leaves.len();
        let last = *leaves.last()?;

        let padded_leaf_count = leaf_count.next_power_of_two();
        leaves.resize(padded_leaf_count, last);

        // Parent at index i has children at 2i+1 and 2i+2
        let leaf_start = padded_leaf_count - 1;
        let mut nodes = vec![[0u8; 32]; leaf_start];
        nodes.extend(leaves);
        for i in (0..leaf_start).rev() {
            nodes[i] = sha256_pair(&nodes[2 * i + 1], &nodes[2 * i + 2]);
        }

        Some(Self {
            nodes,
            leaf_count,
            padded_leaf_count,
        })
    }

    /// Root hash.
    pub fn root(&self) -> Hash {
        self.nodes[0]
    }

    /// Number of real leaves, before padding.
    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// Authentication path for leaf `index`, or `None` when out of range.
    pub fn proof(&self, index: usize) -> Option<MerkleProof> {
        if index >= self.leaf_count {
            return None;
        }

        let mut current = self.padded_leaf_count - 1 + index;
        let leaf_hash = self.nodes[current];
        let mut path = Vec::new();

        while current > 0 {
            let (sibling, position) = if current % 2 == 0 {
                (current - 1, SiblingPosition::Left)
            } else {
                (current + 1, SiblingPosition::Right)
            };
            path.push(ProofNode {
                hash: self.nodes[sibling],
                position,
            });
            current = (current - 1) / 2;
        }

        Some(MerkleProof {
            leaf_index: index,
            leaf_hash,
            root: self.root(),
            path,
        })
    }
}

/// Inclusion proof for one leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    /// Position of the leaf among the block's transactions.
    pub leaf_index: usize,
    /// `H(payload)` of the proven transaction.
    pub leaf_hash: Hash,
    /// Root the proof was generated against.
    pub root: Hash,
    /// Sibling hashes from leaf to root.
    pub path: Vec<ProofNode>,
}

impl MerkleProof {
    /// Recompute the root from `leaf_hash` and the path.
    pub fn compute_root(&self) -> Hash {
        self.path.iter().fold(self.leaf_hash, |current, node| match node.position {
            SiblingPosition::Left => sha256_pair(&node.hash, &current),
            SiblingPosition::Right => sha256_pair(&current, &node.hash),
        })
    }

    /// True when the path recombines to `expected_root`.
    pub fn verify(&self, expected_root: &Hash) -> bool {
        self.compute_root() == *expected_root
    }
}

/// A single sibling on a proof path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofNode {
    /// Sibling hash at this level.
    pub hash: Hash,
    /// Side the sibling sits on.
    pub position: SiblingPosition,
}

/// Side of a sibling relative to the running hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SiblingPosition {
    /// Sibling is hashed on the left.
    Left,
    /// Sibling is hashed on the right.
    Right,
}
