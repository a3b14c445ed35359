//! # Consistent Hash Ring
//!
//! Every queue owns `weight` virtual nodes placed at
//! `position("{queue}.weight_{w}")`. A key belongs to the first virtual node
//! at or after its own position, wrapping to the lowest position.
//!
//! ## Properties
//!
//! - Deterministic: the ring depends only on the topology.
//! - Total: every key maps to exactly one queue.
//! - Minimal remapping: removing a server only moves keys that the removed
//!   queues owned.

use crate::domain::{QueueSlot, TopologyOptions};
use md5::{Digest, Md5};
use std::collections::BTreeMap;

/// Ring position of `bytes`: the first four MD5 bytes as a little-endian `u32`.
pub fn ring_position(bytes: &[u8]) -> u32 {
    let digest = Md5::digest(bytes);
    u32::from_le_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// Immutable ring built once per topology.
#[derive(Debug, Clone)]
pub struct ConsistentHashRing {
    nodes: BTreeMap<u32, String>,
}

impl ConsistentHashRing {
    /// Build the ring for `servers × threads × weight` virtual nodes.
    ///
    /// Colliding positions keep the later node.
    pub fn build(options: &TopologyOptions) -> Self {
        let mut nodes = BTreeMap::new();
        for server in 0..options.servers {
            for thread in 0..options.threads {
                let queue = QueueSlot::new(server, thread).queue_name();
                for weight in 0..options.weight {
                    let position = ring_position(format!("{queue}.weight_{weight}").as_bytes());
                    nodes.insert(position, queue.clone());
                }
            }
        }
        Self { nodes }
    }

    /// Queue owning `key`, or `None` for an empty ring.
    pub fn lookup(&self, key: &[u8]) -> Option<&str> {
        let position = ring_position(key);
        self.nodes
            .range(position..)
            .next()
            .or_else(|| self.nodes.iter().next())
            .map(|(_, queue)| queue.as_str())
    }

    /// Number of virtual nodes on the ring.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the ring has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
