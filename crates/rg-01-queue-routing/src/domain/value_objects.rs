//! # Value Objects
//!
//! Topology options and queue slots.

use crate::domain::RoutingError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of registry servers.
pub const MAX_SERVERS: u32 = 128;

/// Maximum number of verifier threads per server.
pub const MAX_THREADS: u32 = 128;

/// Maximum virtual nodes per queue.
pub const MAX_WEIGHT: u32 = 100;

/// Processing topology shared by every registry instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopologyOptions {
    /// Index of this instance, `0..servers`.
    pub server_number: u32,
    /// Number of registry instances.
    pub servers: u32,
    /// Verifier workers per instance.
    pub threads: u32,
    /// Virtual nodes per queue on the hash ring.
    pub weight: u32,
}

impl Default for TopologyOptions {
    fn default() -> Self {
        Self {
            server_number: 0,
            servers: 1,
            threads: 1,
            weight: 10,
        }
    }
}

impl TopologyOptions {
    /// Topology with the default weight.
    pub fn new(server_number: u32, servers: u32, threads: u32) -> Self {
        Self {
            server_number,
            servers,
            threads,
            ..Default::default()
        }
    }

    /// Replace the weight.
    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    /// Check every option against its range.
    pub fn validate(&self) -> Result<(), RoutingError> {
        if !(1..=MAX_SERVERS).contains(&self.servers) {
            return Err(RoutingError::InvalidTopology(format!(
                "servers must be 1..={MAX_SERVERS}, got {}",
                self.servers
            )));
        }
        if !(1..=MAX_THREADS).contains(&self.threads) {
            return Err(RoutingError::InvalidTopology(format!(
                "threads must be 1..={MAX_THREADS}, got {}",
                self.threads
            )));
        }
        if !(1..=MAX_WEIGHT).contains(&self.weight) {
            return Err(RoutingError::InvalidTopology(format!(
                "weight must be 1..={MAX_WEIGHT}, got {}",
                self.weight
            )));
        }
        if self.server_number >= self.servers {
            return Err(RoutingError::InvalidTopology(format!(
                "server_number {} outside 0..{}",
                self.server_number, self.servers
            )));
        }
        Ok(())
    }

    /// Slots served by this instance, one per thread.
    pub fn local_slots(&self) -> impl Iterator<Item = QueueSlot> + '_ {
        (0..self.threads).map(move |thread| QueueSlot::new(self.server_number, thread))
    }
}

/// A `(server, thread)` pair owning exactly one queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueueSlot {
    /// Registry instance index.
    pub server: u32,
    /// Worker index within the instance.
    pub thread: u32,
}

impl QueueSlot {
    /// Create a slot.
    pub fn new(server: u32, thread: u32) -> Self {
        Self { server, thread }
    }

    /// Queue name of this slot.
    pub fn queue_name(&self) -> String {
        self.to_string()
    }

    /// Parse `registry_{server}.verifier_{thread}`; `None` for foreign names.
    pub fn parse(queue_name: &str) -> Option<Self> {
        let rest = queue_name.strip_prefix("registry_")?;
        let (server, thread) = rest.split_once(".verifier_")?;
        Some(Self {
            server: server.parse().ok()?,
            thread: thread.parse().ok()?,
        })
    }

    /// True when the slot exists under `options`.
    pub fn is_active_in(&self, options: &TopologyOptions) -> bool {
        self.server < options.servers && self.thread < options.threads
    }
}

impl fmt::Display for QueueSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "registry_{}.verifier_{}", self.server, self.thread)
    }
}
