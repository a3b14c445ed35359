//! # Consistent Hash Ring Queue Resolver

use crate::algorithms::ConsistentHashRing;
use crate::domain::{QueueSlot, RoutingError, TopologyOptions};
use crate::ports::QueueResolver;

/// Resolver backed by a ring built once for a validated topology.
#[derive(Debug, Clone)]
pub struct ConsistentHashRingQueueResolver {
    options: TopologyOptions,
    ring: ConsistentHashRing,
}

impl ConsistentHashRingQueueResolver {
    /// Validate `options` and build the ring.
    pub fn new(options: TopologyOptions) -> Result<Self, RoutingError> {
        options.validate()?;
        let ring = ConsistentHashRing::build(&options);
        tracing::info!(
            servers = options.servers,
            threads = options.threads,
            weight = options.weight,
            virtual_nodes = ring.len(),
            "[rg-01] Hash ring built"
        );
        Ok(Self { options, ring })
    }

    /// Topology the ring was built for.
    pub fn options(&self) -> &TopologyOptions {
        &self.options
    }
}

impl QueueResolver for ConsistentHashRingQueueResolver {
    fn queue_for_key(&self, key: &[u8]) -> String {
        match self.ring.lookup(key) {
            Some(queue) => queue.to_string(),
            // A validated topology always has at least one node.
            None => QueueSlot::new(0, 0).queue_name(),
        }
    }

    fn queue_for_slot(&self, server: u32, thread: u32) -> String {
        QueueSlot::new(server, thread).queue_name()
    }

    fn inactive_queues(&self, existing: &[String]) -> Vec<String> {
        existing
            .iter()
            .filter(|name| {
                QueueSlot::parse(name).is_some_and(|slot| !slot.is_active_in(&self.options))
            })
            .cloned()
            .collect()
    }
}
