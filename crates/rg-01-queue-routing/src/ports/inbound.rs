//! # Inbound Ports
//!
//! Queue resolution API.

use shared_types::Transaction;

/// Maps stream keys to queues under the current topology.
///
/// Implementations are pure: the same key and topology always give the same queue.
pub trait QueueResolver: Send + Sync {
    /// Queue owning `key`.
    fn queue_for_key(&self, key: &[u8]) -> String;

    /// Queue name of the `(server, thread)` slot.
    fn queue_for_slot(&self, server: u32, thread: u32) -> String;

    /// Names in `existing` that are registry queues no longer reachable
    /// under the current topology. Foreign queue names are never returned.
    fn inactive_queues(&self, existing: &[String]) -> Vec<String>;

    /// Queue owning the stream of `transaction`, keyed by the hyphenated stream id.
    fn queue_for_transaction(&self, transaction: &Transaction) -> String {
        self.queue_for_key(transaction.stream_id().to_string().as_bytes())
    }
}
