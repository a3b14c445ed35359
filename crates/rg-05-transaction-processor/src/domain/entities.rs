//! # Processing Outcomes

/// Result of the verify procedure for one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// Verified and appended to its stream.
    Committed,
    /// Already on its stream; a redelivery.
    AlreadyCommitted,
    /// Rejected with a reason; recorded as `Failed`.
    Rejected(String),
}

/// What a worker did with one delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Verified on this queue.
    Processed(VerifyOutcome),
    /// Republished to the queue that owns the stream now.
    Rerouted {
        /// Target queue.
        queue: String,
    },
    /// Body is not a transaction; recorded as `Failed`.
    Undecodable,
}
