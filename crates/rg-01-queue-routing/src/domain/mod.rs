//! # Domain Layer
//!
//! Topology options, queue slots and routing errors.

mod errors;
mod value_objects;

pub use errors::RoutingError;
pub use value_objects::{QueueSlot, TopologyOptions, MAX_SERVERS, MAX_THREADS, MAX_WEIGHT};
