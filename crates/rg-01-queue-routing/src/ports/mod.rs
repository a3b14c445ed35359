//! # Ports Layer
//!
//! - `inbound`: the QueueResolver API used by the front door, the workers and
//!   the cleanup reconciler

mod inbound;

pub use inbound::QueueResolver;
