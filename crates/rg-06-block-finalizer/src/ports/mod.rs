//! # Ports Layer
//!
//! - `inbound`: `BlockFinalizer`
//! - `outbound`: `BlockPublisher`

pub mod inbound;
pub mod outbound;

pub use inbound::BlockFinalizer;
pub use outbound::BlockPublisher;
