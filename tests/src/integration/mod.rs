//! # Integration Flows
//!
//! Whole registry instances over in-memory backends. Several instances of
//! one registry share a store, broker and status cache through [`Backends`],
//! the way separate processes would share external services.
//!
//! [`Backends`]: registry_runtime::Backends

#[cfg(test)]
mod support;

mod lifecycle;
mod rejection;
mod rescale;
