//! JSON-RPC 2.0 protocol core
//!
//! Envelope validation, method lookup, and the dispatcher that ties them
//! together. Transports feed bytes in and serialize the [`dispatcher::Outcome`].

pub mod dispatcher;
pub mod envelope;
pub mod registry;
