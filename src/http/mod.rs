//! HTTP transport for the JSON-RPC dispatcher
//!
//! Provides the single `POST /` endpoint mounted by [`crate::build_app`].

pub mod handlers;
