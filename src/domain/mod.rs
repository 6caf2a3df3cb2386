//! Exercise methods and their numeric rules
//!
//! Provides the handlers plugged into the JSON-RPC dispatcher, one per exercise.

pub mod methods;
pub mod numbers;
