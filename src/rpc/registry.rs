//! Method lookup and the handler contract

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value};

use crate::errors::RpcError;

/// Request parameters, resolved once before a handler runs.
#[derive(Debug, Clone, PartialEq)]
pub enum Params {
    Positional(Vec<Value>),
    Named(Map<String, Value>),
}

impl Params {
    /// Absent or `null` params become an empty positional list.
    pub fn from_value(params: Option<Value>) -> Result<Self, RpcError> {
        match params {
            None | Some(Value::Null) => Ok(Self::Positional(Vec::new())),
            Some(Value::Array(items)) => Ok(Self::Positional(items)),
            Some(Value::Object(map)) => Ok(Self::Named(map)),
            Some(_) => Err(RpcError::invalid_params("Invalid params")),
        }
    }
}

pub type HandlerResult = Result<Value, RpcError>;

/// One exercise's computation. Handlers are pure and never build envelopes.
pub trait MethodHandler: Send + Sync {
    fn call(&self, params: Params) -> HandlerResult;
}

impl<F> MethodHandler for F
where
    F: Fn(Params) -> HandlerResult + Send + Sync,
{
    fn call(&self, params: Params) -> HandlerResult {
        self(params)
    }
}

/// Immutable name-to-handler table, built once at startup.
#[derive(Default)]
pub struct MethodRegistry {
    handlers: BTreeMap<String, Box<dyn MethodHandler>>,
}

impl MethodRegistry {
    pub fn builder() -> MethodRegistryBuilder {
        MethodRegistryBuilder::default()
    }

    pub fn lookup(&self, method: &str) -> Option<&dyn MethodHandler> {
        self.handlers.get(method).map(|handler| &**handler)
    }

    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }
}

impl fmt::Debug for MethodRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodRegistry")
            .field("methods", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[derive(Default)]
pub struct MethodRegistryBuilder {
    handlers: BTreeMap<String, Box<dyn MethodHandler>>,
}

impl MethodRegistryBuilder {
    /// Registers `handler` under `name`, replacing any earlier registration.
    pub fn method(mut self, name: impl Into<String>, handler: impl MethodHandler + 'static) -> Self {
        self.handlers.insert(name.into(), Box::new(handler));
        self
    }

    pub fn build(self) -> MethodRegistry {
        MethodRegistry {
            handlers: self.handlers,
        }
    }
}
