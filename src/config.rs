use std::{
    env,
    net::{SocketAddr, ToSocketAddrs},
};

use thiserror::Error;

use crate::domain::methods::{default_registry, is_known_method, registry_for};
use crate::rpc::registry::MethodRegistry;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 4000;

/// Settings shared by both transports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Methods to expose. Empty means every exercise method.
    pub methods: Vec<String>,
}

/// Listener settings, only read when serving HTTP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    pub bind_addr: String,
    pub bind_port: u16,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("TEST_PORT must be a valid u16")]
    InvalidPort,
    #[error("invalid bind address or port")]
    InvalidSocket,
    #[error("unknown method `{0}`")]
    UnknownMethod(String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads `RPC_METHODS` through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let methods = lookup("RPC_METHODS")
            .map(|value| split_methods(&value))
            .unwrap_or_default();

        let config = Self { methods };
        config.validate()?;
        Ok(config)
    }

    /// Replaces the method list when `methods` is non-empty.
    pub fn with_methods(mut self, methods: Vec<String>) -> Result<Self, ConfigError> {
        if !methods.is_empty() {
            self.methods = methods;
        }

        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(unknown) = self.methods.iter().find(|name| !is_known_method(name)) {
            return Err(ConfigError::UnknownMethod(unknown.clone()));
        }
        Ok(())
    }

    pub fn registry(&self) -> MethodRegistry {
        if self.methods.is_empty() {
            default_registry()
        } else {
            registry_for(&self.methods)
        }
    }
}

impl HttpConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads `TEST_HOST` and `TEST_PORT` through `lookup`. Blank values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = non_blank(lookup("TEST_HOST")).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let bind_port = non_blank(lookup("TEST_PORT"))
            .map(|value| value.parse::<u16>().map_err(|_| ConfigError::InvalidPort))
            .transpose()?
            .unwrap_or(DEFAULT_PORT);

        Ok(Self {
            bind_addr,
            bind_port,
        })
    }

    /// Applies command-line overrides on top of the environment.
    pub fn with_overrides(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.bind_addr = host;
        }
        if let Some(port) = port {
            self.bind_port = port;
        }
        self
    }

    /// Resolves the listener address. Hostnames are looked up here, not at load time.
    pub fn bind_socket(&self) -> Result<SocketAddr, ConfigError> {
        (self.bind_addr.as_str(), self.bind_port)
            .to_socket_addrs()
            .map_err(|_| ConfigError::InvalidSocket)?
            .next()
            .ok_or(ConfigError::InvalidSocket)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn split_methods(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
