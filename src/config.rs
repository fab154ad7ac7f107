//! Runtime configuration
//!
//! Remote link settings come from JSON (as part of a model file) and may be
//! overridden from the environment, mirroring how the service binaries pick
//! up `HOST`/`PORT`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{FEAError, FEAResult};

/// Environment variable overriding [`LinkConfig::host`]
pub const ENV_HOST: &str = "FRAME_HYBRID_HOST";
/// Environment variable overriding [`LinkConfig::port`]
pub const ENV_PORT: &str = "FRAME_HYBRID_PORT";
/// Environment variable overriding [`LinkConfig::timeout_ms`]
pub const ENV_TIMEOUT_MS: &str = "FRAME_HYBRID_TIMEOUT_MS";

/// Settings for the network channel of a remote actuator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Interface to listen on
    pub host: String,
    /// Port the experimental control connects to
    pub port: u16,
    /// Read/write timeout in milliseconds; `None` blocks indefinitely
    pub timeout_ms: Option<u64>,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8090,
            timeout_ms: None,
        }
    }
}

impl LinkConfig {
    /// Create a config listening on all interfaces at `port`
    pub fn new(port: u16) -> Self {
        Self {
            port,
            ..Self::default()
        }
    }

    pub fn with_host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// `host:port` string suitable for binding
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Apply overrides from the process environment
    pub fn with_env_overrides(self) -> FEAResult<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn with_overrides<F>(mut self, lookup: F) -> FEAResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(ENV_HOST) {
            self.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.port = port
                .parse()
                .map_err(|_| FEAError::InvalidInput(format!("{ENV_PORT}={port} is not a port")))?;
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT_MS) {
            self.timeout_ms = match timeout.as_str() {
                "" | "none" => None,
                ms => Some(ms.parse().map_err(|_| {
                    FEAError::InvalidInput(format!("{ENV_TIMEOUT_MS}={ms} is not a duration"))
                })?),
            };
        }
        Ok(self)
    }
}
