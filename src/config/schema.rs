//! Configuration schema definitions.
//!
//! The same structure is filled from an optional TOML file and then
//! overridden by command-line flags and environment variables.

use std::time::Duration;

use serde::Deserialize;

use crate::config::duration_format;
use crate::observability::logging::LogFormat;

/// Default listen address.
pub const DEFAULT_ADDRESS: &str = "127.0.0.1:10000";

/// Default deadline for one forwarded exchange.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Root configuration for the proxy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProxyConfig {
    /// Listener configuration.
    pub listener: ListenerConfig,

    /// Default endpoint; fallback for unmatched requests and the target of
    /// `endpoint` rules. Required.
    pub endpoint: Option<String>,

    /// Deadline applied to every forwarded request (e.g. `"60s"`).
    #[serde(with = "duration_format")]
    pub timeout: Duration,

    /// Rule strings, evaluated in this order.
    pub rules: Vec<String>,

    /// Logging settings.
    pub log: LogConfig,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            endpoint: None,
            timeout: DEFAULT_TIMEOUT,
            rules: Vec::new(),
            log: LogConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:10000").
    pub address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// Enable debug logging.
    pub debug: bool,

    /// Output format.
    pub format: LogFormat,
}
