//! Command-line interface.
//!
//! Flags and their environment variables override the optional config file,
//! which overrides the built-in defaults. Rules given with `--rule` are
//! appended after the rules from the file.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::config::duration_format::parse_duration;
use crate::config::{load_config, ConfigError, ProxyConfig};
use crate::observability::LogFormat;

#[derive(Debug, Parser)]
#[command(name = "developer-proxy", version)]
#[command(about = "Rule-based HTTP reverse proxy for local development", long_about = None)]
pub struct Cli {
    /// TOML configuration file.
    #[arg(long, env = "DEVELOPER_PROXY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,

    /// Log output format.
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Address to listen on [default: 127.0.0.1:10000].
    #[arg(long, env = "DEVELOPER_PROXY_ADDRESS")]
    pub address: Option<String>,

    /// Default endpoint for requests no rule matches.
    #[arg(long, env = "DEVELOPER_PROXY_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Deadline for each proxied request, e.g. 60s or 1m 30s [default: 60s].
    #[arg(long, env = "DEVELOPER_PROXY_TIMEOUT", value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// Routing rule `[prefix:|equal:|regexp:]/value@destination`.
    /// May be repeated; rules are tried in order.
    #[arg(long = "rule", value_name = "RULE")]
    pub rules: Vec<String>,
}

impl Cli {
    /// Load the config file, if any, and apply the flags on top of it.
    pub fn into_config(self) -> Result<ProxyConfig, ConfigError> {
        let base = match &self.config {
            Some(path) => load_config(path)?,
            None => ProxyConfig::default(),
        };
        Ok(self.apply(base))
    }

    /// Override `config` with the values given on the command line.
    pub fn apply(self, mut config: ProxyConfig) -> ProxyConfig {
        if let Some(address) = self.address {
            config.listener.address = address;
        }
        if let Some(endpoint) = self.endpoint {
            config.endpoint = Some(endpoint);
        }
        if let Some(timeout) = self.timeout {
            config.timeout = timeout;
        }
        if let Some(format) = self.log_format {
            config.log.format = format;
        }
        config.log.debug |= self.debug;
        config.rules.extend(self.rules);
        config
    }
}
