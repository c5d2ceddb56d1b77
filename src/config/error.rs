//! Configuration errors.
//!
//! Every variant is fatal to startup: the proxy never begins serving traffic
//! with a configuration that produced one of these.

use std::path::PathBuf;

use crate::routing::rule::RULE_FORMAT;

/// Error raised while parsing, loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A rule string could not be turned into a [`Rule`](crate::routing::Rule).
    #[error("{reason}: parsing rule: {rule} (expected format: {RULE_FORMAT})")]
    InvalidRule {
        /// The offending rule text, verbatim.
        rule: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Operator name is not one of `prefix`, `equal`, `regexp`.
    #[error("invalid operator {0:?}")]
    InvalidOperator(String),

    /// The match value of a rule is empty.
    #[error("value is required")]
    EmptyValue,

    /// The destination of a rule is empty.
    #[error("url is required")]
    EmptyDestination,

    /// The destination of a rule is not a valid absolute URL.
    #[error("invalid destination {destination:?}: {source}")]
    InvalidDestination {
        destination: String,
        #[source]
        source: url::ParseError,
    },

    /// A `regexp:` rule value does not compile.
    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// No default endpoint was configured.
    #[error("endpoint is required")]
    MissingEndpoint,

    /// The default endpoint is not an absolute http(s) URL.
    #[error("invalid endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// The request timeout is zero.
    #[error("timeout must be greater than zero")]
    InvalidTimeout,

    /// The listen address is empty.
    #[error("listen address is required")]
    MissingAddress,

    /// The configuration file could not be read.
    #[error("failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`ProxyConfig`](crate::config::ProxyConfig).
    #[error("failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The upstream TLS client could not be initialised.
    #[error("failed to initialise upstream TLS: {0}")]
    Tls(#[from] rustls::Error),

    /// Every problem found by [`validate_config`](crate::config::validate_config).
    #[error("invalid configuration: {}", join(.0))]
    Validation(Vec<ConfigError>),
}

fn join(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
