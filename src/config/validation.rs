//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde and clap handle syntax)
//! - Check the default endpoint is an absolute http(s) URL
//! - Parse every rule string into a [`Rule`]
//! - Validate value ranges (timeout > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: ProxyConfig → Result<Vec<Rule>, Vec<ConfigError>>
//! - Runs before the listener is bound

use crate::config::error::ConfigError;
use crate::config::schema::ProxyConfig;
use crate::routing::Rule;

/// Validate `config` and return its parsed rules, in configuration order.
pub fn validate_config(config: &ProxyConfig) -> Result<Vec<Rule>, Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.listener.address.trim().is_empty() {
        errors.push(ConfigError::MissingAddress);
    }

    match config.endpoint.as_deref() {
        None | Some("") => errors.push(ConfigError::MissingEndpoint),
        Some(endpoint) => {
            if let Err(e) = validate_endpoint(endpoint) {
                errors.push(e);
            }
        }
    }

    if config.timeout.is_zero() {
        errors.push(ConfigError::InvalidTimeout);
    }

    let mut rules = Vec::with_capacity(config.rules.len());
    for text in &config.rules {
        match Rule::parse(text) {
            Ok(rule) => rules.push(rule),
            Err(e) => errors.push(e),
        }
    }

    if errors.is_empty() {
        Ok(rules)
    } else {
        Err(errors)
    }
}

/// Check that the default endpoint is an absolute http(s) URL.
pub fn validate_endpoint(endpoint: &str) -> Result<(), ConfigError> {
    let url = url::Url::parse(endpoint).map_err(|e| ConfigError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(ConfigError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: format!("unsupported scheme {scheme:?}, expected http or https"),
        }),
    }
}
