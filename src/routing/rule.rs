//! Routing rules.
//!
//! A rule is written as `operator:value@destination`, for example
//! `regexp:^/api/v[12]@http://localhost:8080`. The operator is optional and
//! defaults to `prefix`. The destination is an absolute `http(s)` URL or the
//! word `endpoint`, meaning the configured default endpoint.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::ConfigError;
use crate::routing::matcher::{Matcher, Operator};

/// Grammar every textual rule must satisfy.
pub const RULE_FORMAT: &str = r"^(prefix:|equal:|regexp:|)(/.+)@(https?://.+|endpoint)$";

/// Destination value that stands for the default endpoint.
pub const ENDPOINT_SENTINEL: &str = "endpoint";

static RULE_GRAMMAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(RULE_FORMAT).expect("rule grammar is a valid pattern"));

/// Where a matching request is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// The configured default endpoint.
    Endpoint,
    /// An absolute upstream URL.
    Url(String),
}

impl Destination {
    pub fn parse(s: &str) -> Self {
        if s == ENDPOINT_SENTINEL {
            Destination::Endpoint
        } else {
            Destination::Url(s.to_string())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Destination::Endpoint => Ok(()),
            Destination::Url(url) if url.is_empty() => Err(ConfigError::EmptyDestination),
            Destination::Url(url) => url::Url::parse(url).map(|_| ()).map_err(|source| {
                ConfigError::InvalidDestination {
                    destination: url.clone(),
                    source,
                }
            }),
        }
    }

    /// Base URL to prepend to the request target.
    pub fn base<'a>(&'a self, default_endpoint: &'a str) -> &'a str {
        match self {
            Destination::Endpoint => default_endpoint,
            Destination::Url(url) => url,
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Endpoint => f.write_str(ENDPOINT_SENTINEL),
            Destination::Url(url) => f.write_str(url),
        }
    }
}

/// A single routing directive.
#[derive(Debug, Clone)]
pub struct Rule {
    value: String,
    matcher: Matcher,
    destination: Destination,
}

impl Rule {
    /// Build and validate a rule.
    ///
    /// Regexp values are compiled here, so a constructed rule never carries
    /// an invalid pattern.
    pub fn new(
        operator: Operator,
        value: impl Into<String>,
        destination: Destination,
    ) -> Result<Self, ConfigError> {
        let value = value.into();
        let matcher = Matcher::compile(operator, &value)?;
        let rule = Self {
            value,
            matcher,
            destination,
        };
        rule.validate()?;
        Ok(rule)
    }

    /// Parse the textual form `operator:value@destination`.
    ///
    /// Any failure is reported as [`ConfigError::InvalidRule`] carrying the
    /// input and the expected format.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidRule {
            rule: text.to_string(),
            reason,
        };

        let captures = RULE_GRAMMAR
            .captures(text)
            .ok_or_else(|| invalid("invalid format".to_string()))?;

        let operator = match captures[1].trim_end_matches(':') {
            "" => Operator::Prefix,
            name => name.parse().map_err(|e: ConfigError| invalid(e.to_string()))?,
        };

        Rule::new(operator, &captures[2], Destination::parse(&captures[3]))
            .map_err(|e| invalid(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.value.is_empty() {
            return Err(ConfigError::EmptyValue);
        }
        self.destination.validate()
    }

    /// Returns true if the request target matches this rule.
    pub fn matches(&self, target: &str) -> bool {
        self.matcher.matches(target)
    }

    pub fn operator(&self) -> Operator {
        self.matcher.operator()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}@{}", self.operator(), self.value, self.destination)
    }
}
