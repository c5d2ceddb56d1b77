//! Path matching logic.
//!
//! # Responsibilities
//! - Name the match operators a rule may use
//! - Compile a rule value into a matcher once, at startup
//! - Test a request target against a compiled matcher
//!
//! # Design Decisions
//! - Matching is byte-wise and case-sensitive, no normalization
//! - The target includes the query string; it is matched as given
//! - Regexp matching is a search (unanchored), not a full match
//! - Patterns are compiled once; the hot path never compiles

use std::fmt;
use std::str::FromStr;

use regex::Regex;

use crate::config::ConfigError;

/// How a rule value is compared against a request target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Operator {
    /// Target starts with the value.
    #[default]
    Prefix,
    /// Target is exactly the value.
    Equal,
    /// Value is a regular expression found anywhere in the target.
    Regexp,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Prefix => "prefix",
            Operator::Equal => "equal",
            Operator::Regexp => "regexp",
        }
    }
}

impl FromStr for Operator {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prefix" => Ok(Operator::Prefix),
            "equal" => Ok(Operator::Equal),
            "regexp" => Ok(Operator::Regexp),
            other => Err(ConfigError::InvalidOperator(other.to_string())),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A compiled match condition.
#[derive(Debug, Clone)]
pub enum Matcher {
    Prefix(String),
    Equal(String),
    Regexp(Regex),
}

impl Matcher {
    /// Compile `value` for the given operator.
    ///
    /// Only [`Operator::Regexp`] can fail, when the pattern does not compile.
    pub fn compile(operator: Operator, value: &str) -> Result<Self, ConfigError> {
        Ok(match operator {
            Operator::Prefix => Matcher::Prefix(value.to_string()),
            Operator::Equal => Matcher::Equal(value.to_string()),
            Operator::Regexp => {
                let regex = Regex::new(value).map_err(|source| ConfigError::InvalidPattern {
                    pattern: value.to_string(),
                    source,
                })?;
                Matcher::Regexp(regex)
            }
        })
    }

    pub fn operator(&self) -> Operator {
        match self {
            Matcher::Prefix(_) => Operator::Prefix,
            Matcher::Equal(_) => Operator::Equal,
            Matcher::Regexp(_) => Operator::Regexp,
        }
    }

    /// Returns true if `target` satisfies this condition.
    pub fn matches(&self, target: &str) -> bool {
        match self {
            Matcher::Prefix(prefix) => target.starts_with(prefix.as_str()),
            Matcher::Equal(value) => target == value,
            Matcher::Regexp(regex) => regex.is_match(target),
        }
    }
}
