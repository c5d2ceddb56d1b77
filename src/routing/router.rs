//! Rule lookup and target resolution.
//!
//! # Responsibilities
//! - Store the ordered rules and the default endpoint
//! - Find the first rule matching a request target
//! - Resolve any target to exactly one upstream URL
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) scan in configuration order; first match wins
//! - No match falls through to the default endpoint, never an error

use crate::config::{ConfigError, ProxyConfig};
use crate::routing::rule::Rule;

/// Ordered routing rules plus the fallback endpoint.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
    default_endpoint: String,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>, default_endpoint: impl Into<String>) -> Self {
        Self {
            rules,
            default_endpoint: default_endpoint.into(),
        }
    }

    /// Validate `config` and build the rule set from it.
    ///
    /// Every configuration problem is reported at once in
    /// [`ConfigError::Validation`].
    pub fn from_config(config: &ProxyConfig) -> Result<Self, ConfigError> {
        let rules = crate::config::validate_config(config).map_err(ConfigError::Validation)?;
        let endpoint = config.endpoint.clone().unwrap_or_default();
        Ok(Self::new(rules, endpoint))
    }

    /// First rule whose condition matches `target`.
    pub fn find(&self, target: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.matches(target))
    }

    /// Resolve a request target (path plus query) to the full upstream URL.
    ///
    /// The target is appended verbatim to the chosen base URL with its
    /// trailing slashes removed.
    pub fn resolve(&self, target: &str) -> String {
        let base = match self.find(target) {
            Some(rule) => rule.destination().base(&self.default_endpoint),
            None => &self.default_endpoint,
        };
        format!("{}{}", base.trim_end_matches('/'), target)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn default_endpoint(&self) -> &str {
        &self.default_endpoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::matcher::Operator;
    use crate::routing::rule::Destination;

    fn rules(texts: &[&str]) -> Vec<Rule> {
        texts.iter().map(|t| Rule::parse(t).unwrap()).collect()
    }

    #[test]
    fn test_first_match_wins() {
        let set = RuleSet::new(
            rules(&["/api@http://first", "/api/v1@http://second"]),
            "http://default.local",
        );
        assert_eq!(set.resolve("/api/v1/users"), "http://first/api/v1/users");
        assert_eq!(set.find("/api/v1/users").unwrap().destination().to_string(), "http://first");
    }

    #[test]
    fn test_fallback_to_default_endpoint() {
        let set = RuleSet::new(rules(&["/api@http://svc-a"]), "http://default.local");
        assert_eq!(set.resolve("/unmatched"), "http://default.local/unmatched");
        assert!(set.find("/unmatched").is_none());
    }

    #[test]
    fn test_empty_rule_set_uses_default() {
        let set = RuleSet::new(Vec::new(), "http://default.local/");
        assert_eq!(set.resolve("/"), "http://default.local/");
        assert_eq!(set.resolve("/x?y=1"), "http://default.local/x?y=1");
    }

    #[test]
    fn test_sentinel_resolves_to_default_endpoint() {
        let set = RuleSet::new(rules(&["prefix:/api@endpoint"]), "http://default.local/");
        assert_eq!(set.resolve("/api/v1"), "http://default.local/api/v1");
    }

    #[test]
    fn test_trailing_slashes_are_trimmed() {
        let set = RuleSet::new(rules(&["/api@http://svc-a:8080//"]), "http://default.local");
        assert_eq!(set.resolve("/api/users"), "http://svc-a:8080/api/users");
    }

    #[test]
    fn test_query_is_kept_verbatim() {
        let set = RuleSet::new(rules(&["/api@http://svc-a:8080"]), "http://svc-b:9090");
        assert_eq!(
            set.resolve("/api/users?id=1&name=a%20b"),
            "http://svc-a:8080/api/users?id=1&name=a%20b"
        );
    }

    #[test]
    fn test_query_takes_part_in_matching() {
        let set = RuleSet::new(
            rules(&["equal:/search?q=rust@http://special", "regexp:/.*[?&]debug=1@http://debug"]),
            "http://default.local",
        );
        assert_eq!(set.resolve("/search?q=rust"), "http://special/search?q=rust");
        assert_eq!(set.resolve("/search?q=go"), "http://default.local/search?q=go");
        assert_eq!(set.resolve("/any?debug=1"), "http://debug/any?debug=1");
    }

    #[test]
    fn test_operators_in_order() {
        let set = RuleSet::new(
            vec![
                Rule::new(Operator::Equal, "/api", Destination::Url("http://exact".into())).unwrap(),
                Rule::new(Operator::Regexp, "^/api/v[0-9]+", Destination::Url("http://versioned".into())).unwrap(),
                Rule::new(Operator::Prefix, "/api", Destination::Endpoint).unwrap(),
            ],
            "http://default.local",
        );
        assert_eq!(set.resolve("/api"), "http://exact/api");
        assert_eq!(set.resolve("/api/v2/items"), "http://versioned/api/v2/items");
        assert_eq!(set.resolve("/api/latest"), "http://default.local/api/latest");
        assert_eq!(set.resolve("/static/app.js"), "http://default.local/static/app.js");
    }

    #[test]
    fn test_from_config() {
        let config = ProxyConfig {
            endpoint: Some("http://default.local".into()),
            rules: vec!["/api@http://svc-a".into()],
            ..ProxyConfig::default()
        };
        let set = RuleSet::from_config(&config).unwrap();
        assert_eq!(set.rules().len(), 1);
        assert_eq!(set.default_endpoint(), "http://default.local");
    }

    #[test]
    fn test_from_config_reports_every_problem() {
        let config = ProxyConfig {
            endpoint: None,
            rules: vec!["/api".into(), "regexp:/(x@http://x".into(), "/ok@endpoint".into()],
            ..ProxyConfig::default()
        };
        match RuleSet::from_config(&config) {
            Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 3),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
