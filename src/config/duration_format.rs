//! Duration parsing for configuration files and flags.
//!
//! Durations are written in humantime form: `60s`, `500ms`, `1m 30s`.

use serde::{Deserialize, Deserializer};
use std::time::Duration;

/// Parse a duration string.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    humantime::parse_duration(s.trim())
        .map_err(|e| format!("invalid duration '{}': {} (expected e.g. 60s, 500ms, 1m 30s)", s, e))
}

/// Deserialize a duration from a string.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    parse_duration(&s).map_err(serde::de::Error::custom)
}
