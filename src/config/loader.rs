//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::error::ConfigError;
use crate::config::schema::ProxyConfig;

/// Load configuration from a TOML file.
///
/// Only syntax is checked here; semantic validation happens when the rule set
/// is built, so that file and command-line values are validated together.
pub fn load_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
