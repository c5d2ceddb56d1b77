//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → overridden by command-line flags / environment (cli.rs)
//!     → validation.rs (semantic checks, rule parsing)
//!     → ProxyConfig + RuleSet (validated, immutable)
//!     → shared via Arc with every request handler
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All fields have defaults except the endpoint
//! - Validation separates syntactic (serde/clap) from semantic checks

pub mod duration_format;
pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::ConfigError;
pub use loader::load_config;
pub use schema::{ListenerConfig, LogConfig, ProxyConfig};
pub use validation::validate_config;
