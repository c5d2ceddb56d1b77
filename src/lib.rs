//! Rule-based HTTP reverse proxy for local development.

pub mod cli;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod routing;

pub use config::schema::ProxyConfig;
pub use http::{HttpServer, ProxyHandler};
pub use lifecycle::Shutdown;
pub use routing::{Rule, RuleSet};
