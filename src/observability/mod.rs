//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Startup, handler and forwarder:
//!     → tracing events with structured fields (method, target, destination)
//!     → logging.rs (subscriber: env filter + text/JSON formatter)
//!     → stdout
//! ```
//!
//! # Design Decisions
//! - Structured logging for machine parsing
//! - Per-request fields live on a span so late body errors carry them too

pub mod logging;

pub use logging::LogFormat;
