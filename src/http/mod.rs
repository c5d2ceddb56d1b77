//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → server.rs (Axum catch-all route, tracing layer)
//!     → handler.rs (deadline, rule resolution)
//!     → request.rs (outbound request, headers via headers.rs)
//!     → forwarder.rs (send upstream under the deadline)
//!     → response.rs (status, headers, streamed body)
//!     → Send to client
//! ```

pub mod forwarder;
pub mod handler;
pub mod headers;
pub mod request;
pub mod response;
pub mod server;

pub use forwarder::{ErrorKind, ForwardError, Forwarder, HttpClient};
pub use handler::ProxyHandler;
pub use server::HttpServer;
