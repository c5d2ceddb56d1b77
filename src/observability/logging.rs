//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once at startup
//! - Choose the log level from `RUST_LOG`, falling back to the debug flag
//! - Render events as human-readable text or JSON
//!
//! # Design Decisions
//! - Uses the tracing crate; request fields travel as span fields
//! - `RUST_LOG` always wins over the configured level

use serde::Deserialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Filter used when `RUST_LOG` is not set.
pub fn default_filter(debug: bool) -> &'static str {
    if debug {
        "developer_proxy=debug,tower_http=debug"
    } else {
        "developer_proxy=info,tower_http=info"
    }
}

/// Install the global subscriber.
pub fn init(debug: bool, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(debug).into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
    }

    if debug {
        tracing::info!("Debug logging enabled");
    }
}
