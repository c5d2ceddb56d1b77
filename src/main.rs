//! developer-proxy
//!
//! Forwards every request to an upstream chosen by an ordered list of rules,
//! falling back to a default endpoint.
//!
//! ```text
//!     Client ──▶ axum server ──▶ RuleSet::resolve ──▶ Forwarder ──▶ Upstream
//!            ◀── status, headers, streamed body ◀─────────────────┘
//! ```

use std::process::ExitCode;

use clap::Parser;

use developer_proxy::cli::Cli;
use developer_proxy::lifecycle;
use developer_proxy::observability::logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let debug_flag = cli.debug;
    let format_flag = cli.log_format;

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => {
            logging::init(debug_flag, format_flag.unwrap_or_default());
            tracing::error!(error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    logging::init(config.log.debug, config.log.format);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "developer-proxy starting");

    match lifecycle::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "developer-proxy failed");
            ExitCode::FAILURE
        }
    }
}
