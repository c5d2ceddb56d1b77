//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate configuration and build the server
//! - Bind the listener and serve until a termination signal
//!
//! # Design Decisions
//! - Fail fast: every configuration problem is reported before binding
//! - The listener starts last (traffic only when ready)

use tokio::net::TcpListener;

use crate::config::{ConfigError, ProxyConfig};
use crate::http::HttpServer;
use crate::lifecycle::shutdown::Shutdown;

/// Fatal error while starting or running the proxy.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Run the proxy until SIGINT or SIGTERM.
pub async fn run(config: ProxyConfig) -> Result<(), StartupError> {
    let server = HttpServer::from_config(&config)?;

    let address = config.listener.address;
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;
    let local_addr = listener.local_addr().map_err(StartupError::Serve)?;
    tracing::info!(address = %local_addr, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    server.run(listener, shutdown.wait()).await.map_err(StartupError::Serve)?;

    tracing::info!("Shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_config_fails_before_binding() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap().to_string();

        let config = ProxyConfig {
            endpoint: None,
            rules: vec!["bad".into(), "regexp:/[@http://x".into()],
            listener: crate::config::ListenerConfig { address },
            ..ProxyConfig::default()
        };

        // The address is still taken; reaching bind would yield `Bind`.
        match run(config).await {
            Err(StartupError::Config(ConfigError::Validation(errors))) => assert_eq!(errors.len(), 3),
            other => panic!("expected validation failure, got {other:?}"),
        }
        drop(listener);
    }

    #[tokio::test]
    async fn test_bind_failure() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap().to_string();

        let config = ProxyConfig {
            endpoint: Some("http://localhost:8080".into()),
            listener: crate::config::ListenerConfig { address: address.clone() },
            ..ProxyConfig::default()
        };

        match run(config).await {
            Err(StartupError::Bind { address: a, .. }) => assert_eq!(a, address),
            other => panic!("expected bind failure, got {other:?}"),
        }
        drop(listener);
    }
}
