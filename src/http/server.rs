//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with a single catch-all proxy route
//! - Wire up request tracing
//! - Serve on a bound listener until shutdown is signalled

use std::future::Future;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::{ConfigError, ProxyConfig};
use crate::http::forwarder::Forwarder;
use crate::http::handler::ProxyHandler;
use crate::routing::RuleSet;

/// HTTP server for the proxy.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(handler: ProxyHandler) -> Self {
        Self {
            router: Self::build_router(handler),
        }
    }

    /// Validate `config`, log the routing table and build a server with a
    /// fresh upstream client.
    pub fn from_config(config: &ProxyConfig) -> Result<Self, ConfigError> {
        let rules = RuleSet::from_config(config)?;

        tracing::info!(endpoint = %rules.default_endpoint(), timeout = ?config.timeout, "Proxying requests to");
        for rule in rules.rules() {
            tracing::info!(
                "Rule: {} {} -> {}",
                rule.operator(),
                rule.value(),
                rule.destination()
            );
        }

        let forwarder = Forwarder::new()?;
        Ok(Self::new(ProxyHandler::new(rules, forwarder, config.timeout)))
    }

    /// Every method and path goes to the proxy handler.
    fn build_router(handler: ProxyHandler) -> Router {
        Router::new()
            .fallback(proxy_handler)
            .with_state(handler)
            .layer(TraceLayer::new_for_http())
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Returns once `shutdown` fires and in-flight requests have finished.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::debug!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn proxy_handler(State(handler): State<ProxyHandler>, request: Request<Body>) -> Response {
    handler.handle(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use std::time::Duration;
    use crate::lifecycle::Shutdown;
    use tower::ServiceExt;

    fn config(endpoint: &str) -> ProxyConfig {
        ProxyConfig {
            endpoint: Some(endpoint.to_string()),
            ..ProxyConfig::default()
        }
    }

    #[test]
    fn test_from_config_rejects_invalid_rules() {
        let mut config = config("http://localhost:8080");
        config.rules = vec!["no-operator-or-destination".to_string()];
        assert!(matches!(
            HttpServer::from_config(&config),
            Err(ConfigError::Validation(errors)) if errors.len() == 1
        ));
    }

    #[test]
    fn test_from_config_accepts_valid_rules() {
        let mut config = config("https://api.example.com");
        config.rules = vec!["/api@http://localhost:8080".into(), "equal:/health@endpoint".into()];
        assert!(HttpServer::from_config(&config).is_ok());
    }

    #[tokio::test]
    async fn test_any_method_and_path_reaches_proxy() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut config = config(&format!("http://{addr}"));
        config.timeout = Duration::from_secs(5);
        let server = HttpServer::from_config(&config).unwrap();

        for (method, uri) in [("GET", "/"), ("DELETE", "/a/b?c=d"), ("OPTIONS", "/x")] {
            let request = Request::builder().method(method).uri(uri).body(Body::empty()).unwrap();
            let response = server.router().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
            let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
            assert!(body.starts_with(b"Error sending proxy request"));
        }
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let server = HttpServer::from_config(&config("http://localhost:8080")).unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let shutdown = Shutdown::new();

        let task = tokio::spawn(server.run(listener, shutdown.wait()));
        shutdown.trigger();

        let result = tokio::time::timeout(Duration::from_secs(5), task).await.unwrap().unwrap();
        assert!(result.is_ok());
    }
}
