//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use developer_proxy::config::ProxyConfig;
use developer_proxy::http::HttpServer;
use developer_proxy::lifecycle::Shutdown;
use tokio::net::TcpListener;

/// Serve `app` on an ephemeral local port and return its address.
pub async fn start_upstream(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// A running proxy; stops when dropped.
pub struct TestProxy {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestProxy {
    pub fn url(&self, target: &str) -> String {
        format!("http://{}{}", self.addr, target)
    }
}

impl Drop for TestProxy {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a proxy with the given default endpoint, rules and timeout.
pub async fn start_proxy(endpoint: &str, rules: &[String], timeout: Duration) -> TestProxy {
    let config = ProxyConfig {
        endpoint: Some(endpoint.to_string()),
        rules: rules.to_vec(),
        timeout,
        ..ProxyConfig::default()
    };
    let server = HttpServer::from_config(&config).unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let stop = shutdown.wait();
    tokio::spawn(async move {
        let _ = server.run(listener, stop).await;
    });

    TestProxy { addr, shutdown }
}

/// An address nothing is listening on.
pub fn unused_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

/// Client that ignores proxy environment variables.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
