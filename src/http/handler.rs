//! Per-request proxy handling.
//!
//! # Responsibilities
//! - Fix the deadline when the request arrives
//! - Resolve the destination from the rule set
//! - Forward and turn failures into `500` responses

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::Instrument;

use crate::http::forwarder::{ForwardError, Forwarder};
use crate::http::request::request_target;
use crate::resilience::Deadline;
use crate::routing::RuleSet;

/// Shared state behind the catch-all route.
#[derive(Clone)]
pub struct ProxyHandler {
    rules: Arc<RuleSet>,
    forwarder: Forwarder,
    timeout: Duration,
}

impl ProxyHandler {
    pub fn new(rules: RuleSet, forwarder: Forwarder, timeout: Duration) -> Self {
        Self {
            rules: Arc::new(rules),
            forwarder,
            timeout,
        }
    }

    /// Proxy one request. Never fails: errors become a `500` with a text body.
    pub async fn handle(&self, request: Request<Body>) -> Response {
        let deadline = Deadline::after(self.timeout);
        let method = request.method().clone();
        let target = request_target(request.uri()).to_owned();
        let destination = self.rules.resolve(&target);

        let span = tracing::info_span!(
            "proxy",
            method = %method,
            target = %target,
            destination = %destination,
        );

        async move {
            tracing::debug!("Proxying request");
            match self.forwarder.forward(request, &destination, deadline).await {
                Ok(response) => {
                    tracing::debug!(status = %response.status(), "Proxy response received");
                    response
                }
                Err(err) => {
                    tracing::error!(kind = ?err.kind(), error = %err, "Proxy request failed");
                    error_response(&err)
                }
            }
        }
        .instrument(span)
        .await
    }
}

fn error_response(err: &ForwardError) -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
}
