//! Upstream forwarding.
//!
//! # Responsibilities
//! - Own the pooled upstream client (plain HTTP and HTTPS)
//! - Send one outbound request per inbound request under a deadline
//! - Classify failures by where in the exchange they happened
//!
//! # Design Decisions
//! - Exactly one attempt; there is no retry path
//! - The client is cloned per request and shares one connection pool
//! - Upstream TLS uses rustls with the bundled web PKI roots

use std::error::Error as StdError;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::BoxError;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;

use crate::config::ConfigError;
use crate::http::request::outbound_request;
use crate::http::response::relay;
use crate::resilience::Deadline;

/// Client used for every upstream exchange.
pub type HttpClient = Client<HttpsConnector<HttpConnector>, Body>;

/// Stage of the exchange at which forwarding failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The outbound request could not be built.
    RequestConstruction,
    /// Sending or waiting for response headers failed or timed out.
    UpstreamSend,
    /// The response body failed after the status was sent.
    ResponseStream,
}

impl ErrorKind {
    /// Fixed message prefix reported to the caller.
    pub fn message(&self) -> &'static str {
        match self {
            ErrorKind::RequestConstruction => "Error creating proxy request",
            ErrorKind::UpstreamSend => "Error sending proxy request",
            ErrorKind::ResponseStream => "Error copying response body",
        }
    }
}

/// Error raised while forwarding one request.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    #[error("{}: {reason}", ErrorKind::RequestConstruction.message())]
    Construct { reason: String },

    #[error("{}: {}", ErrorKind::UpstreamSend.message(), error_chain(.0))]
    Send(#[source] hyper_util::client::legacy::Error),

    #[error("{}: no response within {:?}", ErrorKind::UpstreamSend.message(), .0)]
    SendTimeout(Duration),

    #[error("{}: {}", ErrorKind::ResponseStream.message(), .0)]
    Stream(#[source] BoxError),

    #[error("{}: deadline of {:?} exceeded", ErrorKind::ResponseStream.message(), .0)]
    StreamTimeout(Duration),
}

impl ForwardError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ForwardError::Construct { .. } => ErrorKind::RequestConstruction,
            ForwardError::Send(_) | ForwardError::SendTimeout(_) => ErrorKind::UpstreamSend,
            ForwardError::Stream(_) | ForwardError::StreamTimeout(_) => ErrorKind::ResponseStream,
        }
    }
}

/// Render an error followed by its causes, `outer: inner: root`.
fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Sends requests upstream and relays the responses.
#[derive(Clone)]
pub struct Forwarder {
    client: HttpClient,
}

impl Forwarder {
    /// Create a forwarder with a fresh connection pool.
    pub fn new() -> Result<Self, ConfigError> {
        let mut http = HttpConnector::new();
        http.enforce_http(false);

        let https = HttpsConnectorBuilder::new()
            .with_provider_and_webpki_roots(rustls::crypto::ring::default_provider())?
            .https_or_http()
            .enable_http1()
            .wrap_connector(http);

        let client = Client::builder(TokioExecutor::new()).build(https);
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: HttpClient) -> Self {
        Self { client }
    }

    /// Forward `inbound` to `destination` and return the response to relay.
    ///
    /// Status and headers are available when this returns; the body is
    /// streamed afterwards and still bounded by `deadline`.
    pub async fn forward(
        &self,
        inbound: Request<Body>,
        destination: &str,
        deadline: Deadline,
    ) -> Result<Response<Body>, ForwardError> {
        let outbound = outbound_request(inbound, destination)?;

        let upstream = match deadline.run(self.client.request(outbound)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => return Err(ForwardError::Send(e)),
            Err(_) => return Err(ForwardError::SendTimeout(deadline.timeout())),
        };

        Ok(relay(upstream, deadline))
    }
}
