//! Outbound request construction.
//!
//! # Responsibilities
//! - Extract the request target used for routing (path plus query)
//! - Build the upstream request from the inbound one
//!
//! # Design Decisions
//! - Method and body are reused as-is; the body is streamed, never buffered
//! - All headers are copied except `Host`, which the client derives from the
//!   destination authority
//! - Destination problems surface as construction errors, before any I/O

use axum::body::Body;
use axum::http::{header, uri::InvalidUri, Request, Uri};

use crate::http::forwarder::ForwardError;
use crate::http::headers::copy_headers;

/// Request target of `uri` as seen by routing: path and query, verbatim.
pub fn request_target(uri: &Uri) -> &str {
    uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/")
}

/// Turn the inbound request into one addressed to `destination`.
pub fn outbound_request(inbound: Request<Body>, destination: &str) -> Result<Request<Body>, ForwardError> {
    let uri: Uri = destination.parse().map_err(|e: InvalidUri| ForwardError::Construct {
        reason: format!("invalid destination {destination:?}: {e}"),
    })?;
    if uri.scheme().is_none() || uri.authority().is_none() {
        return Err(ForwardError::Construct {
            reason: format!("destination {destination:?} is not an absolute URL"),
        });
    }

    let (parts, body) = inbound.into_parts();
    let mut outbound = Request::new(body);
    *outbound.method_mut() = parts.method;
    *outbound.uri_mut() = uri;
    copy_headers(&parts.headers, outbound.headers_mut(), &[header::HOST]);

    Ok(outbound)
}
