//! Response relay.
//!
//! # Responsibilities
//! - Copy upstream status and headers to the client response
//! - Stream the upstream body frame by frame under the request deadline
//! - Report body failures that happen after the status was committed
//!
//! # Design Decisions
//! - Streaming responses avoid buffering the entire body
//! - A body error cannot change the status already sent; it is logged and
//!   the stream ends with an error, which truncates the client response
//! - The upstream body is dropped as soon as the stream finishes or fails

use std::future::Future;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use axum::body::{Body, Bytes};
use axum::http::Response;
use axum::BoxError;
use hyper::body::{Body as HttpBody, Frame, SizeHint};
use tokio::time::Sleep;
use tracing::Span;

use crate::http::forwarder::ForwardError;
use crate::http::headers::copy_headers;
use crate::resilience::Deadline;

/// Build the client response from the upstream one.
pub fn relay<B>(upstream: Response<B>, deadline: Deadline) -> Response<Body>
where
    B: HttpBody<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    let (parts, body) = upstream.into_parts();

    let mut response = Response::new(Body::new(DeadlineBody::new(body, deadline)));
    *response.status_mut() = parts.status;
    copy_headers(&parts.headers, response.headers_mut(), &[]);
    response
}

/// Body wrapper that ends the stream with an error once the deadline passes.
pub struct DeadlineBody<B> {
    inner: Option<Pin<Box<B>>>,
    sleep: Pin<Box<Sleep>>,
    deadline: Deadline,
    span: Span,
}

impl<B> DeadlineBody<B> {
    /// Wrap `inner`; log events are recorded in the current span.
    pub fn new(inner: B, deadline: Deadline) -> Self {
        Self {
            inner: Some(Box::pin(inner)),
            sleep: Box::pin(deadline.sleep()),
            deadline,
            span: Span::current(),
        }
    }

    fn fail(&mut self, err: ForwardError) -> Poll<Option<Result<Frame<Bytes>, ForwardError>>> {
        self.inner = None;
        tracing::error!(parent: &self.span, kind = ?err.kind(), error = %err, "Error copying response body");
        Poll::Ready(Some(Err(err)))
    }
}

impl<B> HttpBody for DeadlineBody<B>
where
    B: HttpBody<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    type Data = Bytes;
    type Error = ForwardError;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.get_mut();

        // A body that never returns Pending must still stop at the deadline.
        if this.inner.is_some() && this.deadline.is_expired() {
            let timeout = this.deadline.timeout();
            return this.fail(ForwardError::StreamTimeout(timeout));
        }

        let Some(inner) = this.inner.as_mut() else {
            return Poll::Ready(None);
        };

        match inner.as_mut().poll_frame(cx) {
            Poll::Ready(Some(Ok(frame))) => return Poll::Ready(Some(Ok(frame))),
            Poll::Ready(Some(Err(e))) => return this.fail(ForwardError::Stream(e.into())),
            Poll::Ready(None) => {
                this.inner = None;
                return Poll::Ready(None);
            }
            Poll::Pending => {}
        }

        ready!(this.sleep.as_mut().poll(cx));
        let timeout = this.deadline.timeout();
        this.fail(ForwardError::StreamTimeout(timeout))
    }

    fn is_end_stream(&self) -> bool {
        self.inner.as_ref().map_or(true, |inner| inner.is_end_stream())
    }

    fn size_hint(&self) -> SizeHint {
        match &self.inner {
            Some(inner) => inner.size_hint(),
            None => SizeHint::with_exact(0),
        }
    }
}
