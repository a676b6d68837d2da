//! Request identity handling.
//!
//! # Responsibilities
//! - Assign a unique request ID (UUID v4) as early as possible
//! - Respect an `x-request-id` supplied by the caller
//! - Expose the ID to handlers via a request extension
//!
//! The ID travels on the header, so the lookup call sees it too through the
//! blanket header pass-through.

use std::task::{Context, Poll};

use axum::http::{HeaderValue, Request};
use tower::{Layer, Service};
use uuid::Uuid;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Unique identifier attached to every inbound request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestId(pub String);

/// Accessor for the ID attached by [`RequestIdLayer`].
pub trait RequestIdExt {
    fn request_id(&self) -> Option<&str>;
}

impl<B> RequestIdExt for Request<B> {
    fn request_id(&self) -> Option<&str> {
        self.extensions().get::<RequestId>().map(|id| id.0.as_str())
    }
}

/// Tower layer that assigns request IDs.
#[derive(Clone, Copy, Debug, Default)]
pub struct RequestIdLayer;

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdService { inner }
    }
}

/// Service produced by [`RequestIdLayer`].
#[derive(Clone, Debug)]
pub struct RequestIdService<S> {
    inner: S,
}

impl<S, B> Service<Request<B>> for RequestIdService<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        let id = match req.headers().get(X_REQUEST_ID).and_then(|v| v.to_str().ok()) {
            Some(existing) => existing.to_string(),
            None => {
                let generated = Uuid::new_v4().to_string();
                // UUIDs are always valid header values
                if let Ok(value) = HeaderValue::from_str(&generated) {
                    req.headers_mut().insert(X_REQUEST_ID, value);
                }
                generated
            }
        };
        req.extensions_mut().insert(RequestId(id));
        self.inner.call(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use std::convert::Infallible;
    use tower::{service_fn, ServiceExt};

    async fn echo(req: Request<Body>) -> Result<Request<Body>, Infallible> {
        Ok(req)
    }

    #[tokio::test]
    async fn test_generates_id_when_absent() {
        let svc = RequestIdLayer.layer(service_fn(echo));
        let req = Request::builder().body(Body::empty()).unwrap();
        let out = svc.oneshot(req).await.unwrap();

        let header = out.headers().get(X_REQUEST_ID).unwrap().to_str().unwrap();
        assert_eq!(out.request_id(), Some(header));
        assert!(Uuid::parse_str(header).is_ok());
    }

    #[tokio::test]
    async fn test_preserves_caller_id() {
        let svc = RequestIdLayer.layer(service_fn(echo));
        let req = Request::builder()
            .header(X_REQUEST_ID, "caller-id-1")
            .body(Body::empty())
            .unwrap();
        let out = svc.oneshot(req).await.unwrap();

        assert_eq!(out.request_id(), Some("caller-id-1"));
        assert_eq!(out.headers().get(X_REQUEST_ID).unwrap(), "caller-id-1");
    }
}
