//! Redirect resolution middleware.
//!
//! Asks the configured lookup service where the requested resource currently
//! lives, parses the answer, and publishes [`RoutingVariables`] for the
//! forward stage. The middleware never forwards anything itself.

use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::ResolverConfig;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::resolver::error::ResolveError;
use crate::resolver::target::{RedirectTarget, RoutingVariables};

/// Request-time resolver against the backend lookup service.
///
/// Holds only immutable configuration and a shared HTTP client; safe for
/// concurrent use without locking.
pub struct RedirectResolver {
    service: String,
    lookup_timeout: Duration,
    client: reqwest::Client,
}

impl RedirectResolver {
    /// Create a resolver for the given (already validated) configuration.
    pub fn new(config: &ResolverConfig, lookup_timeout: Duration) -> Self {
        Self {
            service: config.service.clone(),
            lookup_timeout,
            client: reqwest::Client::new(),
        }
    }

    /// Resolve a single request to its current destination.
    ///
    /// Issues one GET to `<service><path>[?<query>]` with a bounded timeout
    /// and parses the body as a bare URL string. A timeout is treated
    /// identically to a transport error.
    pub fn resolve(
        &self,
        request: &Request<Body>,
    ) -> impl std::future::Future<Output = Result<RedirectTarget, ResolveError>> + Send + '_ {
        // Extract everything needed from the (non-Sync) request before the
        // async body so the returned future holds only Send data.
        let path = request.uri().path();
        let query = match request.uri().query() {
            Some(q) => format!("?{q}"),
            None => String::new(),
        };
        let lookup_url = format!("{}{}{}", self.service, path, query);
        let headers = lookup_headers(request.headers());

        async move {
            tracing::debug!(lookup_url = %lookup_url, "Resolving upstream");

            let response = self
                .client
                .get(&lookup_url)
                .headers(headers)
                .timeout(self.lookup_timeout)
                .send()
                .await
                .map_err(ResolveError::Unreachable)?;

            let status = response.status();
            if status != StatusCode::OK {
                return Err(ResolveError::Rejected { status });
            }

            let raw = response.text().await.map_err(ResolveError::Unreachable)?;
            RedirectTarget::parse(&raw)
        }
    }
}

/// Headers for the outbound lookup call.
///
/// Blanket pass-through of every inbound header: the lookup service is a
/// trusted internal control-plane peer and needs the caller's cookies and
/// auth to answer. Kept as one explicit step so an allow-list policy can
/// replace it without touching resolution logic. `Content-Type` is
/// overridden to a wildcard; `Host` belongs to the gateway, not the peer.
fn lookup_headers(inbound: &HeaderMap) -> HeaderMap {
    let mut headers = inbound.clone();
    headers.remove(header::HOST);
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("*/*"));
    headers
}

/// Middleware entry point wired into the router.
///
/// On success the five routing variables are inserted into the request
/// extensions and the next handler runs; on any failure the request
/// terminates here and no later stage executes.
pub async fn resolve_redirect(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();

    match state.resolver.resolve(&request).await {
        Ok(target) => {
            let vars = RoutingVariables::from(&target);
            tracing::info!(
                url = %vars.url,
                host = %vars.host,
                host_port = %vars.host_port,
                path = %vars.path,
                query = %vars.query,
                "Published routing variables"
            );
            metrics::record_resolution("success", start);
            request.extensions_mut().insert(vars);
            next.run(request).await
        }
        Err(err) => {
            match &err {
                ResolveError::Malformed { .. } => {
                    tracing::error!(error = %err, path = %request.uri().path(), "Resolution failed");
                }
                _ => {
                    tracing::warn!(error = %err, path = %request.uri().path(), "Resolution failed");
                }
            }
            metrics::record_resolution(err.class(), start);
            err.into_response()
        }
    }
}
