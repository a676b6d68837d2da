//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID, redirect resolution)
//! - Bind server to listener, serve with graceful shutdown
//! - Forward resolved requests to their published destination
//!
//! The resolver middleware runs immediately before the forward handler, so
//! every request that reaches the handler carries routing variables.

use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{
        header,
        uri::Authority,
        Request, StatusCode, Uri,
    },
    middleware,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::GatewayConfig;
use crate::http::request::RequestIdLayer;
use crate::observability::metrics;
use crate::resolver::{resolve_redirect, RedirectResolver, RoutingVariables};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<RedirectResolver>,
    pub client: Client<HttpConnector, Body>,
}

/// HTTP server for the redirect gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given (validated) configuration.
    pub fn new(config: GatewayConfig) -> Self {
        let resolver = Arc::new(RedirectResolver::new(
            &config.resolver,
            Duration::from_secs(config.timeouts.lookup_secs),
        ));

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let state = AppState { resolver, client };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(forward_handler))
            .route("/", any(forward_handler))
            .layer(middleware::from_fn_with_state(
                state.clone(),
                resolve_redirect,
            ))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            service = %self.config.resolver.service,
            "HTTP server starting"
        );

        let app = self.router.into_make_service();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Terminal stage of the chain: forward to the resolved destination.
///
/// Reads the routing variables published by the resolver middleware and
/// proxies the request to the resolved `host:port`. Deliberately thin; the
/// resolution step owns all routing decisions.
async fn forward_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let method_str = method.to_string();

    // Set by the resolver middleware on every request that reaches here.
    let Some(vars) = request.extensions().get::<RoutingVariables>().cloned() else {
        tracing::error!("Routing variables missing, resolver middleware did not run");
        return (StatusCode::INTERNAL_SERVER_ERROR, "routing variables missing").into_response();
    };

    let (parts, body) = request.into_parts();

    let uri = match upstream_uri(&vars) {
        Ok(uri) => uri,
        Err(reason) => {
            tracing::error!(url = %vars.url, reason = %reason, "Cannot build upstream URI");
            metrics::record_request(&method_str, 500, start);
            return (StatusCode::INTERNAL_SERVER_ERROR, "invalid upstream target").into_response();
        }
    };

    let mut req = Request::builder()
        .method(method)
        .uri(uri)
        .version(parts.version);

    if let Some(headers) = req.headers_mut() {
        for (k, v) in parts.headers.iter() {
            headers.insert(k.clone(), v.clone());
        }
        // The client derives Host from the target authority.
        headers.remove(header::HOST);
    }

    let req = match req.body(body) {
        Ok(req) => req,
        Err(e) => {
            tracing::error!(error = %e, "Cannot build upstream request");
            metrics::record_request(&method_str, 500, start);
            return (StatusCode::INTERNAL_SERVER_ERROR, "invalid upstream request")
                .into_response();
        }
    };

    match state.client.request(req).await {
        Ok(response) => {
            let status = response.status();
            metrics::record_request(&method_str, status.as_u16(), start);

            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body)).into_response()
        }
        Err(e) => {
            tracing::error!(host_port = %vars.host_port, error = %e, "Upstream error");
            metrics::record_request(&method_str, 502, start);
            (StatusCode::BAD_GATEWAY, "upstream request failed").into_response()
        }
    }
}

/// Build the outbound URI from the published variables.
///
/// The authority is always the resolved `host:port`, so scheme-default
/// ports stay explicit on the wire.
fn upstream_uri(vars: &RoutingVariables) -> Result<Uri, String> {
    let mut uri_parts = Uri::try_from(vars.url.as_str())
        .map_err(|e| e.to_string())?
        .into_parts();
    uri_parts.authority = Some(Authority::from_str(&vars.host_port).map_err(|e| e.to_string())?);
    Uri::from_parts(uri_parts).map_err(|e| e.to_string())
}
