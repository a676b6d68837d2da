//! Redirect Gateway Library
//!
//! A request-time dynamic upstream resolver: for each inbound request the
//! gateway asks a backend lookup service where the requested resource
//! currently lives, publishes the parsed coordinates as typed routing
//! variables, and forwards the request to the resolved destination.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resolver;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use resolver::{RedirectResolver, RedirectTarget, ResolveError, RoutingVariables};
