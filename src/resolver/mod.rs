//! Dynamic upstream resolution subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → redirect.rs (GET <service><path>[?<query>] against the lookup service)
//!     → target.rs (parse returned URL, derive host/port/path/query)
//!     → RoutingVariables inserted into request extensions
//!     → next handler (forward stage) reads the variables
//! ```
//!
//! # Design Decisions
//! - Resolution is synchronous per request: one lookup call, no retry,
//!   no caching, no cross-request state
//! - The published variables are a typed context struct, not a string map,
//!   so the forward stage compiles against the contract
//! - Either all five variables are published and the chain continues, or
//!   none are and the request terminates with a `ResolveError`

pub mod error;
pub mod redirect;
pub mod target;

pub use error::ResolveError;
pub use redirect::{resolve_redirect, RedirectResolver};
pub use target::{RedirectTarget, RoutingVariables};
