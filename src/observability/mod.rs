//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through all subsystems on the `x-request-id` header
//! - Metrics are cheap (atomic increments); recording never fails a request
//! - Published routing variables are logged informationally, they are not
//!   part of the downstream contract

pub mod logging;
pub mod metrics;
