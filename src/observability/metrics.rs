//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_resolutions_total` (counter): lookups by outcome
//!   (success, unreachable, rejected, malformed)
//! - `gateway_resolution_duration_seconds` (histogram): lookup latency
//! - `gateway_requests_total` (counter): forwarded requests by method, status
//! - `gateway_request_duration_seconds` (histogram): end-to-end latency

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on the given address.
///
/// Failure to install is logged, never fatal: the gateway keeps serving
/// without metrics.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one resolution attempt.
pub fn record_resolution(outcome: &'static str, start: Instant) {
    counter!("gateway_resolutions_total", "outcome" => outcome).increment(1);
    histogram!("gateway_resolution_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

/// Record one forwarded request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("gateway_request_duration_seconds", "method" => method.to_string())
        .record(start.elapsed().as_secs_f64());
}
