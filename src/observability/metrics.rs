//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define bridge metrics (requests, latency, argument errors)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `bridge_requests_total` (counter): requests by route, outcome, status
//! - `bridge_request_duration_seconds` (histogram): latency by route
//! - `bridge_argument_errors_total` (counter): argument failures by kind

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the global recorder and start the scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one finished request.
pub fn record_request(route: &str, outcome: &str, status: u16, start_time: Instant) {
    metrics::counter!(
        "bridge_requests_total",
        "route" => route.to_string(),
        "outcome" => outcome.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("bridge_request_duration_seconds", "route" => route.to_string())
        .record(start_time.elapsed().as_secs_f64());
}

/// Record a request rejected while building arguments.
pub fn record_argument_error(kind: &'static str) {
    metrics::counter!("bridge_argument_errors_total", "kind" => kind).increment(1);
}
