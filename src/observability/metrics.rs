//! Metrics collection and exposition.
//!
//! # Metrics
//! - `adapter_requests_total` (counter): requests by route, status
//! - `adapter_request_duration_seconds` (histogram): latency by route
//! - `adapter_upstream_errors_total` (counter): backend transport failures by route
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

use crate::routing::Route;

/// Serve Prometheus metrics on `addr`. Must run inside the tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one finished inbound request.
pub fn record_request(route: Route, status: u16, start: Instant) {
    counter!(
        "adapter_requests_total",
        "route" => route.as_str(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("adapter_request_duration_seconds", "route" => route.as_str())
        .record(start.elapsed().as_secs_f64());
}

/// Record a failure to reach the backend.
pub fn record_upstream_error(route: Route) {
    counter!("adapter_upstream_errors_total", "route" => route.as_str()).increment(1);
}
