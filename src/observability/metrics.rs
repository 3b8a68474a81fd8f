//! Metrics collection and exposition.
//!
//! # Metrics
//! - `firstlane_requests_total` (counter): responses by method, status
//! - `firstlane_request_duration_seconds` (histogram): latency distribution
//! - `firstlane_rate_limited_total` (counter): admissions rejected with 429
//! - `firstlane_bookings_total` (counter): booking requests accepted
//!
//! # Design Decisions
//! - Labels are low-cardinality (method, status); paths are not labeled
//! - Recording is a no-op until the Prometheus recorder is installed, so
//!   tests and metrics-disabled deployments pay nothing

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics recorder"),
    }
}

/// Record a completed response.
pub fn record_request(method: &str, status: u16, start: Instant) {
    counter!(
        "firstlane_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("firstlane_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record a request rejected by the admission filter.
pub fn record_rate_limited() {
    counter!("firstlane_rate_limited_total").increment(1);
}

/// Record an accepted booking request.
pub fn record_booking_created() {
    counter!("firstlane_bookings_total").increment(1);
}
