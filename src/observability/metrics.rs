//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): relayed requests by method, status
//! - `relay_request_duration_seconds` (histogram): end-to-end latency by method
//!
//! Recording is a no-op until [`init_metrics`] installs the Prometheus
//! recorder, so handlers record unconditionally.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener on `addr`.
///
/// Must be called from inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one finished relay call.
pub fn record_request(method: &'static str, status: u16, started: Instant) {
    metrics::counter!(
        "relay_requests_total",
        "method" => method,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("relay_request_duration_seconds", "method" => method)
        .record(started.elapsed().as_secs_f64());
}
