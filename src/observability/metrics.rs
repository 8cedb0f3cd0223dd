//! Metrics collection and exposition.
//!
//! # Metrics
//! - `forwarder_requests_total` (counter): by method, status, body encoding
//! - `forwarder_request_duration_seconds` (histogram): latency by method
//!
//! Methods outside the standard set are labelled `other`.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint on `addr`.
///
/// Must be called from inside the tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Bounded label value for a client-supplied method.
pub fn method_label(method: &str) -> &'static str {
    match method {
        "GET" => "GET",
        "HEAD" => "HEAD",
        "POST" => "POST",
        "PUT" => "PUT",
        "DELETE" => "DELETE",
        "PATCH" => "PATCH",
        "OPTIONS" => "OPTIONS",
        "CONNECT" => "CONNECT",
        "TRACE" => "TRACE",
        _ => "other",
    }
}

/// Record one completed forward.
pub fn record_forward(method: &str, status: u16, encoding: &'static str, start_time: Instant) {
    let method = method_label(method);
    metrics::counter!(
        "forwarder_requests_total",
        "method" => method,
        "status" => status.to_string(),
        "encoding" => encoding
    )
    .increment(1);

    metrics::histogram!(
        "forwarder_request_duration_seconds",
        "method" => method
    )
    .record(start_time.elapsed().as_secs_f64());
}
