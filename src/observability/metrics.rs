//! Metrics collection and exposition.
//!
//! # Metrics
//! - `edge_requests_total` (counter): requests by method, status
//! - `edge_request_duration_seconds` (histogram): latency distribution
//! - `edge_redirects_total` (counter): trailing-slash redirects issued
//! - `newsletter_signups_total` (counter): signups by provider, outcome
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "edge_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("edge_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_redirect() {
    metrics::counter!("edge_redirects_total").increment(1);
}

pub fn record_signup(provider: &'static str, outcome: &'static str) {
    metrics::counter!(
        "newsletter_signups_total",
        "provider" => provider,
        "outcome" => outcome
    )
    .increment(1);
}

/// Middleware recording count and latency for every response.
pub async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let response = next.run(request).await;
    record_request(method.as_str(), response.status().as_u16(), start);
    response
}
