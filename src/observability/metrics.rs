//! Metrics collection and exposition.
//!
//! # Metrics
//! - `request_filter_decisions_total` (counter): by `decision` and `target`
//! - `request_filter_inspected_body_bytes` (histogram): buffered body sizes
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::filter::Target;

const DECISIONS: &str = "request_filter_decisions_total";

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to start metrics endpoint"),
    }
}

pub fn record_forward() {
    metrics::counter!(DECISIONS, "decision" => "forward", "target" => "none").increment(1);
}

pub fn record_reject(target: Target) {
    metrics::counter!(DECISIONS, "decision" => "reject", "target" => target.as_str()).increment(1);
}

pub fn record_body_error() {
    metrics::counter!(DECISIONS, "decision" => "error", "target" => "body").increment(1);
}
