//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): forwarded calls by method, status, node
//! - `gateway_request_duration_seconds` (histogram): end-to-end latency incl. failover
//! - `gateway_probes_total` (counter): liveness probes by node and outcome
//! - `gateway_node_reachable` (gauge): 1=last probe succeeded, 0=failed
//! - `gateway_probe_duration_seconds` (histogram)
//! - `gateway_failovers_total` (counter): by outcome (retried, no_node, exhausted)
//! - `gateway_active_node` (gauge): 1 for the node currently selected
//! - `gateway_registered_nodes` (gauge)
//!
//! All recorders are no-ops until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::{Duration, Instant};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, node: &str, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.to_string()),
        ("node", node.to_string()),
    ];
    counter!("gateway_requests_total", &labels).increment(1);
    histogram!("gateway_request_duration_seconds", &labels).record(start.elapsed().as_secs_f64());
}

pub fn record_probe(node: &str, reachable: bool, latency: Duration) {
    counter!(
        "gateway_probes_total",
        "node" => node.to_string(),
        "reachable" => reachable.to_string()
    )
    .increment(1);
    gauge!("gateway_node_reachable", "node" => node.to_string()).set(if reachable { 1.0 } else { 0.0 });
    histogram!("gateway_probe_duration_seconds", "node" => node.to_string()).record(latency.as_secs_f64());
}

pub fn record_failover(outcome: &'static str) {
    counter!("gateway_failovers_total", "outcome" => outcome).increment(1);
}

/// Move the active-node marker: at most one series (a node or `none`) reads 1.
pub fn record_active_node(previous: Option<&str>, current: Option<&str>) {
    if let Some(previous) = previous.filter(|p| Some(*p) != current) {
        gauge!("gateway_active_node", "node" => previous.to_string()).set(0.0);
    }
    match current {
        Some(node) => {
            gauge!("gateway_active_node", "node" => node.to_string()).set(1.0);
            gauge!("gateway_active_node", "node" => "none").set(0.0);
        }
        None => gauge!("gateway_active_node", "node" => "none").set(1.0),
    }
}

pub fn record_registered_nodes(count: usize) {
    gauge!("gateway_registered_nodes").set(count as f64);
}
