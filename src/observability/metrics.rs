//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define faucet metrics (RPC calls, confirmation waits, action outcomes)
//! - Expose a Prometheus-compatible metrics endpoint when enabled
//!
//! # Metrics
//! - `faucet_rpc_requests_total` (counter): RPC requests by method, outcome
//! - `faucet_rpc_request_duration_seconds` (histogram): RPC latency by method
//! - `faucet_confirmation_wait_seconds` (histogram): submit-to-mined wait
//! - `faucet_actions_total` (counter): user actions by action, outcome
//! - `faucet_bridge_requests_total` (counter): wallet bridge round trips
//!
//! # Design Decisions
//! - Free functions at call sites; recording without an installed exporter
//!   is a no-op, so tests and dev runs pay nothing
//! - Outcome label is "success"/"error", never the error text (unbounded
//!   label values blow up Prometheus cardinality)

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter and serve scrapes on `addr`.
///
/// Must run inside a tokio runtime; the exporter spawns its HTTP endpoint
/// onto it. Failure to install is logged, not fatal: the faucet works
/// without metrics.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => {
            describe_metrics();
            tracing::info!(address = %addr, "Metrics exporter listening");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to install metrics exporter");
        }
    }
}

fn describe_metrics() {
    describe_counter!(
        "faucet_rpc_requests_total",
        "Chain RPC requests by method and outcome"
    );
    describe_histogram!(
        "faucet_rpc_request_duration_seconds",
        "Chain RPC request latency by method"
    );
    describe_histogram!(
        "faucet_confirmation_wait_seconds",
        "Time from transaction submission to mined receipt"
    );
    describe_counter!(
        "faucet_actions_total",
        "User actions by action and outcome"
    );
    describe_counter!(
        "faucet_bridge_requests_total",
        "Wallet bridge round trips by kind and outcome"
    );
}

/// Record one chain RPC request.
pub fn record_rpc_request(method: &'static str, success: bool, elapsed: Duration) {
    counter!(
        "faucet_rpc_requests_total",
        "method" => method,
        "outcome" => outcome(success)
    )
    .increment(1);
    histogram!("faucet_rpc_request_duration_seconds", "method" => method)
        .record(elapsed.as_secs_f64());
}

/// Record how long a submitted transaction took to land.
pub fn record_confirmation_wait(elapsed: Duration) {
    histogram!("faucet_confirmation_wait_seconds").record(elapsed.as_secs_f64());
}

/// Record the outcome of one user action (mount, login, mint, ...).
pub fn record_action(action: &'static str, success: bool) {
    counter!(
        "faucet_actions_total",
        "action" => action,
        "outcome" => outcome(success)
    )
    .increment(1);
}

/// Record one sign/send round trip through the wallet bridge.
pub fn record_bridge_request(kind: &'static str, success: bool) {
    counter!(
        "faucet_bridge_requests_total",
        "kind" => kind,
        "outcome" => outcome(success)
    )
    .increment(1);
}

fn outcome(success: bool) -> &'static str {
    if success {
        "success"
    } else {
        "error"
    }
}
