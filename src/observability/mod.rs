//! Logging and metrics for the faucet.
//!
//! # Data Flow
//! ```text
//! orchestrator / chain / bridge
//!     → logging.rs (tracing events, pretty or JSON to stdout)
//!     → metrics.rs (action counters, RPC and confirmation histograms)
//!                      → Prometheus scrape endpoint (config-gated)
//! ```
//!
//! # Design Decisions
//! - Recording helpers are free functions; with no exporter installed they
//!   are no-ops, so callers never gate on config
//! - JSON log output is a CLI flag, pretty is the default for a terminal

pub mod logging;
pub mod metrics;
