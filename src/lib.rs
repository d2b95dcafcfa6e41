//! Token Faucet dApp Orchestration Library

pub mod app;
pub mod auth;
pub mod bridge;
pub mod chain;
pub mod config;
pub mod observability;
pub mod token;

pub use app::Orchestrator;
pub use bridge::Shutdown;
pub use config::schema::FaucetConfig;
