//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → FaucetConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the faucet reads it once at startup
//! - All fields have defaults so a minimal config only names the contract
//! - Validation separates syntactic (serde) from semantic checks
//! - Private keys never appear in config files, only env var names do

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::AuthConfig;
pub use schema::AuthNetwork;
pub use schema::ChainConfig;
pub use schema::ContractConfig;
pub use schema::FaucetConfig;
pub use schema::ObservabilityConfig;
pub use schema::ServiceWalletConfig;
