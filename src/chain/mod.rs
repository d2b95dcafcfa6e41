//! Chain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment Variables (service private key)
//!     → client.rs (key loading, RPC connection with timeouts)
//!     → provider.rs (capability trait every wallet session implements)
//!     → facade.rs (accounts, balances, sign, send-and-confirm)
//! ```
//!
//! # Security Constraints
//! - The service key enters the process only through the env var the
//!   config names; config files and logs never carry key material
//! - Every RPC call runs under the configured per-request deadline

pub mod client;
pub mod facade;
pub mod provider;
pub mod types;

pub use client::HttpSignerProvider;
pub use facade::{to_display_units, ChainFacade};
pub use provider::ChainProvider;
pub use types::{ChainError, ChainId, ChainResult, PendingTx, TxReceipt};
