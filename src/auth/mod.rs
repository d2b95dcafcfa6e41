//! Wallet authentication subsystem.
//!
//! # Data Flow
//! ```text
//! Orchestrator
//!     → provider.rs (capability trait: initialize/connect/disconnect)
//!         → bridge::BridgeAuth (interactive browser wallet)
//!         → dev.rs (non-interactive, key from environment)
//!     → chain::ChainProvider (session handle returned by connect)
//! ```
//!
//! # Design Decisions
//! - The provider is constructor-injected into the orchestrator, never a
//!   module-scope singleton, so lifecycle and test substitution are explicit
//! - `connect()` hands back a [`crate::chain::ChainProvider`] handle; the
//!   orchestrator never sees vendor-specific session types

pub mod dev;
pub mod provider;

pub use dev::DevAuth;
pub use provider::{AuthError, AuthProvider, AuthResult, UserProfile};
