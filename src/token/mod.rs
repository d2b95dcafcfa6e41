//! Token contract gateway subsystem.
//!
//! # Data Flow
//! ```text
//! abi.rs (sol!-generated external interface)
//!     → gateway.rs (typed handle bound to one contract address)
//!         reads  → ChainProvider::call (pure queries)
//!         writes → ChainProvider::send_transaction (pending tx handles)
//! ```
//!
//! # Design Decisions
//! - The gateway never waits for confirmation; that belongs to the chain
//!   facade, so the submit/await split stays visible to the orchestrator
//! - Every write takes the submitting provider as an explicit parameter,
//!   making the signer choice per operation part of the call site

pub mod abi;
pub mod gateway;

pub use gateway::{MintAuthorization, TokenGateway};
