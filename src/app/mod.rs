//! Application orchestration subsystem.
//!
//! # Data Flow
//! ```text
//! User action (front-end)
//!     → orchestrator.rs (guards, sequencing, state transitions)
//!         → auth (initialize/connect/disconnect)
//!         → chain facade (sign, confirm, balances)
//!         → token gateway (reads, pending writes)
//!     → types.rs Snapshot (published through arc-swap, read lock-free)
//!     → notify.rs Notification (broadcast, toast counterpart)
//! ```
//!
//! # Design Decisions
//! - The orchestrator owns every piece of mutable UI state; front-ends only
//!   render snapshots and notifications
//! - One exclusive pending write replaces per-action busy flags, so
//!   overlapping on-chain writes cannot be issued
//! - Token state is only ever assigned from completed contract reads, never
//!   computed locally

pub mod notify;
pub mod orchestrator;
pub mod types;

pub use notify::{Notification, Notifier, Severity};
pub use orchestrator::Orchestrator;
pub use types::{Account, AppError, MountState, SessionView, Snapshot, TokenState, WriteOp};
