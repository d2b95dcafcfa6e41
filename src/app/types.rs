//! UI-visible application state.
//!
//! # Design Decisions
//! - `SessionState::LoggedIn` carries the session facade, so "connected
//!   implies a provider exists" cannot be violated by construction
//! - Token readbacks stay raw base-unit decimal strings, exactly as the
//!   contract returns them; only native balances get display-unit conversion
//! - Nothing here persists: all state is rebuilt from the capability
//!   provider and the chain on each mount

use std::fmt;

use alloy::primitives::Address;
use thiserror::Error;

use crate::auth::{AuthError, UserProfile};
use crate::chain::{ChainError, ChainFacade};

/// Outcome of the mount sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountState {
    /// Mount still running; reads are not seeded yet.
    Loading,
    /// Mount finished; the application is usable.
    Ready,
    /// Mount failed; the reason is shown instead of a silent spinner.
    Failed(String),
}

/// The one write operation allowed in flight at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOp {
    Mint,
    Approve,
    Transfer,
}

impl WriteOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteOp::Mint => "mint",
            WriteOp::Approve => "approve",
            WriteOp::Transfer => "transfer",
        }
    }
}

impl fmt::Display for WriteOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account derived from the connected session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Primary address of the session.
    pub address: Address,
    /// Native balance as a display-unit decimal string.
    pub native_balance: String,
}

/// Most recent token readbacks for (account, fixed spender, fixed contract).
///
/// `None` means never read. Values are only ever assigned from completed
/// gateway reads; a value is potentially stale between a write's submission
/// and its post-confirmation re-read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenState {
    pub balance: Option<String>,
    pub allowance: Option<String>,
}

/// Connection state held by the orchestrator.
pub(crate) enum SessionState {
    LoggedOut,
    Authenticating,
    LoggedIn(ActiveSession),
}

/// Everything a live session carries; dropped wholesale on logout.
pub(crate) struct ActiveSession {
    pub facade: ChainFacade,
    pub account: Account,
    pub user: Option<UserProfile>,
}

impl SessionState {
    /// UI-visible projection, without provider handles.
    pub(crate) fn view(&self) -> SessionView {
        match self {
            SessionState::LoggedOut => SessionView::LoggedOut,
            SessionState::Authenticating => SessionView::Authenticating,
            SessionState::LoggedIn(session) => SessionView::LoggedIn {
                account: session.account.clone(),
                user: session.user.clone(),
            },
        }
    }
}

/// Session state as front-ends see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionView {
    LoggedOut,
    Authenticating,
    LoggedIn {
        account: Account,
        user: Option<UserProfile>,
    },
}

impl SessionView {
    pub fn is_logged_in(&self) -> bool {
        matches!(self, SessionView::LoggedIn { .. })
    }
}

/// Point-in-time view of all UI state, published after every transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub mount: MountState,
    pub session: SessionView,
    pub token: TokenState,
    pub pending_write: Option<WriteOp>,
}

impl Snapshot {
    /// State before the mount sequence runs.
    pub(crate) fn initial() -> Self {
        Self {
            mount: MountState::Loading,
            session: SessionView::LoggedOut,
            token: TokenState::default(),
            pending_write: None,
        }
    }
}

/// Errors surfaced at action and mount boundaries.
#[derive(Debug, Error)]
pub enum AppError {
    /// An action needing a session ran without one.
    #[error("provider not initialized")]
    NotConnected,

    /// A write was requested while another is still pending.
    #[error("{0} already in progress")]
    WriteInFlight(WriteOp),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Chain(#[from] ChainError),
}
