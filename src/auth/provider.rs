//! Authentication capability trait.
//!
//! # Contract
//! - `initialize()` must complete before any other call; failure is fatal to
//!   the mount sequence and is surfaced, never retried
//! - `connect()` runs the interactive flow and yields a chain provider
//! - `disconnect()` always succeeds; clearing an absent session is a no-op
//! - `current_user()` is idempotent after a successful `connect()`

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::chain::ChainProvider;

/// Errors from the authentication provider.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The provider could not be set up (modal unavailable, bad bind, ...).
    #[error("Auth initialization failed: {0}")]
    Init(String),

    /// The user declined or cancelled the authentication flow.
    #[error("Authentication rejected: {0}")]
    Rejected(String),

    /// An operation that needs a session ran without one.
    #[error("Not connected")]
    NotConnected,
}

/// Result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// Profile data the authentication vendor knows about the user.
///
/// Every field is optional: a raw browser wallet only reports its name, and
/// a key-backed dev session reports nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    pub name: Option<String>,
    pub email: Option<String>,
    pub profile_image: Option<String>,
}

/// A wallet/auth session source.
///
/// Implementations own the session lifecycle; the orchestrator only
/// sequences calls and holds the returned provider handle.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Prepare the provider. Must be called once, before anything else.
    async fn initialize(&self) -> AuthResult<()>;

    /// Run the authentication flow and return the session's chain provider.
    ///
    /// Fails with [`AuthError::Rejected`] when the user declines or closes
    /// the flow. Calling while already connected returns the existing
    /// session handle.
    async fn connect(&self) -> AuthResult<Arc<dyn ChainProvider>>;

    /// End the session. Always succeeds; a no-op when not connected.
    async fn disconnect(&self) -> AuthResult<()>;

    /// Profile of the connected user, `None` when disconnected or unknown.
    async fn current_user(&self) -> AuthResult<Option<UserProfile>>;

    /// Chain provider of the current session, if one exists.
    ///
    /// Used by the mount sequence to restore a session without an
    /// interactive `connect()`.
    async fn chain_provider(&self) -> Option<Arc<dyn ChainProvider>>;
}
