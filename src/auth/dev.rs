//! Non-interactive authentication for development and tests.
//!
//! # Design Decisions
//! - Backed by a private key named in config and read from the environment;
//!   this is the direct-signer path, no browser involved
//! - `connect()` resolves immediately, so dev runs exercise the exact same
//!   orchestrator sequencing as interactive runs
//!
//! # Security
//! - The key is read from the environment at connect time and never logged

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::auth::provider::{AuthError, AuthProvider, AuthResult, UserProfile};
use crate::chain::{ChainProvider, HttpSignerProvider};

/// Key-backed session source for `--dev` runs.
pub struct DevAuth {
    rpc_url: String,
    key_env: String,
    rpc_timeout_secs: u64,
    session: Mutex<Option<Arc<HttpSignerProvider>>>,
}

impl DevAuth {
    /// Create a dev provider that will read its key from `key_env`.
    pub fn new(rpc_url: impl Into<String>, key_env: impl Into<String>, rpc_timeout_secs: u64) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            key_env: key_env.into(),
            rpc_timeout_secs,
            session: Mutex::new(None),
        }
    }
}

#[async_trait]
impl AuthProvider for DevAuth {
    /// Verifies the key source exists so a missing variable fails the mount
    /// with a clear message instead of failing the first login.
    async fn initialize(&self) -> AuthResult<()> {
        if std::env::var(&self.key_env).is_err() {
            return Err(AuthError::Init(format!(
                "Environment variable {} not set",
                self.key_env
            )));
        }
        tracing::info!(key_env = %self.key_env, "Dev auth ready");
        Ok(())
    }

    async fn connect(&self) -> AuthResult<Arc<dyn ChainProvider>> {
        if let Some(existing) = self.session.lock().expect("session mutex poisoned").clone() {
            return Ok(existing);
        }

        let provider =
            HttpSignerProvider::from_env(&self.rpc_url, &self.key_env, self.rpc_timeout_secs)
                .map_err(|e| AuthError::Rejected(e.to_string()))?;
        let provider = Arc::new(provider);

        tracing::info!(address = %provider.address(), "Dev session connected");
        *self.session.lock().expect("session mutex poisoned") = Some(provider.clone());
        Ok(provider)
    }

    async fn disconnect(&self) -> AuthResult<()> {
        if self.session.lock().expect("session mutex poisoned").take().is_some() {
            tracing::info!("Dev session disconnected");
        }
        Ok(())
    }

    /// A raw key carries no vendor profile.
    async fn current_user(&self) -> AuthResult<Option<UserProfile>> {
        Ok(None)
    }

    async fn chain_provider(&self) -> Option<Arc<dyn ChainProvider>> {
        let session = self.session.lock().expect("session mutex poisoned").clone()?;
        Some(session)
    }
}

impl std::fmt::Debug for DevAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DevAuth")
            .field("rpc_url", &self.rpc_url)
            .field("key_env", &self.key_env)
            .finish()
    }
}
