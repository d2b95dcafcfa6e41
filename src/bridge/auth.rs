//! Interactive authentication through the wallet bridge.
//!
//! Contract in [`crate::auth::AuthProvider`] terms:
//! - `initialize()` binds the loopback listener and spawns the server
//! - `connect()` parks until the page posts a connection or a refusal;
//!   the user paces the flow, so there is no timeout
//! - `disconnect()` drops the session; reconnecting needs the page reloaded,
//!   since the page posts its connection once on load
//!
//! A connection on the wrong chain is rejected here, at login, instead of
//! letting later writes fail with opaque RPC errors.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::net::TcpListener;

use crate::auth::{AuthError, AuthProvider, AuthResult, UserProfile};
use crate::bridge::assets::render_page;
use crate::bridge::provider::BridgeProvider;
use crate::bridge::server::{BridgeServer, Shutdown};
use crate::bridge::state::BridgeState;
use crate::chain::ChainProvider;
use crate::config::FaucetConfig;

/// Hosted-modal counterpart backed by a local page and `window.ethereum`.
pub struct BridgeAuth {
    bind_address: String,
    client_id: String,
    chain_id: u64,
    state: Arc<BridgeState>,
    reads: Arc<dyn ChainProvider>,
    shutdown: Shutdown,
    bound: Mutex<Option<SocketAddr>>,
    session: Mutex<Option<Arc<BridgeProvider>>>,
}

impl BridgeAuth {
    /// Wire the bridge from config. `reads` serves balance, call and receipt
    /// requests, so the wallet is only prompted for signatures and sends.
    pub fn new(config: &FaucetConfig, reads: Arc<dyn ChainProvider>) -> Self {
        Self {
            bind_address: config.auth.bridge_address.clone(),
            client_id: config.auth.client_id.clone(),
            chain_id: config.chain.chain_id,
            state: BridgeState::new(render_page(config)),
            reads,
            shutdown: Shutdown::new(),
            bound: Mutex::new(None),
            session: Mutex::new(None),
        }
    }

    /// Address the bridge actually bound, once initialized.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        *self.bound.lock().expect("bound mutex poisoned")
    }

    /// Stop the bridge server.
    pub fn shutdown(&self) {
        self.shutdown.trigger();
    }
}

#[async_trait]
impl AuthProvider for BridgeAuth {
    async fn initialize(&self) -> AuthResult<()> {
        if self.local_addr().is_some() {
            return Ok(());
        }
        if self.client_id.is_empty() {
            return Err(AuthError::Init(
                "auth.client_id is required for the wallet bridge".to_string(),
            ));
        }

        let listener = TcpListener::bind(&self.bind_address).await.map_err(|e| {
            AuthError::Init(format!(
                "cannot bind wallet bridge to {}: {e}",
                self.bind_address
            ))
        })?;
        let address = listener
            .local_addr()
            .map_err(|e| AuthError::Init(e.to_string()))?;

        let server = BridgeServer::new(self.state.clone());
        let shutdown = self.shutdown.subscribe();
        tokio::spawn(async move {
            if let Err(e) = server.run(listener, shutdown).await {
                tracing::error!(error = %e, "Wallet bridge server failed");
            }
        });

        *self.bound.lock().expect("bound mutex poisoned") = Some(address);
        tracing::info!(
            url = %format!("http://{address}/"),
            "Wallet bridge ready; open it in the browser that holds your wallet"
        );
        Ok(())
    }

    async fn connect(&self) -> AuthResult<Arc<dyn ChainProvider>> {
        let existing = self.session.lock().expect("session mutex poisoned").clone();
        if let Some(session) = existing {
            return Ok(session);
        }

        tracing::info!("Waiting for the browser wallet to connect");
        let connection = self
            .state
            .wait_for_connection()
            .await
            .map_err(AuthError::Rejected)?;

        if connection.chain_id != self.chain_id {
            self.state.clear_connection();
            return Err(AuthError::Rejected(format!(
                "wallet is on chain {}, expected {}",
                connection.chain_id, self.chain_id
            )));
        }

        let provider = Arc::new(BridgeProvider::new(
            connection.address,
            self.state.clone(),
            self.reads.clone(),
        ));
        tracing::info!(
            address = %connection.address,
            wallet = connection.wallet_name.as_deref().unwrap_or("unknown"),
            "Browser wallet session established"
        );
        *self.session.lock().expect("session mutex poisoned") = Some(provider.clone());
        Ok(provider)
    }

    async fn disconnect(&self) -> AuthResult<()> {
        let dropped = self
            .session
            .lock()
            .expect("session mutex poisoned")
            .take()
            .is_some();
        if dropped {
            self.state.clear_connection();
            tracing::info!("Browser wallet session dropped");
        }
        Ok(())
    }

    async fn current_user(&self) -> AuthResult<Option<UserProfile>> {
        if self.session.lock().expect("session mutex poisoned").is_none() {
            return Ok(None);
        }
        Ok(self.state.connection().map(|connection| UserProfile {
            name: connection.wallet_name,
            ..UserProfile::default()
        }))
    }

    async fn chain_provider(&self) -> Option<Arc<dyn ChainProvider>> {
        let session = self.session.lock().expect("session mutex poisoned").clone()?;
        Some(session)
    }
}
