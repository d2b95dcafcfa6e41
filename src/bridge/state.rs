//! Shared bridge state and request correlation.
//!
//! # Responsibilities
//! - Hold the rendered page and the wallet connection for the session
//! - Queue work for the page and route its responses back to the waiters

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{oneshot, watch};
use uuid::Uuid;

use crate::bridge::{BridgeResponse, PendingRequest, WalletConnection};
use crate::observability::metrics;

/// Result of the page's connection attempt.
#[derive(Debug, Clone)]
pub enum ConnectionOutcome {
    Connected(WalletConnection),
    Rejected(String),
}

struct PendingEntry {
    request: PendingRequest,
    respond: oneshot::Sender<Result<String, String>>,
}

/// State shared between the HTTP handlers, the auth provider, and the
/// session provider.
pub struct BridgeState {
    /// Rendered page served at `/`.
    page: String,
    /// Latest connection outcome; `None` while waiting for the page.
    connection: watch::Sender<Option<ConnectionOutcome>>,
    /// Work queued for the page, keyed by request id.
    pending: DashMap<Uuid, PendingEntry>,
}

impl BridgeState {
    pub fn new(page: String) -> Arc<Self> {
        let (connection, _) = watch::channel(None);
        Arc::new(Self {
            page,
            connection,
            pending: DashMap::new(),
        })
    }

    pub fn page(&self) -> &str {
        &self.page
    }

    /// Record the page's connection attempt.
    pub fn submit_connection(&self, outcome: ConnectionOutcome) {
        self.connection.send_replace(Some(outcome));
    }

    /// Wait until the page reports a connection or a refusal.
    ///
    /// A refusal is consumed, so the next attempt waits for a fresh outcome
    /// instead of re-reading the stale one.
    pub async fn wait_for_connection(&self) -> Result<WalletConnection, String> {
        let mut rx = self.connection.subscribe();
        loop {
            let outcome = rx.borrow_and_update().clone();
            match outcome {
                Some(ConnectionOutcome::Connected(connection)) => return Ok(connection),
                Some(ConnectionOutcome::Rejected(reason)) => {
                    self.connection.send_replace(None);
                    return Err(reason);
                }
                None => {
                    if rx.changed().await.is_err() {
                        return Err("bridge state dropped".to_string());
                    }
                }
            }
        }
    }

    /// Connection of the current session, if the page reported one.
    pub fn connection(&self) -> Option<WalletConnection> {
        match &*self.connection.borrow() {
            Some(ConnectionOutcome::Connected(connection)) => Some(connection.clone()),
            _ => None,
        }
    }

    /// Forget the session and fail any work still queued for the page.
    pub fn clear_connection(&self) {
        self.connection.send_replace(None);
        self.pending.clear();
    }

    /// Queue work for the page and wait for its outcome.
    ///
    /// Interactive by nature: the user decides when (and whether) to act in
    /// the wallet prompt, so there is no timeout here. `Err` carries the
    /// wallet's refusal or failure text.
    pub async fn round_trip(&self, request: PendingRequest) -> Result<String, String> {
        let id = request.id();
        let kind = request.kind();
        let (tx, rx) = oneshot::channel();
        self.pending.insert(id, PendingEntry {
            request,
            respond: tx,
        });
        tracing::info!(id = %id, kind = kind, "Waiting on the browser wallet");

        match rx.await {
            Ok(outcome) => {
                metrics::record_bridge_request(kind, outcome.is_ok());
                outcome
            }
            Err(_) => {
                // Entry dropped without a response: session cleared or
                // server shut down while we waited.
                metrics::record_bridge_request(kind, false);
                Err("bridge closed before the wallet responded".to_string())
            }
        }
    }

    /// Snapshot of work the page should service, oldest first not
    /// guaranteed; the page handles each request independently.
    pub fn pending_requests(&self) -> Vec<PendingRequest> {
        self.pending
            .iter()
            .map(|entry| entry.value().request.clone())
            .collect()
    }

    /// Route the page's response to its waiter.
    ///
    /// Returns false when the id is unknown: already answered, or never
    /// issued.
    pub fn resolve(&self, response: BridgeResponse) -> bool {
        let Some((_, entry)) = self.pending.remove(&response.id) else {
            return false;
        };
        let outcome = match (response.result, response.error) {
            (Some(result), _) => Ok(result),
            (None, Some(error)) => Err(error),
            (None, None) => Err("empty response from the page".to_string()),
        };
        let _ = entry.respond.send(outcome);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::Address;
    use std::time::Duration;

    fn connection() -> WalletConnection {
        WalletConnection {
            address: Address::repeat_byte(0xab),
            chain_id: 421614,
            wallet_name: Some("MetaMask".to_string()),
        }
    }

    fn sign_request(id: Uuid) -> PendingRequest {
        PendingRequest::Sign {
            id,
            address: Address::repeat_byte(0xab),
            message: "hello".to_string(),
        }
    }

    #[tokio::test]
    async fn connection_resolves_waiters() {
        let state = BridgeState::new(String::new());

        let waiter = tokio::spawn({
            let state = state.clone();
            async move { state.wait_for_connection().await }
        });
        state.submit_connection(ConnectionOutcome::Connected(connection()));

        let connected = waiter.await.unwrap().unwrap();
        assert_eq!(connected.address, Address::repeat_byte(0xab));
        assert!(state.connection().is_some());
    }

    #[tokio::test]
    async fn refusal_is_consumed() {
        let state = BridgeState::new(String::new());
        state.submit_connection(ConnectionOutcome::Rejected("user closed".to_string()));

        let first = state.wait_for_connection().await;
        assert_eq!(first.unwrap_err(), "user closed");

        // The stale refusal is gone; a later connection succeeds.
        let waiter = tokio::spawn({
            let state = state.clone();
            async move { state.wait_for_connection().await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        state.submit_connection(ConnectionOutcome::Connected(connection()));
        assert!(waiter.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn round_trip_returns_the_pages_result() {
        let state = BridgeState::new(String::new());
        let id = Uuid::new_v4();

        let waiter = tokio::spawn({
            let state = state.clone();
            let request = sign_request(id);
            async move { state.round_trip(request).await }
        });

        // Wait until the request is visible the way the page sees it.
        while state.pending_requests().is_empty() {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        assert!(state.resolve(BridgeResponse {
            id,
            result: Some("0xdeadbeef".to_string()),
            error: None,
        }));

        assert_eq!(waiter.await.unwrap().unwrap(), "0xdeadbeef");
        assert!(state.pending_requests().is_empty());
    }

    #[tokio::test]
    async fn round_trip_surfaces_wallet_errors() {
        let state = BridgeState::new(String::new());
        let id = Uuid::new_v4();

        let waiter = tokio::spawn({
            let state = state.clone();
            let request = sign_request(id);
            async move { state.round_trip(request).await }
        });

        while state.pending_requests().is_empty() {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        state.resolve(BridgeResponse {
            id,
            result: None,
            error: Some("User rejected the request".to_string()),
        });

        assert_eq!(
            waiter.await.unwrap().unwrap_err(),
            "User rejected the request"
        );
    }

    #[tokio::test]
    async fn resolve_rejects_unknown_ids() {
        let state = BridgeState::new(String::new());
        assert!(!state.resolve(BridgeResponse {
            id: Uuid::new_v4(),
            result: Some("0x00".to_string()),
            error: None,
        }));
    }

    #[tokio::test]
    async fn clearing_the_connection_fails_queued_work() {
        let state = BridgeState::new(String::new());

        let waiter = tokio::spawn({
            let state = state.clone();
            let request = sign_request(Uuid::new_v4());
            async move { state.round_trip(request).await }
        });

        while state.pending_requests().is_empty() {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        state.clear_connection();

        let outcome = waiter.await.unwrap();
        assert!(outcome.unwrap_err().contains("bridge closed"));
    }
}
