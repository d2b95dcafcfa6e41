//! Bridge HTTP surface.
//!
//! # Responsibilities
//! - Serve the wallet page and the polling API
//! - Record connection attempts from the page
//! - Route page responses to their waiting callers
//! - Stop cleanly when the application shuts down

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::bridge::state::{BridgeState, ConnectionOutcome};
use crate::bridge::{BridgeResponse, ConnectSubmission, PendingRequest, WalletConnection};

/// Handlers answer from memory; anything slower than this is a bug.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Tells the bridge listener to stop.
///
/// One broadcast sender, any number of receivers; the listener drains
/// in-flight requests and exits on the first signal.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// A receiver that resolves once shutdown is requested.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Ask every subscriber to wind down.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// HTTP server for the wallet bridge.
pub struct BridgeServer {
    router: Router,
}

impl BridgeServer {
    /// Create a new bridge server over the shared state.
    pub fn new(state: Arc<BridgeState>) -> Self {
        Self {
            router: Self::build_router(state),
        }
    }

    fn build_router(state: Arc<BridgeState>) -> Router {
        Router::new()
            .route("/", get(page))
            .route("/api/pending", get(pending))
            .route("/api/connect", post(connect))
            .route("/api/respond", post(respond))
            .with_state(state)
            .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Wallet bridge listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("Wallet bridge stopped");
        Ok(())
    }
}

/// `GET /`: the wallet page.
async fn page(State(state): State<Arc<BridgeState>>) -> Html<String> {
    Html(state.page().to_string())
}

/// `GET /api/pending`: work the page should put in front of the wallet.
async fn pending(State(state): State<Arc<BridgeState>>) -> Json<Vec<PendingRequest>> {
    Json(state.pending_requests())
}

/// `POST /api/connect`: the page reports a wallet connection or a refusal.
async fn connect(
    State(state): State<Arc<BridgeState>>,
    Json(submission): Json<ConnectSubmission>,
) -> StatusCode {
    if let Some(reason) = submission.error {
        tracing::warn!(reason = %reason, "Browser wallet refused to connect");
        state.submit_connection(ConnectionOutcome::Rejected(reason));
        return StatusCode::OK;
    }

    match (submission.address, submission.chain_id) {
        (Some(address), Some(chain_id)) => {
            tracing::info!(address = %address, chain_id = chain_id, "Browser wallet connected");
            state.submit_connection(ConnectionOutcome::Connected(WalletConnection {
                address,
                chain_id,
                wallet_name: submission.wallet_name,
            }));
            StatusCode::OK
        }
        _ => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

/// `POST /api/respond`: the page posts one request's outcome.
async fn respond(
    State(state): State<Arc<BridgeState>>,
    Json(response): Json<BridgeResponse>,
) -> StatusCode {
    if state.resolve(response) {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    }
}
