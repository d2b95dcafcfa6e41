//! Action sequencing and state transitions.
//!
//! # Responsibilities
//! - Run the mount sequence and publish its outcome
//! - Sequence login/logout against the injected auth provider
//! - Run the three token writes behind an exclusive in-flight slot
//! - Re-read token state from the contract after every confirmed write
//!
//! # Design Decisions
//! - All methods take `&self`: mutable state lives behind a mutex that is
//!   never held across an await; long operations copy out the handles they
//!   need, run unlocked, then re-lock to record results
//! - Snapshots publish through arc-swap, so front-ends read lock-free
//! - Signer roles are fixed per operation: the session signs the mint
//!   authorization and submits approvals; the service wallet submits mints
//!   and transfers and pays gas for both
//! - Guard failures notify and return early; they never tear down a session

use std::sync::{Arc, Mutex};

use alloy::primitives::{Address, U256};
use arc_swap::ArcSwap;
use tokio::sync::broadcast;

use crate::app::notify::{Notification, Notifier};
use crate::app::types::{
    Account, ActiveSession, AppError, MountState, SessionState, Snapshot, TokenState, WriteOp,
};
use crate::auth::AuthProvider;
use crate::chain::{ChainError, ChainFacade, ChainProvider};
use crate::config::ContractConfig;
use crate::observability::metrics;
use crate::token::{MintAuthorization, TokenGateway};

/// Fixed write parameters, resolved from config once at startup.
struct WriteParams {
    spender: Address,
    mint_message: String,
    mint_amount: U256,
    approve_amount: U256,
    transfer_amount: U256,
    transfer_gas_limit: u64,
}

/// Mutable state behind the orchestrator's lock.
struct UiState {
    mount: MountState,
    session: SessionState,
    token: TokenState,
    pending_write: Option<WriteOp>,
}

/// Which token readbacks a completed write invalidates.
#[derive(Clone, Copy)]
enum Refresh {
    Balance,
    Allowance,
    Both,
}

/// Sequences every user action and owns all UI-visible state.
pub struct Orchestrator {
    auth: Arc<dyn AuthProvider>,
    service: ChainFacade,
    gateway: TokenGateway,
    params: WriteParams,
    ui: Mutex<UiState>,
    snapshot: ArcSwap<Snapshot>,
    notifier: Notifier,
}

impl Orchestrator {
    /// Wire the orchestrator to its collaborators.
    ///
    /// `service` wraps the service wallet; it submits sponsored writes and
    /// serves every confirmation poll and balance read.
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        service: ChainFacade,
        gateway: TokenGateway,
        contract: &ContractConfig,
    ) -> Result<Self, AppError> {
        let spender = contract
            .spender
            .parse()
            .map_err(|e| ChainError::InvalidAddress(format!("contract.spender: {}", e)))?;

        Ok(Self {
            auth,
            service,
            gateway,
            params: WriteParams {
                spender,
                mint_message: contract.mint_message.clone(),
                mint_amount: U256::from(contract.mint_amount),
                approve_amount: U256::from(contract.approve_amount),
                transfer_amount: U256::from(contract.transfer_amount),
                transfer_gas_limit: contract.transfer_gas_limit,
            },
            ui: Mutex::new(UiState {
                mount: MountState::Loading,
                session: SessionState::LoggedOut,
                token: TokenState::default(),
                pending_write: None,
            }),
            snapshot: ArcSwap::from_pointee(Snapshot::initial()),
            notifier: Notifier::default(),
        })
    }

    /// Latest published state.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot.load_full()
    }

    /// Subscribe to user-facing notifications.
    pub fn notifications(&self) -> broadcast::Receiver<Notification> {
        self.notifier.subscribe()
    }

    /// Run the startup sequence: initialize auth, restore any surviving
    /// session, and seed reads for it.
    ///
    /// Failure lands in [`MountState::Failed`] with the reason. The
    /// orchestrator stays alive either way; a failed mount renders as an
    /// error, not a dead process.
    pub async fn mount(&self) {
        {
            let mut ui = self.ui.lock().expect("ui state mutex poisoned");
            ui.mount = MountState::Loading;
        }
        self.publish();

        match self.try_mount().await {
            Ok(restored) => {
                {
                    let mut ui = self.ui.lock().expect("ui state mutex poisoned");
                    ui.mount = MountState::Ready;
                }
                self.publish();
                metrics::record_action("mount", true);
                match restored {
                    Some(address) => {
                        tracing::info!(address = %address, "Mounted with restored session")
                    }
                    None => tracing::info!("Mounted"),
                }
            }
            Err(e) => {
                {
                    let mut ui = self.ui.lock().expect("ui state mutex poisoned");
                    ui.mount = MountState::Failed(e.to_string());
                    ui.session = SessionState::LoggedOut;
                    ui.token = TokenState::default();
                }
                self.publish();
                metrics::record_action("mount", false);
                tracing::error!(error = %e, "Mount failed");
                self.notifier.error(format!("Startup failed: {}", e));
            }
        }
    }

    async fn try_mount(&self) -> Result<Option<Address>, AppError> {
        self.auth.initialize().await?;

        match self.auth.chain_provider().await {
            Some(provider) => Ok(Some(self.adopt_session(provider).await?)),
            None => Ok(None),
        }
    }

    /// Interactive login.
    ///
    /// A login requested while one is already running, or while logged in,
    /// is a no-op; only the LoggedOut state starts the flow.
    pub async fn login(&self) -> Result<(), AppError> {
        {
            let mut ui = self.ui.lock().expect("ui state mutex poisoned");
            match ui.session {
                SessionState::LoggedOut => ui.session = SessionState::Authenticating,
                SessionState::Authenticating | SessionState::LoggedIn(_) => {
                    tracing::debug!("Login requested while connecting or connected");
                    return Ok(());
                }
            }
        }
        self.publish();

        match self.try_login().await {
            Ok(address) => {
                metrics::record_action("login", true);
                self.notifier.success(format!("Logged in as {}", address));
                Ok(())
            }
            Err(e) => {
                {
                    let mut ui = self.ui.lock().expect("ui state mutex poisoned");
                    ui.session = SessionState::LoggedOut;
                    ui.token = TokenState::default();
                }
                self.publish();
                metrics::record_action("login", false);
                tracing::warn!(error = %e, "Login failed");
                self.notifier.error(format!("Login failed: {}", e));
                Err(e)
            }
        }
    }

    async fn try_login(&self) -> Result<Address, AppError> {
        let provider = self.auth.connect().await?;
        self.adopt_session(provider).await
    }

    /// End the session and drop all account-derived state.
    ///
    /// Rejected while a write is pending, so an in-flight transaction is
    /// never left without the session that initiated it.
    pub async fn logout(&self) -> Result<(), AppError> {
        {
            let ui = self.ui.lock().expect("ui state mutex poisoned");
            if let Some(op) = ui.pending_write {
                drop(ui);
                self.notifier
                    .error(format!("Cannot log out while {} is in progress", op));
                return Err(AppError::WriteInFlight(op));
            }
            if matches!(ui.session, SessionState::LoggedOut) {
                return Ok(());
            }
        }

        self.auth.disconnect().await?;

        {
            let mut ui = self.ui.lock().expect("ui state mutex poisoned");
            ui.session = SessionState::LoggedOut;
            ui.token = TokenState::default();
        }
        self.publish();
        metrics::record_action("logout", true);
        tracing::info!("Logged out");
        self.notifier.success("Logged out");
        Ok(())
    }

    /// Sponsored mint: the session signs the authorization message, the
    /// service wallet submits and pays gas.
    pub async fn mint(&self) -> Result<(), AppError> {
        let (owner, session) = self.begin_write(WriteOp::Mint)?;
        let result = self.run_mint(owner, &session).await;
        self.finish_write(WriteOp::Mint, "Minted successfully", result)
    }

    async fn run_mint(&self, owner: Address, session: &ChainFacade) -> Result<(), AppError> {
        let signature = session
            .sign_message(owner, &self.params.mint_message)
            .await?;
        let authorization = MintAuthorization::new(&self.params.mint_message, &signature);

        let pending = self
            .gateway
            .mint(
                self.service.provider(),
                &authorization,
                owner,
                self.params.mint_amount,
            )
            .await?;
        self.service.confirm(pending).await?;

        self.refresh_token_state(owner, Refresh::Balance).await
    }

    /// Approve the fixed spender from the session wallet.
    pub async fn approve(&self) -> Result<(), AppError> {
        let (owner, session) = self.begin_write(WriteOp::Approve)?;
        let result = self.run_approve(owner, &session).await;
        self.finish_write(WriteOp::Approve, "Approved successfully", result)
    }

    async fn run_approve(&self, owner: Address, session: &ChainFacade) -> Result<(), AppError> {
        let pending = self
            .gateway
            .approve(
                session.provider(),
                self.params.spender,
                self.params.approve_amount,
            )
            .await?;
        self.service.confirm(pending).await?;

        self.refresh_token_state(owner, Refresh::Allowance).await
    }

    /// Move the fixed amount from the session account to the spender,
    /// submitted by the service wallet against the standing allowance.
    pub async fn transfer(&self) -> Result<(), AppError> {
        let (owner, _session) = self.begin_write(WriteOp::Transfer)?;
        let result = self.run_transfer(owner).await;
        self.finish_write(WriteOp::Transfer, "Transferred successfully", result)
    }

    async fn run_transfer(&self, owner: Address) -> Result<(), AppError> {
        let pending = self
            .gateway
            .transfer_from(
                self.service.provider(),
                owner,
                self.params.spender,
                self.params.transfer_amount,
                self.params.transfer_gas_limit,
            )
            .await?;
        self.service.confirm(pending).await?;

        self.refresh_token_state(owner, Refresh::Both).await
    }

    /// Addresses the connected session exposes.
    pub async fn accounts(&self) -> Result<Vec<Address>, AppError> {
        let (_, session) = self.session_handles()?;
        Ok(session.provider().list_accounts().await?)
    }

    /// Fresh native balance of the connected account, in display units.
    ///
    /// Also updates the published account snapshot.
    pub async fn native_balance(&self) -> Result<String, AppError> {
        let (address, _) = self.session_handles()?;
        let balance = self.service.native_balance(address).await?;

        {
            let mut ui = self.ui.lock().expect("ui state mutex poisoned");
            if let SessionState::LoggedIn(session) = &mut ui.session {
                session.account.native_balance = balance.clone();
            }
        }
        self.publish();
        Ok(balance)
    }

    /// Wrap a connected provider into a live session and seed its reads.
    async fn adopt_session(&self, provider: Arc<dyn ChainProvider>) -> Result<Address, AppError> {
        let facade = ChainFacade::new(provider);
        let address = facade.address().await?;
        let native_balance = self.service.native_balance(address).await?;
        let user = self.auth.current_user().await?;

        {
            let mut ui = self.ui.lock().expect("ui state mutex poisoned");
            ui.session = SessionState::LoggedIn(ActiveSession {
                facade,
                account: Account {
                    address,
                    native_balance,
                },
                user,
            });
        }
        self.publish();

        self.refresh_token_state(address, Refresh::Both).await?;
        Ok(address)
    }

    /// Claim the exclusive write slot, or notify why the write cannot start.
    fn begin_write(&self, op: WriteOp) -> Result<(Address, ChainFacade), AppError> {
        let claimed = {
            let mut ui = self.ui.lock().expect("ui state mutex poisoned");
            if let Some(current) = ui.pending_write {
                Err(AppError::WriteInFlight(current))
            } else if let SessionState::LoggedIn(session) = &ui.session {
                let handles = (session.account.address, session.facade.clone());
                ui.pending_write = Some(op);
                Ok(handles)
            } else {
                Err(AppError::NotConnected)
            }
        };

        match claimed {
            Ok((address, facade)) => {
                self.publish();
                tracing::info!(op = %op, address = %address, "Write started");
                Ok((address, facade))
            }
            Err(e) => {
                self.notifier.error(e.to_string());
                Err(e)
            }
        }
    }

    /// Release the write slot and report the outcome.
    fn finish_write(
        &self,
        op: WriteOp,
        success_message: &str,
        result: Result<(), AppError>,
    ) -> Result<(), AppError> {
        {
            let mut ui = self.ui.lock().expect("ui state mutex poisoned");
            ui.pending_write = None;
        }
        self.publish();
        metrics::record_action(op.as_str(), result.is_ok());

        match &result {
            Ok(()) => {
                tracing::info!(op = %op, "Write confirmed");
                self.notifier.success(success_message);
            }
            Err(e) => {
                tracing::warn!(op = %op, error = %e, "Write failed");
                self.notifier.error(format!("{} failed: {}", op, e));
            }
        }
        result
    }

    /// Re-read token state from the contract and publish it.
    ///
    /// Values are assigned from chain reads only; a confirmed write never
    /// updates them by local arithmetic.
    async fn refresh_token_state(&self, owner: Address, scope: Refresh) -> Result<(), AppError> {
        if matches!(scope, Refresh::Balance | Refresh::Both) {
            let balance = self.gateway.balance_of(owner).await?;
            let mut ui = self.ui.lock().expect("ui state mutex poisoned");
            ui.token.balance = Some(balance.to_string());
        }

        if matches!(scope, Refresh::Allowance | Refresh::Both) {
            let allowance = self
                .gateway
                .allowance_of(owner, self.params.spender)
                .await?;
            let mut ui = self.ui.lock().expect("ui state mutex poisoned");
            ui.token.allowance = Some(allowance.to_string());
        }

        self.publish();
        Ok(())
    }

    /// Address and facade of the live session, or a notified guard error.
    fn session_handles(&self) -> Result<(Address, ChainFacade), AppError> {
        let handles = {
            let ui = self.ui.lock().expect("ui state mutex poisoned");
            match &ui.session {
                SessionState::LoggedIn(session) => {
                    Some((session.account.address, session.facade.clone()))
                }
                _ => None,
            }
        };

        match handles {
            Some(handles) => Ok(handles),
            None => {
                self.notifier.error("provider not initialized");
                Err(AppError::NotConnected)
            }
        }
    }

    /// Rebuild the snapshot from current state and swap it in.
    fn publish(&self) {
        let ui = self.ui.lock().expect("ui state mutex poisoned");
        self.snapshot.store(Arc::new(Snapshot {
            mount: ui.mount.clone(),
            session: ui.session.view(),
            token: ui.token.clone(),
            pending_write: ui.pending_write,
        }));
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("gateway", &self.gateway)
            .field("spender", &self.params.spender)
            .finish()
    }
}
