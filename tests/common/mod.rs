//! Shared in-memory chain world for orchestration and bridge tests.
//!
//! [`FaucetLedger`] stands in for the chain and the deployed token contract:
//! it decodes submitted calldata and executes it against real balance and
//! allowance tables, keyed by the submitting wallet. Post-write reads return
//! what the "contract" now holds, so tests can tell readbacks apart from
//! local arithmetic.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::primitives::{Address, Bytes, TxHash, TxKind, B256, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::Signature;
use alloy::sol_types::{SolCall, SolValue};
use async_trait::async_trait;
use tokio::sync::Notify;

use token_faucet::app::Orchestrator;
use token_faucet::auth::{AuthError, AuthProvider, AuthResult, UserProfile};
use token_faucet::chain::{ChainError, ChainFacade, ChainProvider, ChainResult, TxReceipt};
use token_faucet::config::ContractConfig;
use token_faucet::token::abi::FaucetToken;
use token_faucet::token::TokenGateway;

pub fn contract() -> Address {
    "0x5FbDB2315678afecb367f032d93F642f64180aa3"
        .parse()
        .unwrap()
}

/// The fixed spender; also the service wallet's address, since the service
/// wallet is what submits transferFrom against the standing allowance.
pub fn spender() -> Address {
    "0xD96B642Ca70edB30e58248689CEaFc6E36785d68"
        .parse()
        .unwrap()
}

pub fn user() -> Address {
    Address::repeat_byte(0xab)
}

pub fn one_ether() -> U256 {
    U256::from(10).pow(U256::from(18))
}

#[derive(Default)]
struct TokenBook {
    balances: HashMap<Address, U256>,
    allowances: HashMap<(Address, Address), U256>,
}

/// In-memory chain: one token contract plus receipts for submitted writes.
pub struct FaucetLedger {
    contract: Address,
    book: Mutex<TokenBook>,
    receipts: Mutex<HashMap<TxHash, bool>>,
    next_tx: AtomicU64,
    /// When set, session wallets refuse to sign messages.
    pub reject_signing: AtomicBool,
    /// When set, wallets refuse to submit transactions.
    pub reject_sends: AtomicBool,
    /// When set, the next submitted write lands reverted.
    pub revert_next: AtomicBool,
    send_gate: Mutex<Option<Arc<Notify>>>,
}

impl FaucetLedger {
    pub fn new(contract: Address) -> Arc<Self> {
        Arc::new(Self {
            contract,
            book: Mutex::new(TokenBook::default()),
            receipts: Mutex::new(HashMap::new()),
            next_tx: AtomicU64::new(0),
            reject_signing: AtomicBool::new(false),
            reject_sends: AtomicBool::new(false),
            revert_next: AtomicBool::new(false),
            send_gate: Mutex::new(None),
        })
    }

    #[allow(dead_code)]
    pub fn set_balance(&self, account: Address, amount: U256) {
        self.book.lock().unwrap().balances.insert(account, amount);
    }

    #[allow(dead_code)]
    pub fn balance(&self, account: Address) -> U256 {
        self.book
            .lock()
            .unwrap()
            .balances
            .get(&account)
            .copied()
            .unwrap_or_default()
    }

    #[allow(dead_code)]
    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.book
            .lock()
            .unwrap()
            .allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or_default()
    }

    /// Make submitted writes park until [`FaucetLedger::release_sends`].
    #[allow(dead_code)]
    pub fn gate_sends(&self) {
        *self.send_gate.lock().unwrap() = Some(Arc::new(Notify::new()));
    }

    /// Release one gated write and stop gating.
    #[allow(dead_code)]
    pub fn release_sends(&self) {
        if let Some(gate) = self.send_gate.lock().unwrap().take() {
            gate.notify_one();
        }
    }

    fn gate(&self) -> Option<Arc<Notify>> {
        self.send_gate.lock().unwrap().clone()
    }

    fn execute(&self, sender: Address, tx: &TransactionRequest) -> ChainResult<TxHash> {
        let target = match tx.to {
            Some(TxKind::Call(address)) => address,
            _ => return Err(ChainError::Rpc("transaction missing target".to_string())),
        };
        if target != self.contract {
            return Err(ChainError::Rpc(format!("no contract deployed at {target}")));
        }

        let data = tx.input.input().cloned().unwrap_or_default();
        let succeeded =
            !self.revert_next.swap(false, Ordering::SeqCst) && self.apply(sender, &data);

        let n = self.next_tx.fetch_add(1, Ordering::SeqCst) + 1;
        let hash = B256::from(U256::from(n));
        self.receipts.lock().unwrap().insert(hash, succeeded);
        Ok(hash)
    }

    /// Contract semantics: mint credits, approve records the sender's grant,
    /// transferFrom spends the (owner, submitter) allowance.
    fn apply(&self, sender: Address, data: &[u8]) -> bool {
        let mut book = self.book.lock().unwrap();
        if let Ok(call) = FaucetToken::mintCall::abi_decode(data) {
            if call.signature.len() != 65 {
                return false;
            }
            *book.balances.entry(call.to).or_default() += call.amount;
            true
        } else if let Ok(call) = FaucetToken::approveCall::abi_decode(data) {
            book.allowances.insert((sender, call.spender), call.amount);
            true
        } else if let Ok(call) = FaucetToken::transferFromCall::abi_decode(data) {
            let key = (call.from, sender);
            let allowed = book.allowances.get(&key).copied().unwrap_or_default();
            let from_balance = book.balances.get(&call.from).copied().unwrap_or_default();
            if allowed < call.amount || from_balance < call.amount {
                return false;
            }
            book.allowances.insert(key, allowed - call.amount);
            book.balances.insert(call.from, from_balance - call.amount);
            *book.balances.entry(call.to).or_default() += call.amount;
            true
        } else {
            false
        }
    }

    fn query(&self, tx: &TransactionRequest) -> ChainResult<Bytes> {
        let data = tx.input.input().cloned().unwrap_or_default();
        let book = self.book.lock().unwrap();
        if let Ok(call) = FaucetToken::balanceOfCall::abi_decode(&data) {
            let balance = book.balances.get(&call.account).copied().unwrap_or_default();
            Ok(Bytes::from(balance.abi_encode()))
        } else if let Ok(call) = FaucetToken::allowanceCall::abi_decode(&data) {
            let allowance = book
                .allowances
                .get(&(call.owner, call.spender))
                .copied()
                .unwrap_or_default();
            Ok(Bytes::from(allowance.abi_encode()))
        } else {
            Err(ChainError::Rpc("unsupported call".to_string()))
        }
    }

    fn receipt(&self, hash: TxHash) -> Option<TxReceipt> {
        self.receipts
            .lock()
            .unwrap()
            .get(&hash)
            .map(|&succeeded| TxReceipt {
                tx_hash: hash,
                block_number: Some(1),
                succeeded,
            })
    }
}

/// One wallet identity over the shared ledger.
pub struct MockWallet {
    address: Address,
    native_balance: U256,
    ledger: Arc<FaucetLedger>,
}

impl MockWallet {
    pub fn new(address: Address, native_balance: U256, ledger: Arc<FaucetLedger>) -> Arc<Self> {
        Arc::new(Self {
            address,
            native_balance,
            ledger,
        })
    }
}

#[async_trait]
impl ChainProvider for MockWallet {
    async fn list_accounts(&self) -> ChainResult<Vec<Address>> {
        Ok(vec![self.address])
    }

    async fn get_balance(&self, _address: Address) -> ChainResult<U256> {
        Ok(self.native_balance)
    }

    async fn sign_message(&self, address: Address, _message: &[u8]) -> ChainResult<Signature> {
        if self.ledger.reject_signing.load(Ordering::SeqCst) {
            return Err(ChainError::Rejected("user refused to sign".to_string()));
        }
        if address != self.address {
            return Err(ChainError::Wallet(format!("no key for {address}")));
        }
        Ok(Signature::new(U256::from(1), U256::from(2), false))
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> ChainResult<TxHash> {
        if self.ledger.reject_sends.load(Ordering::SeqCst) {
            return Err(ChainError::Rejected(
                "user rejected the transaction".to_string(),
            ));
        }
        if let Some(gate) = self.ledger.gate() {
            gate.notified().await;
        }
        self.ledger.execute(self.address, &tx)
    }

    async fn call(&self, tx: TransactionRequest) -> ChainResult<Bytes> {
        self.ledger.query(&tx)
    }

    async fn transaction_receipt(&self, hash: TxHash) -> ChainResult<Option<TxReceipt>> {
        Ok(self.ledger.receipt(hash))
    }
}

/// Scriptable auth provider handing out one session wallet.
#[allow(dead_code)]
pub struct MockAuth {
    wallet: Arc<MockWallet>,
    session: Mutex<Option<Arc<MockWallet>>>,
    pub fail_init: AtomicBool,
    pub reject_connect: AtomicBool,
    profile: Mutex<Option<UserProfile>>,
}

impl MockAuth {
    #[allow(dead_code)]
    pub fn new(wallet: Arc<MockWallet>) -> Arc<Self> {
        Arc::new(Self {
            wallet,
            session: Mutex::new(None),
            fail_init: AtomicBool::new(false),
            reject_connect: AtomicBool::new(false),
            profile: Mutex::new(None),
        })
    }

    /// Make the session exist before mount, as a vendor session cache would.
    #[allow(dead_code)]
    pub fn preconnect(&self) {
        *self.session.lock().unwrap() = Some(self.wallet.clone());
    }

    #[allow(dead_code)]
    pub fn set_profile(&self, profile: UserProfile) {
        *self.profile.lock().unwrap() = Some(profile);
    }
}

#[async_trait]
impl AuthProvider for MockAuth {
    async fn initialize(&self) -> AuthResult<()> {
        if self.fail_init.load(Ordering::SeqCst) {
            return Err(AuthError::Init("modal unavailable".to_string()));
        }
        Ok(())
    }

    async fn connect(&self) -> AuthResult<Arc<dyn ChainProvider>> {
        if self.reject_connect.load(Ordering::SeqCst) {
            return Err(AuthError::Rejected("user closed the modal".to_string()));
        }
        *self.session.lock().unwrap() = Some(self.wallet.clone());
        Ok(self.wallet.clone())
    }

    async fn disconnect(&self) -> AuthResult<()> {
        self.session.lock().unwrap().take();
        Ok(())
    }

    async fn current_user(&self) -> AuthResult<Option<UserProfile>> {
        if self.session.lock().unwrap().is_none() {
            return Ok(None);
        }
        Ok(self.profile.lock().unwrap().clone())
    }

    async fn chain_provider(&self) -> Option<Arc<dyn ChainProvider>> {
        let session = self.session.lock().unwrap().clone()?;
        Some(session)
    }
}

/// A wired-up faucet over the in-memory chain.
#[allow(dead_code)]
pub struct World {
    pub ledger: Arc<FaucetLedger>,
    pub auth: Arc<MockAuth>,
    pub orchestrator: Arc<Orchestrator>,
}

#[allow(dead_code)]
pub fn world() -> World {
    let ledger = FaucetLedger::new(contract());
    let user_wallet = MockWallet::new(user(), one_ether(), ledger.clone());
    let service_wallet = MockWallet::new(spender(), one_ether(), ledger.clone());
    let auth = MockAuth::new(user_wallet);

    let mut config = ContractConfig::default();
    config.address = contract().to_string();

    let service: Arc<dyn ChainProvider> = service_wallet;
    let gateway = TokenGateway::from_config(&config, service.clone()).unwrap();
    let facade = ChainFacade::new(service).with_poll_interval(Duration::from_millis(1));

    let orchestrator = Orchestrator::new(auth.clone(), facade, gateway, &config).unwrap();

    World {
        ledger,
        auth,
        orchestrator: Arc::new(orchestrator),
    }
}
