//! Signing-provider capability trait.
//!
//! # Design Decisions
//! - The trait covers only the request set the faucet actually issues
//!   (accounts, balance, sign, send, call, receipt), so wallet backends stay
//!   swappable and tests can script one
//! - Receipts surface as [`TxReceipt`], not full RPC envelopes

use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::Signature;
use async_trait::async_trait;

use crate::chain::types::{ChainResult, TxReceipt};

/// Capability surface of a connected wallet session.
///
/// Mirrors the JSON-RPC requests a wallet services for a dApp: account
/// listing, balance reads, personal message signing, transaction submission,
/// read-only calls and receipt lookups.
#[async_trait]
pub trait ChainProvider: Send + Sync {
    /// Accounts controlled by this provider, primary account first.
    async fn list_accounts(&self) -> ChainResult<Vec<Address>>;

    /// Native balance of `address` in wei.
    async fn get_balance(&self, address: Address) -> ChainResult<U256>;

    /// Sign `message` for `address` with EIP-191 personal-sign semantics.
    async fn sign_message(&self, address: Address, message: &[u8]) -> ChainResult<Signature>;

    /// Submit a transaction and return its hash without waiting for inclusion.
    async fn send_transaction(&self, tx: TransactionRequest) -> ChainResult<TxHash>;

    /// Execute a read-only call and return the raw return data.
    async fn call(&self, tx: TransactionRequest) -> ChainResult<Bytes>;

    /// Receipt for `hash`, or `None` while the transaction is pending.
    async fn transaction_receipt(&self, hash: TxHash) -> ChainResult<Option<TxReceipt>>;
}

impl std::fmt::Debug for dyn ChainProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn ChainProvider")
    }
}
