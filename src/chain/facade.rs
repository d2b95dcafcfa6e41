//! Session-scoped chain operations.
//!
//! # Responsibilities
//! - Derive the primary account and its display-unit balance
//! - Sign EIP-191 personal messages
//! - Submit transactions and await on-chain inclusion
//!
//! # Design Decisions
//! - Wraps any [`ChainProvider`], so browser-bridge sessions and key-backed
//!   sessions share one code path
//! - Receipt polling has no overall deadline; each underlying RPC request
//!   keeps its own timeout, so a dead endpoint fails the operation instead
//!   of wedging it

use std::sync::Arc;
use std::time::{Duration, Instant};

use alloy::primitives::utils::format_ether;
use alloy::primitives::{Address, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::Signature;
use tokio::time::interval;

use crate::chain::provider::ChainProvider;
use crate::chain::types::{ChainError, ChainResult, PendingTx, TxReceipt};
use crate::observability::metrics;

/// Default receipt poll interval.
const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// High-level operations over a wallet session.
#[derive(Clone)]
pub struct ChainFacade {
    provider: Arc<dyn ChainProvider>,
    poll_interval: Duration,
}

impl ChainFacade {
    pub fn new(provider: Arc<dyn ChainProvider>) -> Self {
        Self {
            provider,
            poll_interval: POLL_INTERVAL,
        }
    }

    /// Override the receipt poll interval (tests use millisecond polling).
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// The wrapped provider handle.
    pub fn provider(&self) -> &Arc<dyn ChainProvider> {
        &self.provider
    }

    /// Primary account of the session.
    pub async fn address(&self) -> ChainResult<Address> {
        let accounts = self.provider.list_accounts().await?;
        accounts.into_iter().next().ok_or(ChainError::NoAccounts)
    }

    /// Native balance of `address` as an exact display-unit decimal string.
    pub async fn native_balance(&self, address: Address) -> ChainResult<String> {
        let wei = self.provider.get_balance(address).await?;
        Ok(to_display_units(wei))
    }

    /// Sign a human-readable message with EIP-191 personal-sign semantics.
    pub async fn sign_message(&self, address: Address, message: &str) -> ChainResult<Signature> {
        self.provider.sign_message(address, message.as_bytes()).await
    }

    /// Submit `tx` and wait until it lands.
    pub async fn send_and_confirm(&self, tx: TransactionRequest) -> ChainResult<TxReceipt> {
        let hash = self.provider.send_transaction(tx).await?;
        self.confirm(PendingTx { hash }).await
    }

    /// Poll until the transaction is mined.
    ///
    /// A mined-but-reverted transaction is an error; a pending transaction is
    /// polled indefinitely.
    pub async fn confirm(&self, pending: PendingTx) -> ChainResult<TxReceipt> {
        let started = Instant::now();
        let mut ticker = interval(self.poll_interval);

        loop {
            ticker.tick().await;

            let receipt = match self.provider.transaction_receipt(pending.hash).await? {
                Some(r) => r,
                None => {
                    tracing::debug!(tx_hash = %pending.hash, "Transaction pending");
                    continue;
                }
            };

            metrics::record_confirmation_wait(started.elapsed());

            if !receipt.succeeded {
                tracing::warn!(tx_hash = %pending.hash, "Transaction reverted");
                return Err(ChainError::Reverted(pending.hash.to_string()));
            }

            tracing::info!(
                tx_hash = %pending.hash,
                block_number = ?receipt.block_number,
                "Transaction confirmed"
            );
            return Ok(receipt);
        }
    }
}

impl std::fmt::Debug for ChainFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainFacade")
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}

/// Convert a wei amount to an exact display-unit decimal string.
///
/// Integer math only; trailing fractional zeros are trimmed so `1.5 ETH`
/// renders as "1.5" and whole amounts render without a fraction.
pub fn to_display_units(value: U256) -> String {
    let formatted = format_ether(value);
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}
