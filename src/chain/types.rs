//! Shared chain types and the error taxonomy for provider operations.

use alloy::primitives::TxHash;
use thiserror::Error;

/// Network identifier, kept distinct from other u64s so a wallet on the
/// wrong chain cannot slip past the connect check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Errors that can occur during chain operations.
#[derive(Debug, Error)]
pub enum ChainError {
    /// The node rejected or failed a request.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// A single RPC request exceeded the configured deadline.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Transaction landed on-chain but reverted.
    #[error("Transaction reverted: {0}")]
    Reverted(String),

    /// The signer declined to sign or submit.
    #[error("Rejected by signer: {0}")]
    Rejected(String),

    /// Invalid private key format or signing failure.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// The provider exposes no accounts.
    #[error("No accounts available from provider")]
    NoAccounts,

    /// A configured address failed to parse.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// The connected wallet or endpoint sits on a different network.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },
}

/// Result type for chain operations.
pub type ChainResult<T> = Result<T, ChainError>;

/// Minimal receipt view, enough to decide success and report inclusion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    /// Hash of the mined transaction.
    pub tx_hash: TxHash,
    /// Block the transaction landed in, if the node reports it.
    pub block_number: Option<u64>,
    /// Execution status from the receipt.
    pub succeeded: bool,
}

/// Handle to a submitted but not yet confirmed transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTx {
    pub hash: TxHash,
}
