//! Chain provider backed by the browser wallet page.
//!
//! # Design Decisions
//! - The wallet is asked to do only what only it can do: expose the account,
//!   sign messages, submit transactions
//! - Balance reads, contract calls and receipt lookups go through the
//!   server-side RPC reader, so confirmation polling never touches the page

use std::sync::Arc;

use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::Signature;
use async_trait::async_trait;
use uuid::Uuid;

use crate::bridge::state::BridgeState;
use crate::bridge::{PendingRequest, WireTransaction};
use crate::chain::{ChainError, ChainProvider, ChainResult, TxReceipt};

/// Session provider whose signing operations round-trip through the page.
pub struct BridgeProvider {
    address: Address,
    state: Arc<BridgeState>,
    reads: Arc<dyn ChainProvider>,
}

impl BridgeProvider {
    pub fn new(address: Address, state: Arc<BridgeState>, reads: Arc<dyn ChainProvider>) -> Self {
        Self {
            address,
            state,
            reads,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }
}

#[async_trait]
impl ChainProvider for BridgeProvider {
    async fn list_accounts(&self) -> ChainResult<Vec<Address>> {
        Ok(vec![self.address])
    }

    async fn get_balance(&self, address: Address) -> ChainResult<U256> {
        self.reads.get_balance(address).await
    }

    async fn sign_message(&self, address: Address, message: &[u8]) -> ChainResult<Signature> {
        // personal_sign takes text; the faucet only ever signs human-readable
        // consent messages.
        let message = String::from_utf8(message.to_vec())
            .map_err(|_| ChainError::Wallet("bridge signing expects UTF-8 messages".to_string()))?;
        let request = PendingRequest::Sign {
            id: Uuid::new_v4(),
            address,
            message,
        };

        let raw = self
            .state
            .round_trip(request)
            .await
            .map_err(ChainError::Rejected)?;
        parse_signature(&raw)
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> ChainResult<TxHash> {
        let request = PendingRequest::Transaction {
            id: Uuid::new_v4(),
            tx: WireTransaction::from_request(self.address, &tx),
        };

        let raw = self
            .state
            .round_trip(request)
            .await
            .map_err(ChainError::Rejected)?;
        raw.parse::<TxHash>().map_err(|e| {
            ChainError::Rpc(format!("page returned a malformed tx hash '{raw}': {e}"))
        })
    }

    async fn call(&self, tx: TransactionRequest) -> ChainResult<Bytes> {
        self.reads.call(tx).await
    }

    async fn transaction_receipt(&self, hash: TxHash) -> ChainResult<Option<TxReceipt>> {
        self.reads.transaction_receipt(hash).await
    }
}

/// Parse the 65-byte r‖s‖v signature `personal_sign` returns.
fn parse_signature(raw: &str) -> ChainResult<Signature> {
    let bytes = alloy::hex::decode(raw)
        .map_err(|e| ChainError::Rpc(format!("page returned a malformed signature: {e}")))?;
    Signature::try_from(bytes.as_slice())
        .map_err(|e| ChainError::Rpc(format!("page returned a malformed signature: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wallet_signatures() {
        // personal_sign result shape: 32 bytes r, 32 bytes s, one byte v.
        let raw = format!("0x{}{}1b", "11".repeat(32), "22".repeat(32));
        let signature = parse_signature(&raw).unwrap();
        assert_eq!(signature.r(), U256::from_be_bytes([0x11; 32]));
        assert_eq!(signature.s(), U256::from_be_bytes([0x22; 32]));
    }

    #[test]
    fn rejects_malformed_signatures() {
        assert!(parse_signature("0x1234").is_err());
        assert!(parse_signature("not hex at all").is_err());
    }
}
