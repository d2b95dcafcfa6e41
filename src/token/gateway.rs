//! Typed handle to the deployed token contract.
//!
//! # Responsibilities
//! - Encode calldata for the five contract operations
//! - Route reads through the bound reader provider
//! - Submit writes through an explicitly passed provider handle
//!
//! # Design Decisions
//! - Reads are pure queries: no side effects, safe to repeat
//! - Writes return [`PendingTx`] immediately; awaiting the receipt is the
//!   chain facade's job

use std::sync::Arc;

use alloy::primitives::{eip191_hash_message, Address, Bytes, B256, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::network::TransactionBuilder;
use alloy::signers::Signature;
use alloy::sol_types::{SolCall, SolValue};

use crate::chain::{ChainError, ChainProvider, ChainResult, PendingTx};
use crate::config::ContractConfig;
use crate::token::abi::FaucetToken;

/// Proof that the recipient controls their account, produced off-chain.
///
/// The contract verifies `signature` recovers to the recipient over `hash`,
/// the EIP-191 digest of a fixed human-readable message. This lets a service
/// wallet submit (and pay gas for) a mint the user authorized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintAuthorization {
    /// EIP-191 hash of the authorization message.
    pub hash: B256,
    /// Signature over that hash, 65 bytes.
    pub signature: Bytes,
}

impl MintAuthorization {
    /// Couple a message with the session signature over it.
    pub fn new(message: &str, signature: &Signature) -> Self {
        Self {
            hash: eip191_hash_message(message),
            signature: Bytes::from(signature.as_bytes().to_vec()),
        }
    }
}

/// Gateway bound to one contract address and one reader provider.
#[derive(Clone)]
pub struct TokenGateway {
    address: Address,
    reader: Arc<dyn ChainProvider>,
}

impl TokenGateway {
    pub fn new(address: Address, reader: Arc<dyn ChainProvider>) -> Self {
        Self { address, reader }
    }

    /// Bind to the contract named in config.
    pub fn from_config(
        config: &ContractConfig,
        reader: Arc<dyn ChainProvider>,
    ) -> ChainResult<Self> {
        let address = config
            .address
            .parse()
            .map_err(|e| ChainError::InvalidAddress(format!("contract.address: {}", e)))?;
        Ok(Self::new(address, reader))
    }

    /// The bound contract address.
    pub fn contract_address(&self) -> Address {
        self.address
    }

    /// Token balance of `account`, in base units.
    pub async fn balance_of(&self, account: Address) -> ChainResult<U256> {
        let call = FaucetToken::balanceOfCall { account };
        self.read_u256("balanceOf", call.abi_encode()).await
    }

    /// Remaining allowance `owner` granted to `spender`, in base units.
    pub async fn allowance_of(&self, owner: Address, spender: Address) -> ChainResult<U256> {
        let call = FaucetToken::allowanceCall { owner, spender };
        self.read_u256("allowance", call.abi_encode()).await
    }

    /// Submit a sponsored mint of `amount` to `to` through `via`.
    ///
    /// The authorization is signed by the recipient's session; `via` is
    /// normally the service wallet so the recipient pays no gas.
    pub async fn mint(
        &self,
        via: &Arc<dyn ChainProvider>,
        authorization: &MintAuthorization,
        to: Address,
        amount: U256,
    ) -> ChainResult<PendingTx> {
        let call = FaucetToken::mintCall {
            hash: authorization.hash,
            signature: authorization.signature.clone(),
            to,
            amount,
        };
        let hash = via.send_transaction(self.write_request(call.abi_encode())).await?;
        tracing::info!(tx_hash = %hash, to = %to, amount = %amount, "Mint submitted");
        Ok(PendingTx { hash })
    }

    /// Submit an approval of `amount` for `spender` through `via`.
    ///
    /// `via` must be the allowance owner's own session.
    pub async fn approve(
        &self,
        via: &Arc<dyn ChainProvider>,
        spender: Address,
        amount: U256,
    ) -> ChainResult<PendingTx> {
        let call = FaucetToken::approveCall { spender, amount };
        let hash = via.send_transaction(self.write_request(call.abi_encode())).await?;
        tracing::info!(tx_hash = %hash, spender = %spender, amount = %amount, "Approve submitted");
        Ok(PendingTx { hash })
    }

    /// Submit a transferFrom through `via`, the approved spender.
    ///
    /// The deployed contract under-reports gas on estimation, so the fixed
    /// `gas_limit` from config is applied instead of estimating.
    pub async fn transfer_from(
        &self,
        via: &Arc<dyn ChainProvider>,
        from: Address,
        to: Address,
        amount: U256,
        gas_limit: u64,
    ) -> ChainResult<PendingTx> {
        let call = FaucetToken::transferFromCall { from, to, amount };
        let tx = self.write_request(call.abi_encode()).with_gas_limit(gas_limit);
        let hash = via.send_transaction(tx).await?;
        tracing::info!(
            tx_hash = %hash,
            from = %from,
            to = %to,
            amount = %amount,
            "TransferFrom submitted"
        );
        Ok(PendingTx { hash })
    }

    async fn read_u256(&self, method: &'static str, calldata: Vec<u8>) -> ChainResult<U256> {
        let tx = self.write_request(calldata);
        let data = self.reader.call(tx).await?;
        U256::abi_decode(&data).map_err(|e| {
            ChainError::Rpc(format!("{} returned undecodable data: {}", method, e))
        })
    }

    fn write_request(&self, calldata: Vec<u8>) -> TransactionRequest {
        TransactionRequest::default()
            .with_to(self.address)
            .with_input(Bytes::from(calldata))
    }
}

impl std::fmt::Debug for TokenGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenGateway")
            .field("address", &self.address)
            .finish()
    }
}
