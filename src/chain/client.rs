//! Key-backed JSON-RPC signing provider.
//!
//! # Responsibilities
//! - Connect to the JSON-RPC endpoint with a local signing key
//! - Serve the full [`ChainProvider`] capability set with per-request timeouts
//! - Verify the endpoint serves the expected chain
//!
//! # Security
//! - Key material comes only from an environment variable or an explicit
//!   hex string handed in by the caller
//! - The key never appears in logs, errors, or serialized output

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::{Duration, Instant};

use alloy::network::EthereumWallet;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::{Signature, Signer};
use async_trait::async_trait;
use tokio::time::timeout;

use crate::chain::provider::ChainProvider;
use crate::chain::types::{ChainError, ChainId, ChainResult, TxReceipt};
use crate::observability::metrics;

/// JSON-RPC provider backed by a local private key.
///
/// Used for the service wallet (sponsored mints, transfers, reads) and for
/// dev-mode sessions where no browser wallet is involved.
#[derive(Clone)]
pub struct HttpSignerProvider {
    signer: PrivateKeySigner,
    /// Wallet-filled provider; signs and fills nonce/gas on submission.
    provider: Arc<dyn Provider + Send + Sync>,
    /// Deadline applied to every RPC request.
    timeout_duration: Duration,
}

impl HttpSignerProvider {
    /// Connect to `rpc_url` with an already-parsed signer.
    pub fn connect(
        rpc_url: &str,
        signer: PrivateKeySigner,
        rpc_timeout_secs: u64,
    ) -> ChainResult<Self> {
        let url: url::Url = rpc_url
            .parse()
            .map_err(|e| ChainError::Rpc(format!("Invalid RPC URL '{}': {}", rpc_url, e)))?;

        let wallet = EthereumWallet::from(signer.clone());
        let provider = ProviderBuilder::new().wallet(wallet).connect_http(url);

        tracing::info!(
            address = %signer.address(),
            rpc_url = %rpc_url,
            "Signing provider connected"
        );

        Ok(Self {
            signer,
            provider: Arc::new(provider),
            timeout_duration: Duration::from_secs(rpc_timeout_secs),
        })
    }

    /// Parse a hex-encoded private key (0x prefix optional) and connect.
    ///
    /// The key string is consumed here and dropped; only the parsed signer
    /// is retained, and it is never logged.
    pub fn from_key_hex(
        rpc_url: &str,
        private_key_hex: &str,
        rpc_timeout_secs: u64,
    ) -> ChainResult<Self> {
        let key_hex = private_key_hex
            .strip_prefix("0x")
            .unwrap_or(private_key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| ChainError::Wallet(format!("Invalid private key format: {}", e)))?;

        Self::connect(rpc_url, signer, rpc_timeout_secs)
    }

    /// Load the signing key from the named environment variable.
    pub fn from_env(rpc_url: &str, env_var: &str, rpc_timeout_secs: u64) -> ChainResult<Self> {
        let private_key = std::env::var(env_var).map_err(|_| {
            ChainError::Wallet(format!("Environment variable {} not set", env_var))
        })?;

        Self::from_key_hex(rpc_url, &private_key, rpc_timeout_secs)
    }

    /// Address of the signing key.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Chain id reported by the connected endpoint.
    pub async fn chain_id(&self) -> ChainResult<ChainId> {
        let id = self
            .with_timeout("eth_chainId", self.provider.get_chain_id())
            .await?;
        Ok(ChainId(id))
    }

    /// Verify the connected endpoint serves the expected chain.
    pub async fn verify_chain_id(&self, expected: u64) -> ChainResult<()> {
        let actual = u64::from(self.chain_id().await?);
        if actual != expected {
            return Err(ChainError::ChainMismatch { expected, actual });
        }
        Ok(())
    }

    async fn with_timeout<T, F>(&self, method: &'static str, fut: F) -> ChainResult<T>
    where
        F: IntoFuture<Output = alloy::transports::TransportResult<T>>,
    {
        let started = Instant::now();
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(value)) => {
                metrics::record_rpc_request(method, true, started.elapsed());
                Ok(value)
            }
            Ok(Err(e)) => {
                metrics::record_rpc_request(method, false, started.elapsed());
                Err(ChainError::Rpc(e.to_string()))
            }
            Err(_) => {
                metrics::record_rpc_request(method, false, started.elapsed());
                tracing::warn!(method = method, "RPC timeout");
                Err(ChainError::Timeout(self.timeout_duration.as_secs()))
            }
        }
    }
}

#[async_trait]
impl ChainProvider for HttpSignerProvider {
    async fn list_accounts(&self) -> ChainResult<Vec<Address>> {
        Ok(vec![self.signer.address()])
    }

    async fn get_balance(&self, address: Address) -> ChainResult<U256> {
        self.with_timeout("eth_getBalance", self.provider.get_balance(address))
            .await
    }

    async fn sign_message(&self, address: Address, message: &[u8]) -> ChainResult<Signature> {
        if address != self.signer.address() {
            return Err(ChainError::Wallet(format!(
                "No key available for address {}",
                address
            )));
        }
        self.signer
            .sign_message(message)
            .await
            .map_err(|e| ChainError::Wallet(format!("Message signing failed: {}", e)))
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> ChainResult<TxHash> {
        let pending = self
            .with_timeout("eth_sendTransaction", self.provider.send_transaction(tx))
            .await?;
        Ok(*pending.tx_hash())
    }

    async fn call(&self, tx: TransactionRequest) -> ChainResult<Bytes> {
        self.with_timeout("eth_call", self.provider.call(tx)).await
    }

    async fn transaction_receipt(&self, hash: TxHash) -> ChainResult<Option<TxReceipt>> {
        let receipt = self
            .with_timeout(
                "eth_getTransactionReceipt",
                self.provider.get_transaction_receipt(hash),
            )
            .await?;
        Ok(receipt.map(|r| TxReceipt {
            tx_hash: r.transaction_hash,
            block_number: r.block_number,
            succeeded: r.status(),
        }))
    }
}

impl std::fmt::Debug for HttpSignerProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSignerProvider")
            .field("address", &self.signer.address())
            .field("timeout_secs", &self.timeout_duration.as_secs())
            .finish()
    }
}
