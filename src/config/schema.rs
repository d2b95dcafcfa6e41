//! The faucet configuration tree.
//!
//! Every section carries full defaults describing the Arbitrum Sepolia
//! deployment, so an empty TOML file yields a working config and a partial
//! one only overrides what it names.

use serde::{Deserialize, Serialize};

/// Root configuration for the faucet application.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FaucetConfig {
    /// Target chain parameters (RPC endpoint, chain id, display metadata).
    pub chain: ChainConfig,

    /// Wallet authentication settings (client id, network, bridge bind).
    pub auth: AuthConfig,

    /// Token contract address and fixed operation parameters.
    pub contract: ContractConfig,

    /// Service wallet that sponsors mints and submits transfers.
    pub service_wallet: ServiceWalletConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,
}

/// Chain connection and display metadata.
///
/// Display fields (name, explorer, ticker, logo) are forwarded to the wallet
/// bridge page so the browser wallet can register the network.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Numeric chain id (e.g., 421614 for Arbitrum Sepolia).
    pub chain_id: u64,

    /// Chain namespace identifier.
    pub chain_namespace: String,

    /// JSON-RPC endpoint the service wallet talks to.
    pub rpc_url: String,

    /// Human-readable network name.
    pub display_name: String,

    /// Block explorer base URL.
    pub block_explorer_url: String,

    /// Native currency ticker.
    pub ticker: String,

    /// Native currency display name.
    pub ticker_name: String,

    /// Network logo URL.
    pub logo: String,

    /// Per-request RPC deadline in seconds.
    pub rpc_timeout_secs: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            chain_id: 421_614,
            chain_namespace: "eip155".to_string(),
            rpc_url: "http://localhost:8545".to_string(),
            display_name: "Arbitrum Sepolia".to_string(),
            block_explorer_url: "https://arbiscan.io/".to_string(),
            ticker: "AETH".to_string(),
            ticker_name: "AETH".to_string(),
            logo: "https://images.toruswallet.io/arbitrum.svg".to_string(),
            rpc_timeout_secs: 10,
        }
    }
}

/// Wallet authentication configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Client identifier registered with the authentication vendor.
    /// Required by the bridge provider; the dev provider ignores it.
    pub client_id: String,

    /// Vendor network to authenticate against.
    pub network: AuthNetwork,

    /// Bind address for the local wallet bridge page.
    pub bridge_address: String,

    /// Heading shown on the wallet bridge page.
    pub page_title: String,

    /// Environment variable holding the dev session private key
    /// (used only with `--dev`).
    pub dev_key_env: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            network: AuthNetwork::Testnet,
            bridge_address: "127.0.0.1:9363".to_string(),
            page_title: "DAPP Token Faucet".to_string(),
            dev_key_env: "FAUCET_DEV_PRIVATE_KEY".to_string(),
        }
    }
}

/// Authentication vendor network selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuthNetwork {
    #[default]
    Testnet,
    Mainnet,
}

impl AuthNetwork {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthNetwork::Testnet => "testnet",
            AuthNetwork::Mainnet => "mainnet",
        }
    }
}

/// Token contract parameters.
///
/// Amounts are raw base units, not display units; the deployed contract and
/// its UI treat them as-is.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractConfig {
    /// Token contract address (required).
    pub address: String,

    /// Spender granted allowances and the recipient of transfers.
    pub spender: String,

    /// Human-readable message whose EIP-191 hash authorizes a mint.
    /// The deployed contract binds to this exact string.
    pub mint_message: String,

    /// Base units minted per request.
    pub mint_amount: u64,

    /// Base units approved per request.
    pub approve_amount: u64,

    /// Base units moved per transfer request.
    pub transfer_amount: u64,

    /// Fixed gas limit for transferFrom submissions.
    pub transfer_gas_limit: u64,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            address: String::new(),
            spender: "0xD96B642Ca70edB30e58248689CEaFc6E36785d68".to_string(),
            mint_message: "Hola, EducatETH pagará el gas por ti ;)".to_string(),
            mint_amount: 100,
            approve_amount: 100,
            transfer_amount: 100,
            transfer_gas_limit: 1_000_000,
        }
    }
}

/// Service wallet configuration.
///
/// Only the environment variable name lives in config; the key itself is
/// never written to disk or logs.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceWalletConfig {
    /// Environment variable holding the service wallet private key.
    pub private_key_env: String,
}

impl Default for ServiceWalletConfig {
    fn default() -> Self {
        Self {
            private_key_env: "FAUCET_SERVICE_PRIVATE_KEY".to_string(),
        }
    }
}

/// Logging and metrics settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default log level when `RUST_LOG` is unset (trace through error).
    pub log_level: String,

    /// Serve Prometheus metrics.
    pub metrics_enabled: bool,

    /// Bind address for the metrics endpoint.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
