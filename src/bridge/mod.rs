//! Wallet bridge subsystem.
//!
//! The hosted-modal counterpart: a loopback HTTP server serving a minimal
//! page through which a browser wallet connects, signs messages, and submits
//! transactions via the standard `window.ethereum` interface.
//!
//! # Data Flow
//! ```text
//! auth.rs BridgeAuth (initialize → bind + serve, connect → wait for page)
//!     → server.rs (routes: page, pending, connect, respond)
//!     → state.rs (uuid-correlated requests, oneshot waiters)
//!     → provider.rs BridgeProvider (ChainProvider over page round trips)
//!     → assets.rs (the page itself)
//! ```
//!
//! # Design Decisions
//! - The wallet is used minimally: account discovery, message signing and
//!   transaction submission go through the page; balance reads, contract
//!   calls and receipt lookups go through the server-side RPC reader
//! - Requests are correlated by uuid; the page polls for pending work and
//!   posts outcomes back, so no push channel to the browser is needed
//! - The server binds loopback and serves one wallet session at a time

pub mod assets;
pub mod auth;
pub mod provider;
pub mod server;
pub mod state;

pub use auth::BridgeAuth;
pub use provider::BridgeProvider;
pub use server::{BridgeServer, Shutdown};

use alloy::primitives::{Address, TxKind};
use alloy::rpc::types::TransactionRequest;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Connection details the page reports after `eth_requestAccounts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConnection {
    pub address: Address,
    pub chain_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_name: Option<String>,
}

/// Body of `POST /api/connect`: a connection, or the user's refusal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectSubmission {
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub chain_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One unit of work waiting for the page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PendingRequest {
    /// `personal_sign` over a human-readable message.
    Sign {
        id: Uuid,
        address: Address,
        message: String,
    },
    /// `eth_sendTransaction` for a prepared request.
    Transaction { id: Uuid, tx: WireTransaction },
}

impl PendingRequest {
    pub fn id(&self) -> Uuid {
        match self {
            PendingRequest::Sign { id, .. } | PendingRequest::Transaction { id, .. } => *id,
        }
    }

    /// Label used for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            PendingRequest::Sign { .. } => "sign",
            PendingRequest::Transaction { .. } => "transaction",
        }
    }
}

/// Outcome the page posts back for one request: a hex-encoded result on
/// success, the wallet's error text otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeResponse {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Transaction fields in the shape `eth_sendTransaction` expects, numeric
/// values hex-encoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireTransaction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas: Option<String>,
}

impl WireTransaction {
    /// Project an alloy request onto the page's parameter object.
    ///
    /// `session` fills the `from` field when the request leaves it unset,
    /// which it normally does: builders target the contract, not the sender.
    pub fn from_request(session: Address, tx: &TransactionRequest) -> Self {
        Self {
            from: Some(tx.from.unwrap_or(session)),
            to: match tx.to {
                Some(TxKind::Call(address)) => Some(address),
                _ => None,
            },
            value: tx.value.map(|value| format!("0x{value:x}")),
            data: tx.input.input().map(|data| data.to_string()),
            gas: tx.gas.map(|gas| format!("0x{gas:x}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::network::TransactionBuilder;
    use alloy::primitives::{Bytes, U256};

    #[test]
    fn pending_request_serializes_with_kind_tag() {
        let id = Uuid::new_v4();
        let request = PendingRequest::Sign {
            id,
            address: Address::repeat_byte(0xab),
            message: "hello".to_string(),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["kind"], "sign");
        assert_eq!(json["message"], "hello");
        assert_eq!(request.id(), id);
        assert_eq!(request.kind(), "sign");
    }

    #[test]
    fn wire_transaction_hex_encodes_fields() {
        let session = Address::repeat_byte(0x11);
        let contract = Address::repeat_byte(0x22);
        let tx = TransactionRequest::default()
            .with_to(contract)
            .with_value(U256::from(255))
            .with_input(Bytes::from(vec![0xde, 0xad]))
            .with_gas_limit(1_000_000);

        let wire = WireTransaction::from_request(session, &tx);
        assert_eq!(wire.from, Some(session));
        assert_eq!(wire.to, Some(contract));
        assert_eq!(wire.value.as_deref(), Some("0xff"));
        assert_eq!(wire.data.as_deref(), Some("0xdead"));
        assert_eq!(wire.gas.as_deref(), Some("0xf4240"));
    }

    #[test]
    fn wire_transaction_omits_unset_fields() {
        let tx = TransactionRequest::default();
        let wire = WireTransaction::from_request(Address::repeat_byte(0x11), &tx);

        let json = serde_json::to_value(&wire).unwrap();
        let object = json.as_object().unwrap();
        assert!(object.contains_key("from"));
        assert!(!object.contains_key("to"));
        assert!(!object.contains_key("value"));
        assert!(!object.contains_key("gas"));
    }

    #[test]
    fn connect_submission_accepts_refusals() {
        let submission: ConnectSubmission =
            serde_json::from_str(r#"{"error":"user closed the wallet prompt"}"#).unwrap();
        assert!(submission.address.is_none());
        assert_eq!(
            submission.error.as_deref(),
            Some("user closed the wallet prompt")
        );
    }
}
