//! Wallet bridge tests driving the HTTP surface the way the page does.

use std::sync::Arc;
use std::time::Duration;

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::rpc::types::TransactionRequest;
use serde_json::{json, Value};
use token_faucet::auth::{AuthError, AuthProvider};
use token_faucet::bridge::BridgeAuth;
use token_faucet::chain::{ChainError, ChainProvider};
use token_faucet::config::FaucetConfig;

mod common;

struct Bridge {
    auth: Arc<BridgeAuth>,
    base: String,
    client: reqwest::Client,
}

impl Bridge {
    /// Connect the way the page does on load and return the session.
    async fn connect_page(&self) -> Arc<dyn ChainProvider> {
        let task = tokio::spawn({
            let auth = self.auth.clone();
            async move { auth.connect().await }
        });

        let status = self
            .client
            .post(format!("{}/api/connect", self.base))
            .json(&json!({
                "address": format!("{}", common::user()),
                "chain_id": 421614,
                "wallet_name": "MetaMask",
            }))
            .send()
            .await
            .unwrap()
            .status();
        assert_eq!(status, 200);

        task.await.unwrap().unwrap()
    }

    /// Poll `/api/pending` until one request shows up.
    async fn wait_for_pending(&self) -> Value {
        for _ in 0..500 {
            let pending: Value = self
                .client
                .get(format!("{}/api/pending", self.base))
                .send()
                .await
                .unwrap()
                .json()
                .await
                .unwrap();
            if let Some(first) = pending.as_array().and_then(|requests| requests.first()) {
                return first.clone();
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        panic!("no pending request reached the page");
    }

    async fn respond(&self, body: Value) -> reqwest::StatusCode {
        self.client
            .post(format!("{}/api/respond", self.base))
            .json(&body)
            .send()
            .await
            .unwrap()
            .status()
    }
}

async fn served() -> Bridge {
    let ledger = common::FaucetLedger::new(common::contract());
    let reads = common::MockWallet::new(common::spender(), common::one_ether(), ledger);

    let mut config = FaucetConfig::default();
    config.auth.bridge_address = "127.0.0.1:0".to_string();
    config.auth.client_id = "test-client".to_string();

    let auth = Arc::new(BridgeAuth::new(&config, reads));
    auth.initialize().await.expect("bridge failed to bind");
    let base = format!("http://{}", auth.local_addr().unwrap());

    Bridge {
        auth,
        base,
        client: reqwest::Client::new(),
    }
}

#[tokio::test]
async fn page_serves_the_rendered_wallet_ui() {
    let bridge = served().await;

    let response = bridge
        .client
        .get(format!("{}/", bridge.base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body = response.text().await.unwrap();
    assert!(body.contains("DAPP Token Faucet"));
    assert!(body.contains("0x66eee"));
    assert!(body.contains("test-client"));
}

#[tokio::test]
async fn page_connection_establishes_the_session() {
    let bridge = served().await;
    let session = bridge.connect_page().await;

    assert_eq!(
        session.list_accounts().await.unwrap(),
        vec![common::user()]
    );
    // Balance reads go through the server-side reader, not the page.
    assert_eq!(
        session.get_balance(common::user()).await.unwrap(),
        common::one_ether()
    );

    let user = bridge.auth.current_user().await.unwrap().unwrap();
    assert_eq!(user.name.as_deref(), Some("MetaMask"));
}

#[tokio::test]
async fn refused_connection_surfaces_and_clears() {
    let bridge = served().await;

    let task = tokio::spawn({
        let auth = bridge.auth.clone();
        async move { auth.connect().await }
    });
    let status = bridge
        .client
        .post(format!("{}/api/connect", bridge.base))
        .json(&json!({ "error": "no wallet installed" }))
        .send()
        .await
        .unwrap()
        .status();
    assert_eq!(status, 200);

    match task.await.unwrap().unwrap_err() {
        AuthError::Rejected(reason) => assert_eq!(reason, "no wallet installed"),
        other => panic!("expected Rejected, got {:?}", other),
    }

    // The refusal is consumed; a reloaded page can still connect.
    bridge.connect_page().await;
}

#[tokio::test]
async fn incomplete_connection_submission_is_rejected() {
    let bridge = served().await;

    let status = bridge
        .client
        .post(format!("{}/api/connect", bridge.base))
        .json(&json!({ "address": format!("{}", common::user()) }))
        .send()
        .await
        .unwrap()
        .status();
    assert_eq!(status, 422);
}

#[tokio::test]
async fn wrong_chain_wallet_is_rejected() {
    let bridge = served().await;

    let task = tokio::spawn({
        let auth = bridge.auth.clone();
        async move { auth.connect().await }
    });
    bridge
        .client
        .post(format!("{}/api/connect", bridge.base))
        .json(&json!({
            "address": format!("{}", common::user()),
            "chain_id": 1,
        }))
        .send()
        .await
        .unwrap();

    match task.await.unwrap().unwrap_err() {
        AuthError::Rejected(reason) => assert!(reason.contains("expected 421614")),
        other => panic!("expected Rejected, got {:?}", other),
    }
}

#[tokio::test]
async fn sign_request_round_trips_through_the_page() {
    let bridge = served().await;
    let session = bridge.connect_page().await;

    let task = tokio::spawn({
        let session = session.clone();
        async move { session.sign_message(common::user(), b"hello faucet").await }
    });

    let pending = bridge.wait_for_pending().await;
    assert_eq!(pending["kind"], "sign");
    assert_eq!(pending["message"], "hello faucet");
    assert_eq!(
        pending["address"]
            .as_str()
            .unwrap()
            .parse::<Address>()
            .unwrap(),
        common::user()
    );

    let status = bridge
        .respond(json!({
            "id": pending["id"],
            "result": format!("0x{}{}1b", "11".repeat(32), "22".repeat(32)),
        }))
        .await;
    assert_eq!(status, 200);

    let signature = task.await.unwrap().unwrap();
    assert_eq!(signature.r(), U256::from_be_bytes([0x11; 32]));
    assert_eq!(signature.s(), U256::from_be_bytes([0x22; 32]));
}

#[tokio::test]
async fn transaction_request_round_trips_through_the_page() {
    let bridge = served().await;
    let session = bridge.connect_page().await;

    let task = tokio::spawn({
        let session = session.clone();
        async move {
            let tx = TransactionRequest::default()
                .with_to(common::contract())
                .with_input(Bytes::from(vec![0xde, 0xad]));
            session.send_transaction(tx).await
        }
    });

    let pending = bridge.wait_for_pending().await;
    assert_eq!(pending["kind"], "transaction");
    let tx = &pending["tx"];
    assert_eq!(
        tx["from"].as_str().unwrap().parse::<Address>().unwrap(),
        common::user()
    );
    assert_eq!(
        tx["to"].as_str().unwrap().parse::<Address>().unwrap(),
        common::contract()
    );
    assert_eq!(tx["data"], "0xdead");

    let status = bridge
        .respond(json!({
            "id": pending["id"],
            "result": format!("0x{}", "22".repeat(32)),
        }))
        .await;
    assert_eq!(status, 200);

    let hash = task.await.unwrap().unwrap();
    assert_eq!(hash, B256::repeat_byte(0x22));
}

#[tokio::test]
async fn wallet_rejection_fails_the_round_trip() {
    let bridge = served().await;
    let session = bridge.connect_page().await;

    let task = tokio::spawn({
        let session = session.clone();
        async move { session.sign_message(common::user(), b"hello faucet").await }
    });

    let pending = bridge.wait_for_pending().await;
    let status = bridge
        .respond(json!({
            "id": pending["id"],
            "error": "User rejected the request",
        }))
        .await;
    assert_eq!(status, 200);

    match task.await.unwrap().unwrap_err() {
        ChainError::Rejected(reason) => assert_eq!(reason, "User rejected the request"),
        other => panic!("expected Rejected, got {:?}", other),
    }
}

#[tokio::test]
async fn responding_to_an_unknown_request_is_not_found() {
    let bridge = served().await;

    let status = bridge
        .respond(json!({
            "id": uuid::Uuid::new_v4(),
            "result": "0x00",
        }))
        .await;
    assert_eq!(status, 404);
}
