//! Token Faucet dApp Orchestration Core
//!
//! Terminal front-end for a sponsored token faucet: authenticate through a
//! browser wallet, then mint, approve and transfer test tokens while the
//! service wallet pays the gas.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌────────────────────────────────────────────────┐
//!                        │                 TOKEN FAUCET                   │
//!                        │                                                │
//!     User Command       │  ┌─────────┐      ┌──────────────────────┐    │
//!     ───────────────────┼─▶│  main   │─────▶│   app::Orchestrator  │    │
//!                        │  │  REPL   │      │  (guards, sequencing,│    │
//!                        │  └─────────┘      │   snapshots, toasts) │    │
//!                        │                   └──────┬───────┬───────┘    │
//!                        │                          │       │            │
//!                        │                  login   │       │  writes    │
//!                        │                          ▼       ▼            │
//!                        │              ┌────────────┐  ┌────────────┐   │
//!                        │              │    auth    │  │   token    │   │
//!                        │              │ (bridge or │  │  gateway   │   │
//!                        │              │  dev key)  │  │ (reads +   │   │
//!                        │              └─────┬──────┘  │  submits)  │   │
//!                        │                    │         └─────┬──────┘   │
//!                        │                    ▼               ▼          │
//!                        │              ┌────────────────────────────┐   │
//!                        │              │    chain (providers,       │   │
//!     Browser Wallet ◀───┼──────────────│    facade, confirmation)   │───┼──▶ RPC Node
//!      (bridge page)     │              └────────────────────────────┘   │
//!                        │                                               │
//!                        │  ┌──────────────────────────────────────────┐ │
//!                        │  │  config (TOML)  ·  observability (logs,  │ │
//!                        │  │  validation     ·  metrics endpoint)     │ │
//!                        │  └──────────────────────────────────────────┘ │
//!                        └────────────────────────────────────────────────┘
//! ```
//!
//! Action outcomes arrive over the notification stream and print as they
//! land; write commands return the prompt immediately.

use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::io::AsyncBufReadExt;

use token_faucet::app::{MountState, Orchestrator, SessionView, Severity, Snapshot};
use token_faucet::auth::{AuthProvider, DevAuth};
use token_faucet::bridge::BridgeAuth;
use token_faucet::chain::{ChainFacade, ChainProvider, HttpSignerProvider};
use token_faucet::config::loader::load_config;
use token_faucet::observability;
use token_faucet::token::TokenGateway;

#[derive(Parser)]
#[command(name = "token-faucet")]
#[command(about = "Terminal front-end for the token faucet dApp", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "faucet.toml")]
    config: PathBuf,

    /// Use the key-backed dev session instead of the browser wallet bridge.
    #[arg(long)]
    dev: bool,

    /// Emit logs as JSON.
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    observability::logging::init(&config.observability.log_level, cli.json_logs);

    tracing::info!(
        config = %cli.config.display(),
        chain_id = config.chain.chain_id,
        rpc_url = %config.chain.rpc_url,
        contract = %config.contract.address,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    // Service wallet: submits the sponsored writes and serves every read.
    let service = HttpSignerProvider::from_env(
        &config.chain.rpc_url,
        &config.service_wallet.private_key_env,
        config.chain.rpc_timeout_secs,
    )?;
    if let Err(e) = service.verify_chain_id(config.chain.chain_id).await {
        tracing::warn!(error = %e, "Chain verification failed; continuing anyway");
    }
    let reader: Arc<dyn ChainProvider> = Arc::new(service);

    let gateway = TokenGateway::from_config(&config.contract, reader.clone())?;

    let (auth, bridge): (Arc<dyn AuthProvider>, Option<Arc<BridgeAuth>>) = if cli.dev {
        let dev = DevAuth::new(
            &config.chain.rpc_url,
            &config.auth.dev_key_env,
            config.chain.rpc_timeout_secs,
        );
        (Arc::new(dev), None)
    } else {
        let bridge = Arc::new(BridgeAuth::new(&config, reader.clone()));
        (bridge.clone(), Some(bridge))
    };

    let orchestrator = Arc::new(Orchestrator::new(
        auth,
        ChainFacade::new(reader),
        gateway,
        &config.contract,
    )?);

    // Print notifications as they land (the toast counterpart).
    let mut notifications = orchestrator.notifications();
    tokio::spawn(async move {
        while let Ok(note) = notifications.recv().await {
            match note.severity {
                Severity::Success => println!("✔ {}", note.message),
                Severity::Error => println!("✘ {}", note.message),
            }
        }
    });

    orchestrator.mount().await;
    if let MountState::Failed(reason) = &orchestrator.snapshot().mount {
        return Err(reason.clone().into());
    }

    render(&orchestrator.snapshot());
    print_help();
    repl(orchestrator).await;

    if let Some(bridge) = bridge {
        bridge.shutdown();
    }
    tracing::info!("Shutdown complete");
    Ok(())
}

/// Read commands until EOF, `quit`, or Ctrl+C.
async fn repl(orchestrator: Arc<Orchestrator>) {
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    prompt();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) => {
                        if !dispatch(&orchestrator, line.trim()).await {
                            break;
                        }
                        prompt();
                    }
                    Ok(None) => break,
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to read stdin");
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        }
    }
}

/// Run one command. Returns false when the loop should exit.
///
/// Login and the writes run on spawned tasks: they park on wallet prompts
/// and confirmations, and their outcomes arrive over the notification
/// stream either way.
async fn dispatch(orchestrator: &Arc<Orchestrator>, command: &str) -> bool {
    match command {
        "" => {}
        "login" => {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move {
                let _ = orchestrator.login().await;
            });
        }
        "logout" => {
            let _ = orchestrator.logout().await;
        }
        "mint" => {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move {
                let _ = orchestrator.mint().await;
            });
        }
        "approve" => {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move {
                let _ = orchestrator.approve().await;
            });
        }
        "transfer" => {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move {
                let _ = orchestrator.transfer().await;
            });
        }
        "balance" => {
            if let Ok(balance) = orchestrator.native_balance().await {
                println!("Native balance: {balance}");
            }
        }
        "accounts" => {
            if let Ok(accounts) = orchestrator.accounts().await {
                println!("Accounts: {accounts:?}");
            }
        }
        "state" => render(&orchestrator.snapshot()),
        "help" => print_help(),
        "quit" | "exit" => return false,
        other => println!("Unknown command '{other}'; type 'help'"),
    }
    true
}

/// Print the current snapshot the way the two-view UI renders it.
fn render(snapshot: &Snapshot) {
    match &snapshot.mount {
        MountState::Loading => println!("Starting up…"),
        MountState::Ready => {}
        MountState::Failed(reason) => println!("Startup failed: {reason}"),
    }

    match &snapshot.session {
        SessionView::LoggedOut => println!("Logged out. Type 'login' to connect a wallet."),
        SessionView::Authenticating => println!("Connecting to wallet…"),
        SessionView::LoggedIn { account, user } => {
            if let Some(user) = user {
                if let Some(name) = &user.name {
                    println!("User: {name}");
                }
                if let Some(email) = &user.email {
                    println!("Email: {email}");
                }
            }
            println!("Address: {}", account.address);
            println!("Native balance: {}", account.native_balance);
            println!(
                "Token balance: {}",
                snapshot.token.balance.as_deref().unwrap_or("(not read)")
            );
            println!(
                "Allowance: {}",
                snapshot.token.allowance.as_deref().unwrap_or("(not read)")
            );
            if let Some(op) = snapshot.pending_write {
                println!("({op} in progress…)");
            }
        }
    }
}

fn print_help() {
    println!(
        "Commands: login, logout, mint, approve, transfer, balance, accounts, state, help, quit"
    );
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}
