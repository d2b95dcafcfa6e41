//! The wallet page served at `/`.
//!
//! One self-contained HTML document, no build step. The script connects the
//! browser wallet, makes sure it sits on the configured chain (adding it if
//! the wallet has never seen it), then polls for sign/send work and posts
//! each outcome back.

use crate::config::FaucetConfig;

/// Render the page with chain and auth parameters filled in.
pub fn render_page(config: &FaucetConfig) -> String {
    PAGE_TEMPLATE
        .replace("{{TITLE}}", &config.auth.page_title)
        .replace("{{CLIENT_ID}}", &config.auth.client_id)
        .replace("{{AUTH_NETWORK}}", config.auth.network.as_str())
        .replace("{{CHAIN_ID_HEX}}", &format!("0x{:x}", config.chain.chain_id))
        .replace("{{CHAIN_NAME}}", &config.chain.display_name)
        .replace("{{RPC_URL}}", &config.chain.rpc_url)
        .replace("{{EXPLORER_URL}}", &config.chain.block_explorer_url)
        .replace("{{TICKER}}", &config.chain.ticker)
        .replace("{{TICKER_NAME}}", &config.chain.ticker_name)
        .replace("{{LOGO}}", &config.chain.logo)
}

const PAGE_TEMPLATE: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<meta name="faucet-client-id" content="{{CLIENT_ID}}">
<meta name="faucet-auth-network" content="{{AUTH_NETWORK}}">
<title>{{TITLE}}</title>
<style>
  body { font-family: system-ui, sans-serif; background: #18181b; color: #fafafa;
         display: flex; min-height: 100vh; margin: 0;
         align-items: center; justify-content: center; }
  main { text-align: center; max-width: 36rem; padding: 1rem; }
  img { width: 48px; height: 48px; }
  #status { opacity: 0.85; }
  .error { color: #f87171; }
</style>
</head>
<body>
<main>
  <img src="{{LOGO}}" alt="{{CHAIN_NAME}}">
  <h1>🚀 {{TITLE}} 🚀</h1>
  <p id="status">Connecting to your wallet…</p>
</main>
<script>
const POLL_MS = 1000;
const CHAIN = {
  chainId: '{{CHAIN_ID_HEX}}',
  chainName: '{{CHAIN_NAME}}',
  rpcUrls: ['{{RPC_URL}}'],
  blockExplorerUrls: ['{{EXPLORER_URL}}'],
  nativeCurrency: { name: '{{TICKER_NAME}}', symbol: '{{TICKER}}', decimals: 18 },
  iconUrls: ['{{LOGO}}'],
};

function status(text, isError) {
  const el = document.getElementById('status');
  el.textContent = text;
  el.className = isError ? 'error' : '';
}

async function post(path, body) {
  await fetch(path, {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify(body),
  });
}

async function ensureChain() {
  const current = await window.ethereum.request({ method: 'eth_chainId' });
  if (current === CHAIN.chainId) return;
  try {
    await window.ethereum.request({
      method: 'wallet_switchEthereumChain',
      params: [{ chainId: CHAIN.chainId }],
    });
  } catch (switchErr) {
    await window.ethereum.request({ method: 'wallet_addEthereumChain', params: [CHAIN] });
  }
}

async function serve(req) {
  try {
    let result;
    if (req.kind === 'sign') {
      result = await window.ethereum.request({
        method: 'personal_sign',
        params: [req.message, req.address],
      });
    } else {
      result = await window.ethereum.request({
        method: 'eth_sendTransaction',
        params: [req.tx],
      });
    }
    await post('/api/respond', { id: req.id, result: result });
  } catch (err) {
    await post('/api/respond', { id: req.id, error: err.message || String(err) });
  }
}

const inFlight = new Set();

async function poll() {
  try {
    const requests = await (await fetch('/api/pending')).json();
    for (const req of requests) {
      if (inFlight.has(req.id)) continue;
      inFlight.add(req.id);
      serve(req).finally(() => inFlight.delete(req.id));
    }
    status('Wallet connected. Keep this page open; approval prompts appear here.');
  } catch (err) {
    status('Bridge unreachable: ' + (err.message || err), true);
  }
  setTimeout(poll, POLL_MS);
}

async function main() {
  if (!window.ethereum) {
    status('No browser wallet found. Install one and reload this page.', true);
    await post('/api/connect', { error: 'no browser wallet available' });
    return;
  }
  try {
    const accounts = await window.ethereum.request({ method: 'eth_requestAccounts' });
    await ensureChain();
    const chainId = await window.ethereum.request({ method: 'eth_chainId' });
    await post('/api/connect', {
      address: accounts[0],
      chain_id: parseInt(chainId, 16),
      wallet_name: window.ethereum.isMetaMask ? 'MetaMask' : null,
    });
    poll();
  } catch (err) {
    status('Connection refused: ' + (err.message || err), true);
    await post('/api/connect', { error: err.message || String(err) });
  }
}

main();
</script>
</body>
</html>
"#;
