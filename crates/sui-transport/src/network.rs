//! Network names and their default fullnode endpoints.

const MAINNET_RPC: &str = "https://fullnode.mainnet.sui.io:443";
const TESTNET_RPC: &str = "https://fullnode.testnet.sui.io:443";
const DEVNET_RPC: &str = "https://fullnode.devnet.sui.io:443";
const LOCALNET_RPC: &str = "http://127.0.0.1:9000";

pub fn infer_network_from_url(url: &str) -> Option<&'static str> {
    let lower = url.to_lowercase();
    if lower.contains("testnet") {
        Some("testnet")
    } else if lower.contains("devnet") {
        Some("devnet")
    } else if lower.contains("mainnet") {
        Some("mainnet")
    } else if lower.contains("127.0.0.1") || lower.contains("localhost") {
        Some("localnet")
    } else {
        None
    }
}

/// Fullnode JSON-RPC endpoint for a network name. Unknown names map to testnet.
pub fn default_rpc_endpoint(network: &str) -> String {
    match network.trim().to_lowercase().as_str() {
        "mainnet" => MAINNET_RPC.to_string(),
        "devnet" => DEVNET_RPC.to_string(),
        "localnet" | "local" => LOCALNET_RPC.to_string(),
        _ => TESTNET_RPC.to_string(),
    }
}

/// Endpoint resolution order: explicit URL, `SUI_RPC_URL`, network default.
pub fn resolve_rpc_endpoint(explicit: Option<&str>, network: &str) -> String {
    if let Some(url) = explicit.map(str::trim).filter(|u| !u.is_empty()) {
        return url.to_string();
    }
    if let Ok(value) = std::env::var("SUI_RPC_URL") {
        if !value.trim().is_empty() {
            return value.trim().to_string();
        }
    }
    default_rpc_endpoint(network)
}
