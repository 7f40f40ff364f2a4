//! JSON-RPC Client for a Sui Fullnode
//!
//! Covers the two read methods the explorer needs:
//!
//! - `suix_queryTransactionBlocks`: the reverse-chronological transaction log,
//!   paginated by an opaque digest cursor, with object changes attached
//! - `sui_getNormalizedMoveModulesByPackage`: the normalized ABI of a package
//!
//! ## Usage
//!
//! ```ignore
//! let client = JsonRpcClient::testnet();
//! let page = client.query_transaction_blocks(None, 100, true)?;
//! for tx in &page.data {
//!     println!("{} {:?}", tx.digest, tx.timestamp_ms);
//! }
//! let next = client.query_transaction_blocks(page.next_cursor.as_deref(), 100, true)?;
//! ```
//!
//! Calls are blocking and never retried here; retry policy belongs to the
//! caller.

use anyhow::{anyhow, Result};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use sui_explorer_types::env_utils::env_secs_or;
use sui_explorer_types::TransactionPage;

use crate::network::default_rpc_endpoint;

/// JSON-RPC client for Sui fullnode queries.
#[derive(Clone)]
pub struct JsonRpcClient {
    endpoint: String,
    agent: ureq::Agent,
    next_id: Arc<AtomicU64>,
}

impl std::fmt::Debug for JsonRpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonRpcClient")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl JsonRpcClient {
    /// Default request timeout in seconds (can be overridden by env).
    const DEFAULT_TIMEOUT_SECS: u64 = 30;
    /// Default connect timeout in seconds (can be overridden by env).
    const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

    fn default_timeouts() -> (Duration, Duration) {
        (
            env_secs_or(
                "SUI_RPC_TIMEOUT_SECS",
                Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            ),
            env_secs_or(
                "SUI_RPC_CONNECT_TIMEOUT_SECS",
                Duration::from_secs(Self::DEFAULT_CONNECT_TIMEOUT_SECS),
            ),
        )
    }

    fn build_agent(timeout: Duration, connect_timeout: Duration) -> ureq::Agent {
        ureq::AgentBuilder::new()
            .timeout(timeout)
            .timeout_connect(connect_timeout)
            .build()
    }

    /// Create a client for mainnet.
    pub fn mainnet() -> Self {
        Self::new(&default_rpc_endpoint("mainnet"))
    }

    /// Create a client for testnet.
    pub fn testnet() -> Self {
        Self::new(&default_rpc_endpoint("testnet"))
    }

    /// Create a client with a custom endpoint.
    pub fn new(endpoint: &str) -> Self {
        let (timeout, connect_timeout) = Self::default_timeouts();
        Self::with_timeouts(endpoint, timeout, connect_timeout)
    }

    /// Create a client with explicit timeouts.
    pub fn with_timeouts(endpoint: &str, timeout: Duration, connect_timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            agent: Self::build_agent(timeout, connect_timeout),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Execute a JSON-RPC call and return its `result`.
    fn call(&self, method: &str, params: Value) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        tracing::trace!(method, id, endpoint = %self.endpoint, "json-rpc request");

        let response: Value = self
            .agent
            .post(&self.endpoint)
            .set("Content-Type", "application/json")
            .send_json(&body)
            .map_err(|e| anyhow!("{} request failed: {}", method, e))?
            .into_json()
            .map_err(|e| anyhow!("failed to parse {} response: {}", method, e))?;

        parse_rpc_response(method, response)
    }

    /// Fetch one page of the transaction log with object changes.
    ///
    /// `descending` asks for newest transactions first; `cursor` is the
    /// `nextCursor` of the previous page.
    pub fn query_transaction_blocks(
        &self,
        cursor: Option<&str>,
        limit: usize,
        descending: bool,
    ) -> Result<TransactionPage> {
        let query = serde_json::json!({
            "filter": null,
            "options": { "showObjectChanges": true }
        });
        let params = serde_json::json!([query, cursor, limit, descending]);
        let result = self.call("suix_queryTransactionBlocks", params)?;
        TransactionPage::from_rpc_value(&result)
    }

    /// Fetch the normalized modules of a package, keyed by module name.
    pub fn get_normalized_move_modules_by_package(&self, package_id: &str) -> Result<Value> {
        let result = self.call(
            "sui_getNormalizedMoveModulesByPackage",
            serde_json::json!([package_id]),
        )?;
        if !result.is_object() {
            return Err(anyhow!(
                "normalized modules for {} is not an object: {}",
                package_id,
                result
            ));
        }
        Ok(result)
    }
}

/// Split a JSON-RPC envelope into its result or a descriptive error.
fn parse_rpc_response(method: &str, response: Value) -> Result<Value> {
    if let Some(error) = response.get("error").filter(|e| !e.is_null()) {
        let code = error.get("code").and_then(Value::as_i64).unwrap_or(0);
        let msg = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        return Err(anyhow!("{} error {}: {}", method, code, msg));
    }

    response
        .get("result")
        .cloned()
        .filter(|r| !r.is_null())
        .ok_or_else(|| anyhow!("no result in {} response", method))
}
