//! Transaction log records as returned by `suix_queryTransactionBlocks`.
//!
//! Records are parsed leniently: a transaction whose fields are missing or
//! oddly typed still yields a [`TxRecord`], and object changes are kept as raw
//! JSON so that the publish-event extractor decides what is usable.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One transaction from the reverse-chronological log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxRecord {
    pub digest: String,
    pub timestamp_ms: Option<u64>,
    #[serde(default)]
    pub object_changes: Vec<Value>,
}

impl TxRecord {
    /// Parse one entry of the `data` array. Never fails.
    pub fn from_value(value: &Value) -> Self {
        let digest = value
            .get("digest")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let timestamp_ms = value.get("timestampMs").and_then(parse_u64_lenient);
        let object_changes = value
            .get("objectChanges")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        Self {
            digest,
            timestamp_ms,
            object_changes,
        }
    }
}

/// Sui encodes 64-bit integers as decimal strings; accept numbers as well.
pub fn parse_u64_lenient(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// One page of the transaction log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPage {
    pub data: Vec<TxRecord>,
    /// Continuation token; `None` once the log is exhausted.
    pub next_cursor: Option<String>,
}

impl TransactionPage {
    pub fn new(data: Vec<TxRecord>, next_cursor: Option<String>) -> Self {
        Self { data, next_cursor }
    }

    /// Build a page from a JSON-RPC `result` object.
    ///
    /// Sui keeps returning the last digest as `nextCursor` on the final page
    /// and signals the end with `hasNextPage: false`; that case is folded
    /// into `next_cursor: None`.
    pub fn from_rpc_value(value: &Value) -> Result<Self> {
        let data = value
            .get("data")
            .and_then(Value::as_array)
            .ok_or_else(|| anyhow!("transaction page missing data array: {}", value))?;
        let has_next = value.get("hasNextPage").and_then(Value::as_bool);
        let next_cursor = match has_next {
            Some(false) => None,
            _ => value
                .get("nextCursor")
                .and_then(Value::as_str)
                .filter(|c| !c.is_empty())
                .map(String::from),
        };
        Ok(Self {
            data: data.iter().map(TxRecord::from_value).collect(),
            next_cursor,
        })
    }
}
