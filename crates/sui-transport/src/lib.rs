//! Sui Transport Layer
//!
//! Blocking JSON-RPC access to a Sui fullnode.
//!
//! This crate provides:
//! - [`jsonrpc`]: client for `suix_queryTransactionBlocks` and
//!   `sui_getNormalizedMoveModulesByPackage`
//! - [`network`]: network names and default endpoints
//!
//! # Example
//!
//! ```ignore
//! use sui_transport::JsonRpcClient;
//!
//! let client = JsonRpcClient::testnet();
//! let page = client.query_transaction_blocks(None, 50, true)?;
//! let modules = client.get_normalized_move_modules_by_package("0x2")?;
//! ```
//!
//! The client is synchronous (ureq); async callers run it on
//! `tokio::task::spawn_blocking`.

pub mod jsonrpc;
pub mod network;

pub use jsonrpc::JsonRpcClient;
pub use network::{default_rpc_endpoint, infer_network_from_url, resolve_rpc_endpoint};
