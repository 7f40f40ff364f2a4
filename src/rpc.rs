//! Fullnode-backed page and ABI sources.
//!
//! The JSON-RPC client is blocking, so every call runs on the blocking pool.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use sui_explorer_types::{RetryConfig, TransactionPage};
use sui_package_discovery::{PageRequest, PageSource};
use sui_package_extractor::{parse_package_abi, PackageAbi};
use sui_transport::JsonRpcClient;

use crate::config::ExplorerConfig;
use crate::explorer::AbiSource;
use crate::utils::with_retries;

pub fn client_from_config(config: &ExplorerConfig) -> JsonRpcClient {
    JsonRpcClient::with_timeouts(
        &config.rpc_url,
        config.rpc_timeout,
        config.rpc_connect_timeout,
    )
}

#[derive(Debug, Clone)]
pub struct RpcPageSource {
    client: JsonRpcClient,
    retry: RetryConfig,
}

impl RpcPageSource {
    pub fn new(client: JsonRpcClient, retry: RetryConfig) -> Self {
        Self { client, retry }
    }
}

#[async_trait]
impl PageSource for RpcPageSource {
    async fn query_page(&self, request: &PageRequest) -> Result<TransactionPage> {
        with_retries(self.retry, "suix_queryTransactionBlocks", || {
            let client = self.client.clone();
            let cursor = request.cursor.clone();
            let limit = request.limit;
            let descending = request.descending;
            async move {
                tokio::task::spawn_blocking(move || {
                    client.query_transaction_blocks(cursor.as_deref(), limit, descending)
                })
                .await
                .map_err(|e| anyhow!("transaction page task failed: {}", e))?
            }
        })
        .await
    }
}

#[derive(Debug, Clone)]
pub struct RpcAbiSource {
    client: JsonRpcClient,
    retry: RetryConfig,
}

impl RpcAbiSource {
    pub fn new(client: JsonRpcClient, retry: RetryConfig) -> Self {
        Self { client, retry }
    }
}

#[async_trait]
impl AbiSource for RpcAbiSource {
    async fn normalized_modules(&self, package_id: &str) -> Result<PackageAbi> {
        let value = with_retries(self.retry, "sui_getNormalizedMoveModulesByPackage", || {
            let client = self.client.clone();
            let package_id = package_id.to_string();
            async move {
                tokio::task::spawn_blocking(move || {
                    client.get_normalized_move_modules_by_package(&package_id)
                })
                .await
                .map_err(|e| anyhow!("normalized modules task failed: {}", e))?
            }
        })
        .await?;
        parse_package_abi(value)
    }
}
