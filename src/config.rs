//! Explorer configuration: defaults, environment overrides, CLI overrides.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use sui_explorer_types::env_utils::{env_secs_or, env_string, env_var_or};
use sui_explorer_types::RetryConfig;
use sui_package_discovery::ScanBounds;
use sui_transport::{infer_network_from_url, resolve_rpc_endpoint};

pub const DEFAULT_NETWORK: &str = "testnet";
pub const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(60);
pub const DEFAULT_EVICT_AFTER: Duration = Duration::from_secs(300);
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_RPC_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplorerConfig {
    pub network: String,
    pub rpc_url: String,
    pub catalog_scan: ScanBounds,
    pub locate_scan: ScanBounds,
    /// Cached catalogs and ABI views older than this are refetched.
    #[serde(with = "duration_secs")]
    pub stale_after: Duration,
    /// Cache entries untouched for this long are dropped.
    #[serde(with = "duration_secs")]
    pub evict_after: Duration,
    #[serde(skip, default)]
    pub retry: RetryConfig,
    pub favorites_path: PathBuf,
    #[serde(with = "duration_secs")]
    pub rpc_timeout: Duration,
    #[serde(with = "duration_secs")]
    pub rpc_connect_timeout: Duration,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            network: DEFAULT_NETWORK.to_string(),
            rpc_url: sui_transport::default_rpc_endpoint(DEFAULT_NETWORK),
            catalog_scan: ScanBounds::catalog_default(),
            locate_scan: ScanBounds::locate_default(),
            stale_after: DEFAULT_STALE_AFTER,
            evict_after: DEFAULT_EVICT_AFTER,
            retry: RetryConfig::default(),
            favorites_path: default_favorites_path(),
            rpc_timeout: DEFAULT_RPC_TIMEOUT,
            rpc_connect_timeout: DEFAULT_RPC_CONNECT_TIMEOUT,
        }
    }
}

impl ExplorerConfig {
    /// Defaults overridden by `SUI_EXPLORER_*` / `SUI_RPC_*` variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let network = env_string("SUI_EXPLORER_NETWORK").unwrap_or(defaults.network);
        let rpc_url = resolve_rpc_endpoint(None, &network);

        let retry = RetryConfig {
            retries: env_var_or("SUI_EXPLORER_RPC_RETRIES", defaults.retry.retries),
            ..defaults.retry
        };

        Self {
            rpc_url,
            catalog_scan: ScanBounds::new(
                env_var_or("SUI_EXPLORER_CATALOG_PAGE_SIZE", defaults.catalog_scan.page_size),
                env_var_or("SUI_EXPLORER_CATALOG_MAX_PAGES", defaults.catalog_scan.max_pages),
            ),
            locate_scan: ScanBounds::new(
                env_var_or("SUI_EXPLORER_LOCATE_PAGE_SIZE", defaults.locate_scan.page_size),
                env_var_or("SUI_EXPLORER_LOCATE_MAX_PAGES", defaults.locate_scan.max_pages),
            ),
            stale_after: env_secs_or("SUI_EXPLORER_STALE_SECS", defaults.stale_after),
            evict_after: env_secs_or("SUI_EXPLORER_EVICT_SECS", defaults.evict_after),
            retry,
            favorites_path: env_string("SUI_EXPLORER_FAVORITES")
                .map(PathBuf::from)
                .unwrap_or(defaults.favorites_path),
            rpc_timeout: env_secs_or("SUI_RPC_TIMEOUT_SECS", defaults.rpc_timeout),
            rpc_connect_timeout: env_secs_or(
                "SUI_RPC_CONNECT_TIMEOUT_SECS",
                defaults.rpc_connect_timeout,
            ),
            network,
        }
    }

    /// Switch network; the endpoint follows unless `rpc_url` is given too.
    pub fn with_network(mut self, network: &str, rpc_url: Option<&str>) -> Self {
        self.network = network.to_string();
        self.rpc_url = resolve_rpc_endpoint(rpc_url, network);
        self
    }

    /// Use `rpc_url`; the network name follows when the URL reveals it.
    pub fn with_rpc_url(mut self, rpc_url: &str) -> Self {
        if let Some(network) = infer_network_from_url(rpc_url) {
            self.network = network.to_string();
        }
        self.rpc_url = rpc_url.to_string();
        self
    }
}

/// `<data dir>/sui-explorer/favorites.json`, falling back to the working directory.
pub fn default_favorites_path() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sui-explorer")
        .join("favorites.json")
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExplorerConfig::default();
        assert_eq!(config.network, "testnet");
        assert_eq!(config.catalog_scan, ScanBounds::new(100, 300));
        assert_eq!(config.locate_scan, ScanBounds::new(100, 30));
        assert_eq!(config.stale_after, Duration::from_secs(60));
        assert_eq!(config.evict_after, Duration::from_secs(300));
        assert!(config.favorites_path.ends_with("sui-explorer/favorites.json"));
    }

    #[test]
    fn test_with_network_follows_endpoint() {
        let config = ExplorerConfig::default().with_network("mainnet", None);
        assert_eq!(config.network, "mainnet");
        assert!(config.rpc_url.contains("mainnet"));

        let config = ExplorerConfig::default().with_network("mainnet", Some("http://localhost:9000"));
        assert_eq!(config.rpc_url, "http://localhost:9000");
    }

    #[test]
    fn test_rpc_url_reveals_network() {
        let config = ExplorerConfig::default().with_rpc_url("https://fullnode.mainnet.sui.io:443");
        assert_eq!(config.network, "mainnet");

        let config = ExplorerConfig::default().with_rpc_url("https://rpc.example.org");
        assert_eq!(config.network, "testnet");
        assert_eq!(config.rpc_url, "https://rpc.example.org");
    }

    #[test]
    fn test_config_serializes_durations_as_seconds() {
        let json = serde_json::to_value(ExplorerConfig::default()).unwrap();
        assert_eq!(json["stale_after"], 60);
        assert_eq!(json["catalog_scan"]["max_pages"], 300);
    }
}
