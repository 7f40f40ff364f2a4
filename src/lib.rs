//! Sui Package Explorer
//!
//! Finds recently published Sui Move packages by walking the fullnode's
//! transaction log backwards, and turns normalized Move modules into
//! display-ready function and struct listings.
//!
//! - [`Explorer`]: package listing, publish info, ABI views and favorites
//! - [`query_cache`]: per-key memoization with a staleness window and
//!   in-flight deduplication
//! - [`listing`]: search and sort modes
//! - [`rpc`]: JSON-RPC backed page and ABI sources
//!
//! Discovery itself lives in `sui-package-discovery`, ABI normalization in
//! `sui-package-extractor`.
//!
//! # Example
//!
//! ```ignore
//! use sui_package_explorer::{Explorer, ExplorerConfig, ListQuery, SortMode};
//!
//! let explorer = Explorer::from_config(&ExplorerConfig::from_env());
//! let recent = explorer.list_packages(&ListQuery::new("pool", SortMode::Recent)).await?;
//! let abi = explorer.get_abi_view("0x2").await?;
//! ```

pub mod config;
pub mod error;
pub mod explorer;
pub mod favorites;
pub mod listing;
pub mod query_cache;
pub mod rpc;
pub mod utils;

pub use config::ExplorerConfig;
pub use error::{ExplorerError, ExplorerResult};
pub use explorer::{canonical_package_id, AbiSource, Explorer, ExplorerCaches};
pub use favorites::{FavoritesStore, InMemoryFavorites, JsonFileFavorites, SavedPackage};
pub use listing::{ListQuery, SortMode};
pub use query_cache::{CacheState, QueryCache};
pub use rpc::{RpcAbiSource, RpcPageSource};
