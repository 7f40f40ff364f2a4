//! Shared types for the sui-package-explorer workspace.
//!
//! This crate holds the value types that flow between the transport, discovery
//! and presentation layers, so none of those crates has to depend on another
//! just to name a record.
//!
//! ## Transaction log
//!
//! - [`TxRecord`](records::TxRecord) - one transaction with its raw object changes
//! - [`TransactionPage`](records::TransactionPage) - one cursor-paginated page of records
//!
//! ## Packages
//!
//! - [`PublishEvent`](package::PublishEvent) - a "published" object change
//! - [`PackageCatalogEntry`](package::PackageCatalogEntry) - one deduplicated package
//! - [`PublishLocation`](package::PublishLocation) - where a package was published

pub mod address;
pub mod env_utils;
pub mod package;
pub mod records;

pub use address::{normalize_address, normalize_address_checked, normalize_address_short};
pub use package::{short_id, PackageCatalogEntry, PublishEvent, PublishLocation};
pub use records::{TransactionPage, TxRecord};

use std::time::Duration;

/// Configuration for retry behavior on network operations.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Number of retry attempts.
    pub retries: usize,
    /// Initial backoff duration between retries.
    pub initial_backoff: Duration,
    /// Maximum backoff duration.
    pub max_backoff: Duration,
}

impl RetryConfig {
    /// Create a new RetryConfig with the specified parameters.
    pub fn new(retries: usize, initial_backoff_ms: u64, max_backoff_ms: u64) -> Self {
        Self {
            retries,
            initial_backoff: Duration::from_millis(initial_backoff_ms),
            max_backoff: Duration::from_millis(max_backoff_ms),
        }
    }

    /// No retries at all.
    pub fn none() -> Self {
        Self::new(0, 0, 0)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            retries: 1,
            initial_backoff: Duration::from_millis(250),
            max_backoff: Duration::from_millis(2000),
        }
    }
}
