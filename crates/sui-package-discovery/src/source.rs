//! The transaction page source seam.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use sui_explorer_types::TransactionPage;

use crate::error::DiscoveryError;

/// One request against the transaction log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Continuation token from the previous page; `None` starts at the newest transaction.
    pub cursor: Option<String>,
    pub limit: usize,
    pub descending: bool,
    pub include_object_changes: bool,
}

impl PageRequest {
    /// Newest-first request with object changes, the only kind the scans issue.
    pub fn descending(cursor: Option<String>, limit: usize) -> Self {
        Self {
            cursor,
            limit,
            descending: true,
            include_object_changes: true,
        }
    }
}

/// A cursor-paginated, reverse-chronological transaction log.
///
/// Implementations own transport concerns, retries included.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn query_page(&self, request: &PageRequest) -> Result<TransactionPage>;
}

#[async_trait]
impl<T: PageSource + ?Sized> PageSource for Arc<T> {
    async fn query_page(&self, request: &PageRequest) -> Result<TransactionPage> {
        (**self).query_page(request).await
    }
}

/// How far back a scan may go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScanBounds {
    pub page_size: usize,
    pub max_pages: usize,
}

impl ScanBounds {
    pub const DEFAULT_PAGE_SIZE: usize = 100;
    pub const CATALOG_MAX_PAGES: usize = 300;
    pub const LOCATE_MAX_PAGES: usize = 30;

    pub fn new(page_size: usize, max_pages: usize) -> Self {
        Self {
            page_size,
            max_pages,
        }
    }

    /// 300 pages of 100: roughly the 30,000 newest transactions.
    pub fn catalog_default() -> Self {
        Self::new(Self::DEFAULT_PAGE_SIZE, Self::CATALOG_MAX_PAGES)
    }

    /// 30 pages of 100.
    pub fn locate_default() -> Self {
        Self::new(Self::DEFAULT_PAGE_SIZE, Self::LOCATE_MAX_PAGES)
    }

    /// Upper bound on transactions a scan can visit.
    pub fn window(&self) -> usize {
        self.page_size.saturating_mul(self.max_pages)
    }

    pub fn validate(&self) -> Result<(), DiscoveryError> {
        if self.page_size == 0 {
            return Err(DiscoveryError::InvalidBounds(
                "page size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ScanBounds {
    fn default() -> Self {
        Self::catalog_default()
    }
}
