//! Bounded newest-first walk over the transaction log.
//!
//! Pages are fetched strictly one after another: each request needs the
//! cursor of the previous response. The walk ends when the page budget is
//! spent or the source stops returning a continuation token, and the caller
//! may stop earlier simply by not asking for the next page.

use std::sync::Arc;
use sui_explorer_types::TransactionPage;
use tracing::debug;

use crate::error::DiscoveryError;
use crate::source::{PageRequest, PageSource, ScanBounds};

/// Explicit page iterator over a [`PageSource`].
///
/// # Example
///
/// ```ignore
/// let mut scan = PageScan::new(&source, ScanBounds::new(100, 30))?;
/// while let Some(page) = scan.next_page().await? {
///     if page_has_what_we_need(&page) {
///         break; // no further pages are requested
///     }
/// }
/// ```
pub struct PageScan<'a, S: ?Sized> {
    source: &'a S,
    bounds: ScanBounds,
    cursor: Option<String>,
    pages_fetched: usize,
    transactions_seen: usize,
    exhausted: bool,
}

impl<'a, S: PageSource + ?Sized> PageScan<'a, S> {
    pub fn new(source: &'a S, bounds: ScanBounds) -> Result<Self, DiscoveryError> {
        bounds.validate()?;
        Ok(Self {
            source,
            bounds,
            cursor: None,
            pages_fetched: 0,
            transactions_seen: 0,
            exhausted: false,
        })
    }

    /// Fetch the next page, or `None` once the bound or the log end is reached.
    pub async fn next_page(&mut self) -> Result<Option<TransactionPage>, DiscoveryError> {
        if self.exhausted || self.pages_fetched >= self.bounds.max_pages {
            return Ok(None);
        }

        let request = PageRequest::descending(self.cursor.clone(), self.bounds.page_size);
        let page = self
            .source
            .query_page(&request)
            .await
            .map_err(|e| DiscoveryError::PageFetch {
                page: self.pages_fetched + 1,
                cursor: self.cursor.clone(),
                error: Arc::new(e),
            })?;

        self.pages_fetched += 1;
        self.transactions_seen += page.data.len();
        match &page.next_cursor {
            Some(next) => self.cursor = Some(next.clone()),
            None => self.exhausted = true,
        }

        debug!(
            page = self.pages_fetched,
            max_pages = self.bounds.max_pages,
            transactions = page.data.len(),
            has_more = !self.exhausted,
            "fetched transaction page"
        );

        Ok(Some(page))
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    pub fn transactions_seen(&self) -> usize {
        self.transactions_seen
    }

    /// True when the source reported the end of the log (not merely the bound).
    pub fn reached_log_end(&self) -> bool {
        self.exhausted
    }
}
