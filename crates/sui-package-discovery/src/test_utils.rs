//! In-memory transaction log for tests and offline demos.

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use sui_explorer_types::{TransactionPage, TxRecord};

use crate::source::{PageRequest, PageSource};

/// A fixed sequence of pages linked by cursors `c1`, `c2`, ...
///
/// The first page is served for a `None` cursor, page `i` (0-based) for
/// cursor `c{i}`. The last page carries no continuation token. Records in
/// each stored page are served as-is; `limit` is recorded but not applied.
#[derive(Default)]
pub struct SyntheticPageSource {
    pages: Vec<Vec<TxRecord>>,
    fail_at: Option<usize>,
    yield_before_reply: bool,
    fetches: AtomicUsize,
    requests: Mutex<Vec<PageRequest>>,
}

impl SyntheticPageSource {
    pub fn new(pages: Vec<Vec<TxRecord>>) -> Self {
        Self {
            pages,
            ..Default::default()
        }
    }

    /// `pages` pages of `per_page` transactions, each publishing one package.
    ///
    /// Timestamps decrease through the log so the first transaction is the newest.
    pub fn uniform(pages: usize, per_page: usize) -> Self {
        let total = pages * per_page;
        let pages = (0..pages)
            .map(|p| {
                (0..per_page)
                    .map(|i| {
                        let n = p * per_page + i;
                        TxRecordBuilder::new(&format!("tx{n}"))
                            .timestamp((total - n) as u64 * 1_000)
                            .published(&format!("0x{:x}", n + 1), &[format!("mod{n}").as_str()])
                            .build()
                    })
                    .collect()
            })
            .collect();
        Self::new(pages)
    }

    /// Fail the request for the given 0-based page index.
    pub fn failing_at(mut self, page: usize) -> Self {
        self.fail_at = Some(page);
        self
    }

    /// Yield to the scheduler before every reply, so concurrent callers interleave.
    pub fn yielding(mut self) -> Self {
        self.yield_before_reply = true;
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().clone()
    }

    fn page_index(&self, cursor: Option<&str>) -> Result<usize> {
        let Some(cursor) = cursor else {
            return Ok(0);
        };
        let index = cursor
            .strip_prefix('c')
            .and_then(|n| n.parse::<usize>().ok())
            .filter(|i| *i > 0 && *i < self.pages.len())
            .ok_or_else(|| anyhow!("unknown cursor {cursor}"))?;
        Ok(index)
    }
}

#[async_trait]
impl PageSource for SyntheticPageSource {
    async fn query_page(&self, request: &PageRequest) -> Result<TransactionPage> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());
        if self.yield_before_reply {
            tokio::task::yield_now().await;
        }

        if self.pages.is_empty() {
            return Ok(TransactionPage::new(Vec::new(), None));
        }
        let index = self.page_index(request.cursor.as_deref())?;
        if self.fail_at == Some(index) {
            bail!("synthetic failure at page {index}");
        }

        let next_cursor = (index + 1 < self.pages.len()).then(|| format!("c{}", index + 1));
        Ok(TransactionPage::new(self.pages[index].clone(), next_cursor))
    }
}

/// Builder for [`TxRecord`] fixtures.
#[derive(Debug, Clone)]
pub struct TxRecordBuilder {
    record: TxRecord,
}

impl TxRecordBuilder {
    pub fn new(digest: &str) -> Self {
        Self {
            record: TxRecord {
                digest: digest.to_string(),
                timestamp_ms: None,
                object_changes: Vec::new(),
            },
        }
    }

    pub fn timestamp(mut self, timestamp_ms: u64) -> Self {
        self.record.timestamp_ms = Some(timestamp_ms);
        self
    }

    pub fn change(mut self, change: Value) -> Self {
        self.record.object_changes.push(change);
        self
    }

    pub fn published(self, package_id: &str, modules: &[&str]) -> Self {
        self.change(published_change(package_id, modules))
    }

    pub fn build(self) -> TxRecord {
        self.record
    }
}

/// A `published` object change as the fullnode reports it.
pub fn published_change(package_id: &str, modules: &[&str]) -> Value {
    json!({
        "type": "published",
        "packageId": package_id,
        "version": "1",
        "digest": "synthetic",
        "modules": modules,
    })
}
