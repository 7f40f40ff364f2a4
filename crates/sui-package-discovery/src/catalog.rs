//! Deduplicated package catalog.

use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use sui_explorer_types::{PackageCatalogEntry, PublishEvent};
use tracing::{debug, info};

use crate::error::DiscoveryError;
use crate::extractor::extract_publish_events;
use crate::scan::PageScan;
use crate::source::{PageSource, ScanBounds};

/// What a catalog build looked at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    pub pages: usize,
    pub transactions: usize,
    pub publish_events: usize,
    /// The source ran out of pages before the bound was reached.
    pub reached_log_end: bool,
}

/// Package id -> most recently observed publication.
///
/// Entries are kept in the order their package was first observed, which for
/// a newest-first scan is newest publication first.
#[derive(Debug, Clone, Default)]
pub struct PackageCatalog {
    entries: HashMap<String, PackageCatalogEntry>,
    order: Vec<String>,
    stats: ScanStats,
}

impl PackageCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one publish event in. An existing entry is replaced only by a
    /// strictly newer event. Returns whether the catalog changed.
    pub fn observe(&mut self, event: PublishEvent) -> bool {
        match self.entries.entry(event.package_id.clone()) {
            Entry::Vacant(slot) => {
                self.order.push(event.package_id.clone());
                slot.insert(PackageCatalogEntry::from_event(event));
                true
            }
            Entry::Occupied(mut slot) => {
                if event.timestamp_ms > slot.get().last_updated_ms {
                    slot.insert(PackageCatalogEntry::from_event(event));
                    true
                } else {
                    false
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, package_id: &str) -> Option<&PackageCatalogEntry> {
        self.entries.get(package_id)
    }

    pub fn contains(&self, package_id: &str) -> bool {
        self.entries.contains_key(package_id)
    }

    /// Entries in first-observed order.
    pub fn entries(&self) -> impl Iterator<Item = &PackageCatalogEntry> + '_ {
        self.order.iter().filter_map(|id| self.entries.get(id))
    }

    pub fn to_vec(&self) -> Vec<PackageCatalogEntry> {
        self.entries().cloned().collect()
    }

    pub fn into_vec(mut self) -> Vec<PackageCatalogEntry> {
        self.order
            .iter()
            .filter_map(|id| self.entries.remove(id))
            .collect()
    }

    pub fn scan_stats(&self) -> ScanStats {
        self.stats
    }
}

/// Two catalogs are equal when they map the same ids to the same entries.
impl PartialEq for PackageCatalog {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for PackageCatalog {}

impl FromIterator<PublishEvent> for PackageCatalog {
    fn from_iter<I: IntoIterator<Item = PublishEvent>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for event in iter {
            catalog.observe(event);
        }
        catalog
    }
}

/// Scan up to `bounds.max_pages` pages and fold every publish event into a
/// catalog.
///
/// A failed page fails the whole build; partially accumulated entries are
/// dropped.
pub async fn build_catalog<S: PageSource + ?Sized>(
    source: &S,
    bounds: ScanBounds,
) -> Result<PackageCatalog, DiscoveryError> {
    let mut scan = PageScan::new(source, bounds)?;
    let mut catalog = PackageCatalog::new();
    let mut publish_events = 0usize;

    while let Some(page) = scan.next_page().await? {
        for event in extract_publish_events(&page) {
            publish_events += 1;
            if catalog.observe(event) {
                debug!(packages = catalog.len(), "catalog updated");
            }
        }
    }

    catalog.stats = ScanStats {
        pages: scan.pages_fetched(),
        transactions: scan.transactions_seen(),
        publish_events,
        reached_log_end: scan.reached_log_end(),
    };

    info!(
        packages = catalog.len(),
        pages = catalog.stats.pages,
        transactions = catalog.stats.transactions,
        publish_events,
        "package catalog built"
    );

    Ok(catalog)
}
