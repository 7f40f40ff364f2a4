//! Search, favorite marking and sort modes over a package catalog.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use sui_explorer_types::PackageCatalogEntry;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Newest publication first.
    #[default]
    Recent,
    /// By view count. Nothing records views, so this keeps catalog order.
    Popular,
    /// Favorites only, newest publication first.
    Favorites,
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortMode::Recent => "recent",
            SortMode::Popular => "popular",
            SortMode::Favorites => "favorites",
        })
    }
}

/// What a caller asks [`crate::Explorer::list_packages`] for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub search: String,
    pub sort: SortMode,
    pub limit: Option<usize>,
}

impl ListQuery {
    pub fn new(search: impl Into<String>, sort: SortMode) -> Self {
        Self {
            search: search.into(),
            sort,
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Lower-cased, trimmed search text. Empty means "match everything".
#[derive(Debug, Clone)]
pub struct SearchNeedle(String);

impl SearchNeedle {
    pub fn new(query: &str) -> Self {
        Self(query.trim().to_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn hit(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.0)
    }

    /// Match on id, display name, module names, or any of `function_names`.
    pub fn matches<'a>(
        &self,
        entry: &PackageCatalogEntry,
        function_names: impl IntoIterator<Item = &'a str>,
    ) -> bool {
        if self.is_empty() {
            return true;
        }
        self.hit(&entry.package_id)
            || self.hit(&entry.display_name())
            || entry.module_names.iter().any(|m| self.hit(m))
            || function_names.into_iter().any(|f| self.hit(f))
    }
}

pub fn mark_favorites(entries: &mut [PackageCatalogEntry], favorites: &HashSet<String>) {
    for entry in entries {
        entry.is_favorite = favorites.contains(&entry.package_id);
    }
}

/// Apply a sort mode in place. Sorts are stable, so ties keep catalog order.
pub fn sort_entries(entries: &mut Vec<PackageCatalogEntry>, mode: SortMode) {
    match mode {
        SortMode::Recent => entries.sort_by(|a, b| b.last_updated_ms.cmp(&a.last_updated_ms)),
        SortMode::Popular => entries.sort_by(|a, b| b.view_count.cmp(&a.view_count)),
        SortMode::Favorites => {
            entries.retain(|e| e.is_favorite);
            entries.sort_by(|a, b| b.last_updated_ms.cmp(&a.last_updated_ms));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, ts: u64, modules: &[&str]) -> PackageCatalogEntry {
        PackageCatalogEntry {
            package_id: id.to_string(),
            module_names: modules.iter().map(|m| m.to_string()).collect(),
            last_updated_ms: ts,
            tx_digest: format!("tx-{id}"),
            view_count: 0,
            is_favorite: false,
        }
    }

    fn ids(entries: &[PackageCatalogEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.package_id.as_str()).collect()
    }

    #[test]
    fn test_recent_sorts_newest_first() {
        let mut entries = vec![entry("0x1", 10, &[]), entry("0x2", 30, &[]), entry("0x3", 20, &[])];
        sort_entries(&mut entries, SortMode::Recent);
        assert_eq!(ids(&entries), vec!["0x2", "0x3", "0x1"]);
    }

    #[test]
    fn test_popular_keeps_catalog_order() {
        let mut entries = vec![entry("0x1", 10, &[]), entry("0x2", 30, &[]), entry("0x3", 20, &[])];
        sort_entries(&mut entries, SortMode::Popular);
        assert_eq!(ids(&entries), vec!["0x1", "0x2", "0x3"]);
    }

    #[test]
    fn test_favorites_filters_then_sorts() {
        let mut entries = vec![entry("0x1", 10, &[]), entry("0x2", 30, &[]), entry("0x3", 20, &[])];
        let favorites: HashSet<String> = ["0x1", "0x3"].iter().map(|s| s.to_string()).collect();
        mark_favorites(&mut entries, &favorites);
        sort_entries(&mut entries, SortMode::Favorites);
        assert_eq!(ids(&entries), vec!["0x3", "0x1"]);
        assert!(entries.iter().all(|e| e.is_favorite));
    }

    #[test]
    fn test_search_is_trimmed_and_case_insensitive() {
        let e = entry("0xABCDEF", 1, &["Pool", "math"]);
        assert!(SearchNeedle::new("  POOL ").matches(&e, []));
        assert!(SearchNeedle::new("abcd").matches(&e, []));
        assert!(SearchNeedle::new("(module)").matches(&e, []));
        assert!(!SearchNeedle::new("swap").matches(&e, []));
        assert!(SearchNeedle::new("swap").matches(&e, ["swap_exact_in"]));
        assert!(SearchNeedle::new("   ").matches(&e, []));
    }

    #[test]
    fn test_sort_mode_names() {
        assert_eq!(SortMode::Favorites.to_string(), "favorites");
        assert_eq!(serde_json::to_string(&SortMode::Popular).unwrap(), "\"popular\"");
    }
}
