//! Package-level records produced by the discovery scans.

use serde::{Deserialize, Serialize};

/// A "published" object change seen in the transaction log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishEvent {
    /// Canonical package id.
    pub package_id: String,
    pub module_names: Vec<String>,
    pub timestamp_ms: u64,
    pub tx_digest: String,
}

/// One deduplicated package in a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageCatalogEntry {
    pub package_id: String,
    pub module_names: Vec<String>,
    pub last_updated_ms: u64,
    /// Digest of the transaction the retained publish event came from.
    pub tx_digest: String,
    /// Always 0; nothing tracks views yet.
    pub view_count: u64,
    pub is_favorite: bool,
}

impl PackageCatalogEntry {
    pub fn from_event(event: PublishEvent) -> Self {
        Self {
            package_id: event.package_id,
            module_names: event.module_names,
            last_updated_ms: event.timestamp_ms,
            tx_digest: event.tx_digest,
            view_count: 0,
            is_favorite: false,
        }
    }

    /// `"<first module> (module)"`, or `"Package <short id>"` for a package
    /// published without module names.
    pub fn display_name(&self) -> String {
        match self.module_names.first() {
            Some(first) => format!("{} (module)", first),
            None => format!("Package {}", short_id(&self.package_id)),
        }
    }
}

/// Result of the publish locator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishLocation {
    pub tx_digest: String,
    pub timestamp_ms: u64,
}

/// First 6 and last 4 characters of an identifier.
pub fn short_id(id: &str) -> String {
    let chars: Vec<char> = id.chars().collect();
    if chars.len() <= 10 {
        return id.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}…{}", head, tail)
}
