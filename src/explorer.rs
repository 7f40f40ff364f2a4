//! The presentation boundary: package listing, publish info, ABI views, favorites.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use sui_explorer_types::{normalize_address_checked, PackageCatalogEntry, PublishLocation};
use sui_package_discovery::{build_catalog, locate_publish, PackageCatalog, PageSource, ScanBounds};
use sui_package_extractor::{AbiView, PackageAbi};
use tracing::{debug, info};

use crate::config::ExplorerConfig;
use crate::error::{ExplorerError, ExplorerResult};
use crate::favorites::{FavoritesStore, JsonFileFavorites, SavedPackage};
use crate::listing::{mark_favorites, sort_entries, ListQuery, SearchNeedle};
use crate::query_cache::QueryCache;
use crate::rpc::{client_from_config, RpcAbiSource, RpcPageSource};

/// Normalized Move modules of a package, keyed by module name.
///
/// Implementations own transport concerns, retries included. A package that
/// does not exist must be an error, not an empty map.
#[async_trait]
pub trait AbiSource: Send + Sync {
    async fn normalized_modules(&self, package_id: &str) -> anyhow::Result<PackageAbi>;
}

/// Memoization tables shared by every [`Explorer`] built on them.
pub struct ExplorerCaches {
    catalog: QueryCache<ScanBounds, Arc<PackageCatalog>, ExplorerError>,
    publish: QueryCache<(String, ScanBounds), Option<PublishLocation>, ExplorerError>,
    abi: QueryCache<String, Arc<AbiView>, ExplorerError>,
}

impl ExplorerCaches {
    pub fn new(stale_after: Duration, evict_after: Duration) -> Self {
        Self {
            catalog: QueryCache::new("catalog", stale_after, evict_after),
            publish: QueryCache::new("publish", stale_after, evict_after),
            abi: QueryCache::new("abi", stale_after, evict_after),
        }
    }

    pub fn from_config(config: &ExplorerConfig) -> Self {
        Self::new(config.stale_after, config.evict_after)
    }

    pub fn catalog(&self) -> &QueryCache<ScanBounds, Arc<PackageCatalog>, ExplorerError> {
        &self.catalog
    }

    pub fn abi(&self) -> &QueryCache<String, Arc<AbiView>, ExplorerError> {
        &self.abi
    }

    pub fn clear(&self) {
        self.catalog.clear();
        self.publish.clear();
        self.abi.clear();
    }
}

pub struct Explorer {
    network: String,
    catalog_bounds: ScanBounds,
    locate_bounds: ScanBounds,
    pages: Arc<dyn PageSource>,
    abis: Arc<dyn AbiSource>,
    favorites: Arc<dyn FavoritesStore>,
    caches: Arc<ExplorerCaches>,
}

impl Explorer {
    pub fn new(
        network: impl Into<String>,
        pages: Arc<dyn PageSource>,
        abis: Arc<dyn AbiSource>,
        favorites: Arc<dyn FavoritesStore>,
        caches: Arc<ExplorerCaches>,
    ) -> Self {
        Self {
            network: network.into(),
            catalog_bounds: ScanBounds::catalog_default(),
            locate_bounds: ScanBounds::locate_default(),
            pages,
            abis,
            favorites,
            caches,
        }
    }

    /// Fullnode-backed explorer with a JSON favorites file.
    pub fn from_config(config: &ExplorerConfig) -> Self {
        let client = client_from_config(config);
        Self::new(
            config.network.clone(),
            Arc::new(RpcPageSource::new(client.clone(), config.retry)),
            Arc::new(RpcAbiSource::new(client, config.retry)),
            Arc::new(JsonFileFavorites::new(&config.favorites_path)),
            Arc::new(ExplorerCaches::from_config(config)),
        )
        .with_bounds(config.catalog_scan, config.locate_scan)
    }

    pub fn with_bounds(mut self, catalog: ScanBounds, locate: ScanBounds) -> Self {
        self.catalog_bounds = catalog;
        self.locate_bounds = locate;
        self
    }

    pub fn network(&self) -> &str {
        &self.network
    }

    pub fn catalog_bounds(&self) -> ScanBounds {
        self.catalog_bounds
    }

    pub fn locate_bounds(&self) -> ScanBounds {
        self.locate_bounds
    }

    pub fn caches(&self) -> &ExplorerCaches {
        &self.caches
    }

    /// The (cached) package catalog for the configured scan bounds.
    pub async fn catalog(&self) -> ExplorerResult<Arc<PackageCatalog>> {
        let pages = self.pages.clone();
        let bounds = self.catalog_bounds;
        self.caches
            .catalog
            .get_or_fetch(bounds, move || async move {
                build_catalog(pages.as_ref(), bounds)
                    .await
                    .map(Arc::new)
                    .map_err(ExplorerError::from)
            })
            .await
    }

    /// Drop the cached catalog so the next listing rescans.
    pub fn refresh_catalog(&self) {
        self.caches.catalog.invalidate(&self.catalog_bounds);
    }

    /// Catalog entries marked, filtered and sorted per `query`, using the
    /// favorites saved for this network.
    pub async fn list_packages(&self, query: &ListQuery) -> ExplorerResult<Vec<PackageCatalogEntry>> {
        let favorites = self
            .favorites
            .ids_for_network(&self.network)
            .map_err(ExplorerError::favorites)?;
        self.list_packages_with(query, &favorites).await
    }

    /// Same as [`Explorer::list_packages`] with an explicit favorite set.
    ///
    /// Function names only match for packages whose ABI view is already
    /// cached; listing never fetches ABIs.
    pub async fn list_packages_with(
        &self,
        query: &ListQuery,
        favorites: &HashSet<String>,
    ) -> ExplorerResult<Vec<PackageCatalogEntry>> {
        let catalog = self.catalog().await?;
        let needle = SearchNeedle::new(&query.search);

        let mut entries: Vec<PackageCatalogEntry> = catalog
            .entries()
            .filter(|entry| {
                let abi = self.caches.abi.peek(&entry.package_id);
                let function_names = abi.iter().flat_map(|view| view.function_names());
                needle.matches(entry, function_names)
            })
            .cloned()
            .collect();

        mark_favorites(&mut entries, favorites);
        sort_entries(&mut entries, query.sort);
        if let Some(limit) = query.limit {
            entries.truncate(limit);
        }

        debug!(
            catalog = catalog.len(),
            matched = entries.len(),
            sort = %query.sort,
            "packages listed"
        );
        Ok(entries)
    }

    /// Publish transaction of `package_id`, if it falls inside the locate window.
    pub async fn get_publish_info(&self, package_id: &str) -> ExplorerResult<Option<PublishLocation>> {
        let package_id = canonical_package_id(package_id)?;
        let pages = self.pages.clone();
        let bounds = self.locate_bounds;
        let target = package_id.clone();
        self.caches
            .publish
            .get_or_fetch((package_id, bounds), move || async move {
                locate_publish(pages.as_ref(), &target, bounds)
                    .await
                    .map_err(ExplorerError::from)
            })
            .await
    }

    pub async fn get_abi_view(&self, package_id: &str) -> ExplorerResult<Arc<AbiView>> {
        let package_id = canonical_package_id(package_id)?;
        let abis = self.abis.clone();
        let id = package_id.clone();
        self.caches
            .abi
            .get_or_fetch(package_id, move || async move {
                let abi = abis
                    .normalized_modules(&id)
                    .await
                    .map_err(|e| ExplorerError::abi_fetch(&id, e))?;
                let view = AbiView::new(&id, &abi);
                debug!(
                    package = %id,
                    modules = view.summary.module_count,
                    functions = view.summary.function_count,
                    structs = view.summary.struct_count,
                    "ABI normalized"
                );
                Ok::<_, ExplorerError>(Arc::new(view))
            })
            .await
    }

    /// Save `package_id` to favorites with counts from its ABI view.
    pub async fn save_package(
        &self,
        package_id: &str,
        note: Option<String>,
    ) -> ExplorerResult<SavedPackage> {
        let view = self.get_abi_view(package_id).await?;
        let saved = SavedPackage {
            package_id: view.package_id.clone(),
            network: self.network.clone(),
            module_count: view.summary.module_count,
            function_count: view.summary.function_count,
            struct_count: view.summary.struct_count,
            note: note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
            saved_at: Utc::now(),
        };
        self.favorites
            .save(saved.clone())
            .map_err(ExplorerError::favorites)?;
        info!(package = %saved.package_id, network = %saved.network, "package saved");
        Ok(saved)
    }

    pub fn unsave_package(&self, package_id: &str) -> ExplorerResult<bool> {
        let package_id = canonical_package_id(package_id)?;
        self.favorites
            .remove(&package_id)
            .map_err(ExplorerError::favorites)
    }

    /// Every saved package, across networks, most recent first.
    pub fn favorites(&self) -> ExplorerResult<Vec<SavedPackage>> {
        self.favorites.list().map_err(ExplorerError::favorites)
    }
}

/// Canonical form of a user-supplied package id.
pub fn canonical_package_id(package_id: &str) -> ExplorerResult<String> {
    normalize_address_checked(package_id)
        .ok_or_else(|| ExplorerError::InvalidPackageId(package_id.trim().to_string()))
}
