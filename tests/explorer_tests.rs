//! Explorer behavior over synthetic page and ABI sources.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::Poll;
use std::time::Duration;
use sui_explorer_types::normalize_address;
use sui_package_discovery::test_utils::{SyntheticPageSource, TxRecordBuilder};
use sui_package_discovery::ScanBounds;
use sui_package_explorer::{
    AbiSource, CacheState, Explorer, ExplorerCaches, ExplorerError, FavoritesStore,
    InMemoryFavorites, JsonFileFavorites, ListQuery, SortMode,
};
use sui_package_extractor::{parse_package_abi, PackageAbi};

/// ABIs by canonical package id; anything else is "not found".
#[derive(Default)]
struct StaticAbiSource {
    packages: Vec<(String, Value)>,
    calls: AtomicUsize,
}

impl StaticAbiSource {
    fn with(mut self, package_id: &str, abi: Value) -> Self {
        self.packages.push((normalize_address(package_id), abi));
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AbiSource for StaticAbiSource {
    async fn normalized_modules(&self, package_id: &str) -> Result<PackageAbi> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let value = self
            .packages
            .iter()
            .find(|(id, _)| id == package_id)
            .map(|(_, abi)| abi.clone())
            .ok_or_else(|| anyhow!("JSON-RPC error -32602: package {} not found", package_id))?;
        parse_package_abi(value)
    }
}

fn pool_abi() -> Value {
    json!({
        "pool": {
            "structs": {
                "Pool": {
                    "abilities": {"abilities": ["Key"]},
                    "typeParameters": [
                        {"constraints": {"abilities": []}, "isPhantom": true},
                        {"constraints": {"abilities": []}, "isPhantom": true}
                    ],
                    "fields": [{"name": "id", "type": {"Struct": {
                        "address": "0x2", "module": "object", "name": "UID", "typeArguments": []
                    }}}]
                }
            },
            "exposedFunctions": {
                "swap_exact_in": {
                    "visibility": "Public",
                    "isEntry": true,
                    "typeParameters": [{"abilities": []}, {"abilities": []}],
                    "parameters": [{"MutableReference": {"Struct": {
                        "address": "0xa", "module": "pool", "name": "Pool",
                        "typeArguments": [{"TypeParameter": 0}, {"TypeParameter": 1}]
                    }}}, "U64"],
                    "return": []
                }
            }
        },
        "math": {
            "exposedFunctions": {
                "mul_div": {"visibility": "Public", "isEntry": false, "parameters": ["U64", "U64", "U64"], "return": ["U64"]}
            }
        }
    })
}

/// Three packages over two pages; 0xa is republished (older copy on page 2).
fn three_package_log() -> SyntheticPageSource {
    SyntheticPageSource::new(vec![
        vec![
            TxRecordBuilder::new("T1").timestamp(3_000).published("0xa", &["pool", "math"]).build(),
            TxRecordBuilder::new("T2").timestamp(2_000).published("0xb", &["coin"]).build(),
        ],
        vec![
            TxRecordBuilder::new("T3").timestamp(1_500).published("0xa", &["pool"]).build(),
            TxRecordBuilder::new("T4").timestamp(4_000).published("0xc", &[]).build(),
        ],
    ])
}

struct Fixture {
    pages: Arc<SyntheticPageSource>,
    abis: Arc<StaticAbiSource>,
    favorites: Arc<InMemoryFavorites>,
    explorer: Explorer,
}

fn fixture(pages: SyntheticPageSource) -> Fixture {
    let pages = Arc::new(pages);
    let abis = Arc::new(StaticAbiSource::default().with("0xa", pool_abi()));
    let favorites = Arc::new(InMemoryFavorites::new());
    let caches = Arc::new(ExplorerCaches::new(
        Duration::from_secs(60),
        Duration::from_secs(300),
    ));
    let explorer = Explorer::new(
        "testnet",
        pages.clone(),
        abis.clone(),
        favorites.clone(),
        caches,
    )
    .with_bounds(ScanBounds::new(10, 10), ScanBounds::new(10, 10));
    Fixture {
        pages,
        abis,
        favorites,
        explorer,
    }
}

fn ids(entries: &[sui_explorer_types::PackageCatalogEntry]) -> Vec<String> {
    entries.iter().map(|e| e.package_id.clone()).collect()
}

#[tokio::test]
async fn single_package_published_twice_keeps_latest() {
    let pages = SyntheticPageSource::new(vec![
        vec![TxRecordBuilder::new("NEW").timestamp(1_000).published("0x1", &["m"]).build()],
        vec![TxRecordBuilder::new("OLD").timestamp(500).published("0x1", &["m"]).build()],
    ]);
    let f = fixture(pages);

    let entries = f.explorer.list_packages(&ListQuery::default()).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].package_id, normalize_address("0x1"));
    assert_eq!(entries[0].last_updated_ms, 1_000);
    assert_eq!(f.pages.requests()[1].cursor.as_deref(), Some("c1"));
}

#[tokio::test]
async fn sort_modes() {
    let f = fixture(three_package_log());

    let recent = f
        .explorer
        .list_packages(&ListQuery::new("", SortMode::Recent))
        .await
        .unwrap();
    assert_eq!(
        ids(&recent),
        vec![normalize_address("0xc"), normalize_address("0xa"), normalize_address("0xb")]
    );

    // Catalog order: first observed first.
    let popular = f
        .explorer
        .list_packages(&ListQuery::new("", SortMode::Popular))
        .await
        .unwrap();
    assert_eq!(
        ids(&popular),
        vec![normalize_address("0xa"), normalize_address("0xb"), normalize_address("0xc")]
    );

    let limited = f
        .explorer
        .list_packages(&ListQuery::new("", SortMode::Recent).with_limit(1))
        .await
        .unwrap();
    assert_eq!(limited.len(), 1);

    // One scan served every listing.
    assert_eq!(f.pages.fetch_count(), 2);
}

#[tokio::test]
async fn concurrent_listings_share_one_scan() {
    let f = fixture(three_package_log().yielding());
    let query = ListQuery::default();

    let (a, b) = tokio::join!(
        f.explorer.list_packages(&query),
        f.explorer.list_packages(&query)
    );

    assert_eq!(a.unwrap(), b.unwrap());
    assert_eq!(f.pages.fetch_count(), 2);
}

#[tokio::test]
async fn abandoned_listing_stops_fetching_pages() {
    let f = fixture(SyntheticPageSource::uniform(50, 2).yielding());
    let explorer = f
        .explorer
        .with_bounds(ScanBounds::new(2, 50), ScanBounds::new(2, 50));
    let bounds = explorer.catalog_bounds();
    let query = ListQuery::default();

    let mut polls = 0;
    tokio::select! {
        biased;
        _ = explorer.list_packages(&query) => panic!("listing finished before it was abandoned"),
        _ = std::future::poll_fn(|cx| {
            polls += 1;
            if polls > 5 {
                Poll::Ready(())
            } else {
                cx.waker().wake_by_ref();
                Poll::Pending
            }
        }) => {}
    }

    let at_cancel = f.pages.fetch_count();
    assert!(at_cancel > 0 && at_cancel < 50, "fetched {at_cancel} pages");
    for _ in 0..50 {
        tokio::task::yield_now().await;
    }
    assert_eq!(f.pages.fetch_count(), at_cancel);
    assert_eq!(explorer.caches().catalog().state(&bounds), CacheState::Missing);
    assert!(explorer.caches().catalog().peek(&bounds).is_none());
}

#[tokio::test(start_paused = true)]
async fn catalog_is_rescanned_once_stale() {
    let f = fixture(three_package_log());
    let bounds = f.explorer.catalog_bounds();

    f.explorer.list_packages(&ListQuery::default()).await.unwrap();
    tokio::time::advance(Duration::from_secs(59)).await;
    f.explorer.list_packages(&ListQuery::default()).await.unwrap();
    assert_eq!(f.pages.fetch_count(), 2);

    tokio::time::advance(Duration::from_secs(2)).await;
    assert_eq!(f.explorer.caches().catalog().state(&bounds), CacheState::Stale);
    f.explorer.list_packages(&ListQuery::default()).await.unwrap();
    assert_eq!(f.pages.fetch_count(), 4);

    f.explorer.refresh_catalog();
    f.explorer.list_packages(&ListQuery::default()).await.unwrap();
    assert_eq!(f.pages.fetch_count(), 6);
}

#[tokio::test]
async fn search_matches_ids_modules_and_cached_functions() {
    let f = fixture(three_package_log());

    let by_module = f
        .explorer
        .list_packages(&ListQuery::new("COIN", SortMode::Recent))
        .await
        .unwrap();
    assert_eq!(ids(&by_module), vec![normalize_address("0xb")]);

    let by_id = f
        .explorer
        .list_packages(&ListQuery::new("00c", SortMode::Recent))
        .await
        .unwrap();
    assert_eq!(ids(&by_id), vec![normalize_address("0xc")]);

    // Function names are searchable only once the ABI view is cached.
    let before = f
        .explorer
        .list_packages(&ListQuery::new("swap_exact", SortMode::Recent))
        .await
        .unwrap();
    assert!(before.is_empty());
    assert_eq!(f.abis.calls(), 0);

    f.explorer.get_abi_view("0xa").await.unwrap();
    let after = f
        .explorer
        .list_packages(&ListQuery::new("swap_exact", SortMode::Recent))
        .await
        .unwrap();
    assert_eq!(ids(&after), vec![normalize_address("0xa")]);
    assert_eq!(f.abis.calls(), 1);
}

#[tokio::test]
async fn explicit_favorite_set_marks_and_filters() {
    let f = fixture(three_package_log());
    let favorites: HashSet<String> = [normalize_address("0xa"), normalize_address("0xb")]
        .into_iter()
        .collect();

    let entries = f
        .explorer
        .list_packages_with(&ListQuery::new("", SortMode::Favorites), &favorites)
        .await
        .unwrap();
    assert_eq!(
        ids(&entries),
        vec![normalize_address("0xa"), normalize_address("0xb")]
    );
    assert!(entries.iter().all(|e| e.is_favorite));
}

#[tokio::test]
async fn abi_view_is_sorted_and_cached() {
    let f = fixture(three_package_log());

    let view = f.explorer.get_abi_view("0xA").await.unwrap();
    assert_eq!(view.module_names, vec!["math", "pool"]);
    let names: Vec<String> = view.functions.iter().map(|f| f.qualified_name()).collect();
    assert_eq!(names, vec!["math::mul_div", "pool::swap_exact_in"]);
    assert_eq!(
        view.functions[1].params,
        vec!["&mut 0xa::pool::Pool<T0, T1>", "u64"]
    );
    assert_eq!(view.structs[0].type_params, vec!["phantom", "phantom"]);
    assert_eq!(view.structs[0].fields, vec!["id: 0x2::object::UID"]);
    assert_eq!(view.display_name(), "math (module)");

    let again = f
        .explorer
        .get_abi_view(&normalize_address("0xa"))
        .await
        .unwrap();
    assert!(Arc::ptr_eq(&view, &again));
    assert_eq!(f.abis.calls(), 1);
}

#[tokio::test]
async fn abi_failure_is_surfaced_and_not_cached() {
    let f = fixture(three_package_log());

    for _ in 0..2 {
        let err = f.explorer.get_abi_view("0xdead").await.unwrap_err();
        match &err {
            ExplorerError::AbiFetch { package_id, .. } => {
                assert_eq!(package_id, &normalize_address("0xdead"))
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("not found"));
    }
    assert_eq!(f.abis.calls(), 2);
}

#[tokio::test]
async fn invalid_package_id_is_rejected_without_io() {
    let f = fixture(three_package_log());

    assert!(matches!(
        f.explorer.get_abi_view("pool").await,
        Err(ExplorerError::InvalidPackageId(_))
    ));
    assert!(matches!(
        f.explorer.get_publish_info("0xzz").await,
        Err(ExplorerError::InvalidPackageId(_))
    ));
    assert_eq!(f.abis.calls(), 0);
    assert_eq!(f.pages.fetch_count(), 0);
}

#[tokio::test]
async fn publish_info_found_and_absent() {
    let f = fixture(three_package_log());

    let found = f.explorer.get_publish_info("0xb").await.unwrap().unwrap();
    assert_eq!(found.tx_digest, "T2");
    assert_eq!(found.timestamp_ms, 2_000);
    assert_eq!(f.pages.fetch_count(), 1);

    assert_eq!(f.explorer.get_publish_info("0xbeef").await.unwrap(), None);
    assert_eq!(f.pages.fetch_count(), 3);

    // Absence is cached like any other result.
    assert_eq!(f.explorer.get_publish_info("0xbeef").await.unwrap(), None);
    assert_eq!(f.pages.fetch_count(), 3);
}

#[tokio::test]
async fn page_failure_surfaces_as_discovery_error() {
    let f = fixture(three_package_log().failing_at(1));

    let err = f
        .explorer
        .list_packages(&ListQuery::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ExplorerError::Discovery(_)));

    // Nothing cached, so the next call scans again.
    let _ = f.explorer.list_packages(&ListQuery::default()).await;
    assert_eq!(f.pages.fetch_count(), 4);
}

#[tokio::test]
async fn save_package_records_counts_and_drives_favorites_sort() {
    let f = fixture(three_package_log());

    let saved = f
        .explorer
        .save_package("0xa", Some("  main pool  ".to_string()))
        .await
        .unwrap();
    assert_eq!(saved.package_id, normalize_address("0xa"));
    assert_eq!(saved.network, "testnet");
    assert_eq!(
        (saved.module_count, saved.function_count, saved.struct_count),
        (2, 2, 1)
    );
    assert_eq!(saved.note.as_deref(), Some("main pool"));
    assert!(f.favorites.contains(&saved.package_id).unwrap());

    let favorites = f
        .explorer
        .list_packages(&ListQuery::new("", SortMode::Favorites))
        .await
        .unwrap();
    assert_eq!(ids(&favorites), vec![normalize_address("0xa")]);

    assert!(f.explorer.unsave_package("0xa").unwrap());
    let favorites = f
        .explorer
        .list_packages(&ListQuery::new("", SortMode::Favorites))
        .await
        .unwrap();
    assert!(favorites.is_empty());
}

#[tokio::test]
async fn saving_an_unknown_package_fails() {
    let f = fixture(three_package_log());
    assert!(f.explorer.save_package("0xdead", None).await.is_err());
    assert!(f.explorer.favorites().unwrap().is_empty());
}

#[tokio::test]
async fn favorites_persist_in_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("favorites.json");
    let caches = Arc::new(ExplorerCaches::new(
        Duration::from_secs(60),
        Duration::from_secs(300),
    ));
    let abis = Arc::new(StaticAbiSource::default().with("0xa", pool_abi()));

    let explorer = Explorer::new(
        "mainnet",
        Arc::new(three_package_log()),
        abis.clone(),
        Arc::new(JsonFileFavorites::new(&path)),
        caches.clone(),
    );
    explorer.save_package("0xa", None).await.unwrap();

    // A fresh store on the same file sees the saved package.
    let reopened = Explorer::new(
        "mainnet",
        Arc::new(three_package_log()),
        abis,
        Arc::new(JsonFileFavorites::new(&path)),
        caches,
    );
    let saved = reopened.favorites().unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].network, "mainnet");
}
