//! Package discovery over the Sui transaction log.
//!
//! The fullnode does not index packages, so the explorer reconstructs the
//! set of recently published packages by walking the transaction log
//! backwards, page by page, and picking out `published` object changes.
//!
//! - [`source`]: the [`PageSource`] seam and [`ScanBounds`]
//! - [`scan`]: [`PageScan`], a bounded newest-first walk that can stop after any page
//! - [`extractor`]: publish events out of one page
//! - [`catalog`]: the deduplicated [`PackageCatalog`] (latest publication wins)
//! - [`locator`]: the publish transaction of a single package, if recent enough
//!
//! Neither scan is a full index: anything older than `page_size * max_pages`
//! transactions is invisible.
//!
//! # Example
//!
//! ```ignore
//! use sui_package_discovery::{build_catalog, locate_publish, ScanBounds};
//!
//! let catalog = build_catalog(&source, ScanBounds::catalog_default()).await?;
//! let location = locate_publish(&source, "0xabc", ScanBounds::locate_default()).await?;
//! ```

pub mod catalog;
pub mod error;
pub mod extractor;
pub mod locator;
pub mod scan;
pub mod source;
pub mod test_utils;

pub use catalog::{build_catalog, PackageCatalog, ScanStats};
pub use error::DiscoveryError;
pub use extractor::{extract_publish_events, publish_events_in};
pub use locator::locate_publish;
pub use scan::PageScan;
pub use source::{PageRequest, PageSource, ScanBounds};
