use std::sync::Arc;
use thiserror::Error;

/// Failures of a catalog build or publish lookup.
///
/// "Package not found within the scan window" is not an error; the locator
/// returns `Ok(None)` for it.
#[derive(Debug, Clone, Error)]
pub enum DiscoveryError {
    #[error(
        "transaction page {page} fetch failed (cursor {}): {error:#}",
        .cursor.as_deref().unwrap_or("<newest>")
    )]
    PageFetch {
        /// 1-based index of the page within the scan.
        page: usize,
        cursor: Option<String>,
        error: Arc<anyhow::Error>,
    },

    #[error("invalid scan bounds: {0}")]
    InvalidBounds(String),
}

pub type DiscoveryResult<T> = Result<T, DiscoveryError>;
