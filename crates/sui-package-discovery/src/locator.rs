//! Publish transaction lookup for a single package.

use sui_explorer_types::address::canonical_or_verbatim;
use sui_explorer_types::PublishLocation;
use tracing::{debug, info};

use crate::error::DiscoveryError;
use crate::extractor::extract_publish_events;
use crate::scan::PageScan;
use crate::source::{PageSource, ScanBounds};

/// Find the transaction that published `package_id` within the newest
/// `bounds.window()` transactions.
///
/// Stops at the first match; no later page is requested. `Ok(None)` means
/// the package was not published inside the window, which is expected for
/// old packages.
pub async fn locate_publish<S: PageSource + ?Sized>(
    source: &S,
    package_id: &str,
    bounds: ScanBounds,
) -> Result<Option<PublishLocation>, DiscoveryError> {
    let target = canonical_or_verbatim(package_id);
    let mut scan = PageScan::new(source, bounds)?;

    while let Some(page) = scan.next_page().await? {
        if let Some(event) = extract_publish_events(&page).find(|e| e.package_id == target) {
            info!(
                package = %target,
                tx = %event.tx_digest,
                pages = scan.pages_fetched(),
                transactions = scan.transactions_seen(),
                found = true,
                "publish lookup finished"
            );
            return Ok(Some(PublishLocation {
                tx_digest: event.tx_digest,
                timestamp_ms: event.timestamp_ms,
            }));
        }
    }

    info!(
        package = %target,
        pages = scan.pages_fetched(),
        transactions = scan.transactions_seen(),
        found = false,
        "publish lookup finished"
    );
    debug!(package = %target, "publish transaction not within scan window");
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::SyntheticPageSource;
    use parking_lot::Mutex;
    use std::io::Write;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    fn capture_info() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        (logs, guard)
    }

    #[tokio::test]
    async fn test_lookup_logs_scan_counts_when_found() {
        let (logs, _guard) = capture_info();
        let source = SyntheticPageSource::uniform(5, 4);

        let found = locate_publish(&source, "0x6", ScanBounds::new(4, 5))
            .await
            .unwrap();
        assert!(found.is_some());

        let text = logs.text();
        assert!(text.contains("publish lookup finished"), "{text}");
        assert!(text.contains("pages=2"), "{text}");
        assert!(text.contains("transactions=8"), "{text}");
        assert!(text.contains("found=true"), "{text}");
    }

    #[tokio::test]
    async fn test_lookup_logs_scan_counts_when_absent() {
        let (logs, _guard) = capture_info();
        let source = SyntheticPageSource::uniform(5, 4);

        let found = locate_publish(&source, "0x20", ScanBounds::new(4, 3))
            .await
            .unwrap();
        assert_eq!(found, None);

        let text = logs.text();
        assert!(text.contains("pages=3"), "{text}");
        assert!(text.contains("transactions=12"), "{text}");
        assert!(text.contains("found=false"), "{text}");
    }
}
