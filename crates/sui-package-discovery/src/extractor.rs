//! Publish events out of transaction pages.
//!
//! Only object changes of type `published` matter here. Anything that does
//! not look like one (no `type`, no `packageId`, a non-object entry) is
//! skipped without failing the page.

use serde_json::Value;
use sui_explorer_types::address::canonical_or_verbatim;
use sui_explorer_types::{PublishEvent, TransactionPage, TxRecord};
use tracing::trace;

const PUBLISHED: &str = "published";

/// Publish events of a page, in page order.
pub fn extract_publish_events(page: &TransactionPage) -> impl Iterator<Item = PublishEvent> + '_ {
    page.data.iter().flat_map(publish_events_in)
}

/// Publish events of one transaction. A missing timestamp counts as 0.
pub fn publish_events_in(tx: &TxRecord) -> impl Iterator<Item = PublishEvent> + '_ {
    let timestamp_ms = tx.timestamp_ms.unwrap_or(0);
    tx.object_changes
        .iter()
        .filter_map(move |change| published_event(change, timestamp_ms, &tx.digest))
}

fn published_event(change: &Value, timestamp_ms: u64, digest: &str) -> Option<PublishEvent> {
    if change.get("type").and_then(Value::as_str) != Some(PUBLISHED) {
        return None;
    }

    let package_id = match change.get("packageId").and_then(Value::as_str) {
        Some(id) if !id.trim().is_empty() => canonical_or_verbatim(id),
        _ => {
            trace!(tx = digest, "published change without packageId skipped");
            return None;
        }
    };

    let module_names = match change.get("modules") {
        Some(Value::Array(modules)) => modules
            .iter()
            .filter_map(Value::as_str)
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    };

    Some(PublishEvent {
        package_id,
        module_names,
        timestamp_ms,
        tx_digest: digest.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{published_change, TxRecordBuilder};
    use serde_json::json;

    #[test]
    fn test_only_published_changes_are_extracted() {
        let tx = TxRecordBuilder::new("D1")
            .timestamp(1_000)
            .change(json!({"type": "created", "objectId": "0x5"}))
            .published("0xa", &["pool", "math"])
            .change(json!({"type": "mutated", "objectId": "0x6"}))
            .build();

        let events: Vec<PublishEvent> = publish_events_in(&tx).collect();
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].package_id,
            "0x000000000000000000000000000000000000000000000000000000000000000a"
        );
        assert_eq!(events[0].module_names, vec!["pool", "math"]);
        assert_eq!(events[0].timestamp_ms, 1_000);
        assert_eq!(events[0].tx_digest, "D1");
    }

    #[test]
    fn test_malformed_changes_are_skipped() {
        let tx = TxRecordBuilder::new("D2")
            .timestamp(7)
            .change(json!("garbage"))
            .change(json!({"type": "published"}))
            .change(json!({"type": "published", "packageId": 12}))
            .change(json!({"type": "published", "packageId": "0xb", "modules": "nope"}))
            .build();

        let events: Vec<PublishEvent> = publish_events_in(&tx).collect();
        assert_eq!(events.len(), 1);
        assert!(events[0].module_names.is_empty());
    }

    #[test]
    fn test_missing_timestamp_counts_as_zero() {
        let tx = TxRecordBuilder::new("D3").published("0xc", &["m"]).build();
        let events: Vec<PublishEvent> = publish_events_in(&tx).collect();
        assert_eq!(events[0].timestamp_ms, 0);
    }

    #[test]
    fn test_page_order_is_preserved() {
        let page = TransactionPage::new(
            vec![
                TxRecordBuilder::new("N").timestamp(30).published("0x1", &[]).build(),
                TxRecordBuilder::new("M")
                    .timestamp(20)
                    .change(published_change("0x2", &["a"]))
                    .change(published_change("0x3", &["b"]))
                    .build(),
            ],
            None,
        );
        let digests: Vec<String> = extract_publish_events(&page)
            .map(|e| format!("{}:{}", e.tx_digest, e.module_names.join(",")))
            .collect();
        assert_eq!(digests, vec!["N:", "M:a", "M:b"]);
    }

    #[test]
    fn test_non_hex_package_id_kept_verbatim() {
        let tx = TxRecordBuilder::new("D4")
            .timestamp(1)
            .published("not-a-hex-id", &[])
            .build();
        let events: Vec<PublishEvent> = publish_events_in(&tx).collect();
        assert_eq!(events[0].package_id, "not-a-hex-id");
    }
}
