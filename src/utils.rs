use anyhow::Result;
use std::future::Future;
use sui_explorer_types::RetryConfig;
use tracing::warn;

/// Whether an RPC failure looks transient (rate limiting, timeouts, dropped connections).
pub fn should_retry_error(error: &anyhow::Error) -> bool {
    let s = format!("{:#}", error).to_ascii_lowercase();
    s.contains("429")
        || s.contains("too many")
        || s.contains("timed out")
        || s.contains("timeout")
        || s.contains("connection")
        || s.contains("transport")
}

/// Run `f` until it succeeds, fails with a non-transient error, or the retry
/// budget is spent. Backoff doubles up to `retry.max_backoff`.
pub async fn with_retries<T, F, Fut>(retry: RetryConfig, operation: &str, mut f: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0usize;
    let mut backoff = retry.initial_backoff;

    loop {
        match f().await {
            Ok(v) => return Ok(v),
            Err(e) => {
                if attempt >= retry.retries || !should_retry_error(&e) {
                    return Err(e);
                }
                attempt += 1;
                warn!(
                    operation,
                    attempt,
                    backoff_ms = backoff.as_millis() as u64,
                    error = %format!("{e:#}"),
                    "retrying RPC call"
                );
                tokio::time::sleep(backoff).await;
                backoff = std::cmp::min(backoff * 2, retry.max_backoff);
            }
        }
    }
}
