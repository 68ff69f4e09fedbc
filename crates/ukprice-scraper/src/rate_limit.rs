//! Retry policy for transient search failures.
//!
//! UK tobacconist sites are small and rate-limit aggressively; a 429 or a
//! dropped connection mid-run is routine. Transient errors retry with
//! exponential backoff; anything else (404, bad JSON, unexpected status)
//! propagates immediately since retrying returns the same answer.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

/// Retriable: the server asked us to back off, or the network failed.
fn is_retriable(err: &ScraperError) -> bool {
    matches!(
        err,
        ScraperError::RateLimited { .. } | ScraperError::Http(_)
    )
}

/// Exponential backoff retry policy.
///
/// The n-th retry sleeps `base_secs * 2^(n-1)` seconds; with `max_retries`
/// retries the operation runs at most `max_retries + 1` times.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RetryPolicy {
    pub max_retries: u32,
    pub base_secs: u64,
}

impl RetryPolicy {
    pub(crate) async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T, ScraperError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ScraperError>>,
    {
        let mut attempt = 0u32;

        loop {
            let err = match operation().await {
                Ok(value) => return Ok(value),
                Err(err) if is_retriable(&err) && attempt < self.max_retries => err,
                Err(err) => return Err(err),
            };

            // Cap the shift to keep the multiplication from overflowing.
            let delay_secs = self.base_secs.saturating_mul(1u64 << attempt.min(62));
            tracing::warn!(
                attempt,
                max_retries = self.max_retries,
                delay_secs,
                error = %err,
                "transient search error, retrying after backoff"
            );
            tokio::time::sleep(Duration::from_secs(delay_secs)).await;
            attempt += 1;
        }
    }
}
