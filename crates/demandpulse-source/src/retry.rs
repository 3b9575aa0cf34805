//! Retry with exponential backoff for transient search-service errors.

use std::future::Future;
use std::time::Duration;

use crate::error::SourceError;

/// Returns `true` if `err` represents a transient condition that should be
/// retried after a backoff delay.
///
/// Retriable: [`SourceError::RateLimited`] (the service asked us to back off)
/// and [`SourceError::Http`] (connection reset, timeout). Everything else is
/// propagated immediately; retrying a 404 or a parse failure returns the same
/// result.
fn is_retriable(err: &SourceError) -> bool {
    matches!(
        err,
        SourceError::RateLimited { .. } | SourceError::Http(_)
    )
}

/// Executes `operation` with exponential backoff retries on transient errors.
///
/// On a retriable error the function sleeps for `backoff_base_secs * 2^attempt`
/// seconds and tries again, up to `max_retries` additional attempts after the
/// first try. If all retries are exhausted the last error is returned.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, SourceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SourceError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                err
            }
        };

        // Exponential backoff: base * 2^attempt seconds, shift capped to
        // prevent overflow on extreme configs.
        let delay_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %err,
            "transient source error — retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}
