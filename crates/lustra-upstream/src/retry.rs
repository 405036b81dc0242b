//! Timeout retry for the upstream client.
//!
//! The retry policy is deliberately narrow: only [`UpstreamError::Timeout`]
//! is retried, with a fixed delay between attempts, and cancellation aborts
//! both the in-flight wait and any pending delay. Server errors, bad bodies,
//! and network failures propagate immediately.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::UpstreamError;

/// Runs `operation` with up to `max_retries` additional attempts after a
/// timeout. The surfaced [`UpstreamError::Timeout`] carries the total number
/// of attempts performed.
pub(crate) async fn retry_on_timeout<T, F, Fut>(
    max_retries: u32,
    delay: Duration,
    cancel: &CancellationToken,
    mut operation: F,
) -> Result<T, UpstreamError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, UpstreamError>>,
{
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        match operation().await {
            Ok(value) => return Ok(value),
            Err(UpstreamError::Timeout { url, .. }) => {
                if attempt > max_retries {
                    return Err(UpstreamError::Timeout {
                        url,
                        attempts: attempt,
                    });
                }
                if cancel.is_cancelled() {
                    return Err(UpstreamError::Cancelled);
                }
                tracing::warn!(
                    attempt,
                    max_retries,
                    url = %url,
                    "upstream timeout — retrying after fixed delay"
                );
                tokio::select! {
                    () = cancel.cancelled() => return Err(UpstreamError::Cancelled),
                    () = tokio::time::sleep(delay) => {}
                }
            }
            Err(other) => return Err(other),
        }
    }
}
