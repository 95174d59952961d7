//! Async testing utilities
//!
//! Waits on scheduled task runs without sleeping for a fixed amount of time.

use std::future::Future;
use std::time::Duration;

/// Poll an async condition until it returns true or times out
///
/// Returns `false` when `timeout` passes without the condition holding.
pub async fn poll_until<F, Fut>(timeout: Duration, interval: Duration, mut condition: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let start = std::time::Instant::now();

    while start.elapsed() < timeout {
        if condition().await {
            return true;
        }
        tokio::time::sleep(interval).await;
    }

    false
}
