//! Retry helper for rate-limited provider calls.
//!
//! Exchanges shed load with 429-class errors; the polite response is to
//! sleep and retry rather than fail the whole batch. Only errors classified
//! [`RetryClass::WithBackoff`] are retried - missing data is terminal.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::errors::{MarketDataError, RetryClass};

const MAX_ATTEMPTS: u32 = 5;
const INITIAL_BACKOFF: Duration = Duration::from_millis(500);

/// Runs `op`, sleeping and retrying on transient errors with the delay
/// doubling between attempts.
pub async fn with_backoff<T, F, Fut>(op: F) -> Result<T, MarketDataError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, MarketDataError>>,
{
    with_backoff_config(op, MAX_ATTEMPTS, INITIAL_BACKOFF).await
}

/// [`with_backoff`] with explicit attempt count and initial delay.
pub async fn with_backoff_config<T, F, Fut>(
    mut op: F,
    max_attempts: u32,
    initial_delay: Duration,
) -> Result<T, MarketDataError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, MarketDataError>>,
{
    let mut delay = initial_delay;
    let mut attempt = 1;
    loop {
        match op().await {
            Err(e) if e.retry_class() == RetryClass::WithBackoff && attempt < max_attempts => {
                warn!(attempt, delay_ms = delay.as_millis() as u64, "transient provider error, backing off: {e}");
                tokio::time::sleep(delay).await;
                delay *= 2;
                attempt += 1;
            }
            other => return other,
        }
    }
}
