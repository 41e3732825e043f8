//! Retry and politeness utilities for the source client.
//!
//! Transient HTTP failures (429, network errors, 5xx) are retried with
//! exponential backoff plus jitter. Everything else, 404 included, is
//! returned immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

/// Upper bound for a single backoff sleep.
const MAX_DELAY_MS: u64 = 60_000;

/// Returns `true` if `err` represents a transient condition that should be
/// retried after a backoff delay.
///
/// Retriable errors:
/// - [`ScraperError::RateLimited`]: HTTP 429; the server has asked us to back off.
/// - [`ScraperError::Http`]: network-level failure (connection reset, timeout, etc.).
/// - [`ScraperError::UnexpectedStatus`] with a 5xx status.
///
/// Non-retriable errors (propagated immediately):
/// - [`ScraperError::NotFound`]: 404; retrying would return the same result.
/// - [`ScraperError::UnexpectedStatus`] with a 4xx status.
/// - [`ScraperError::Deserialize`]: response body does not parse.
/// - [`ScraperError::InvalidUrl`] and [`ScraperError::Io`]: local problems.
fn is_retriable(err: &ScraperError) -> bool {
    match err {
        ScraperError::RateLimited { .. } | ScraperError::Http(_) => true,
        ScraperError::UnexpectedStatus { status, .. } => *status >= 500,
        ScraperError::NotFound { .. }
        | ScraperError::Deserialize { .. }
        | ScraperError::InvalidUrl { .. }
        | ScraperError::Io { .. } => false,
    }
}

/// Executes `operation` with exponential backoff retries on transient errors.
///
/// The wait before the n-th retry is `backoff_base_secs * 2^(n-1)` seconds,
/// scaled by a random factor in `[0.75, 1.25)` and capped at 60 s. With
/// `max_retries = 2` the operation is attempted at most 3 times.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_secs
                    .saturating_mul(1000)
                    .saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient scraper error, retrying after backoff"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}

/// Randomized pause inserted before every page fetch and search submission.
#[derive(Debug, Clone, Copy, Default)]
pub struct Politeness {
    min_ms: u64,
    max_ms: u64,
}

impl Politeness {
    /// `max_ms` below `min_ms` is raised to `min_ms`.
    #[must_use]
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        Self {
            min_ms,
            max_ms: max_ms.max(min_ms),
        }
    }

    /// No delay at all; used by tests against local mock servers.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    pub(crate) fn next_delay(self) -> Duration {
        if self.max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::random_range(self.min_ms..=self.max_ms))
    }

    pub async fn pause(self) {
        let delay = self.next_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}
