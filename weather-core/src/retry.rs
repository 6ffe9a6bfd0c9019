//! Fixed-delay retry around a single backend request.
//!
//! Every failed attempt waits the same delay before the next one. There is no
//! jitter and no growth.

use std::future::Future;
use std::time::Duration;

use crate::error::FetchError;

pub const DEFAULT_RETRIES: u32 = 3;
pub const DEFAULT_DELAY_MS: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one fails.
    pub retries: u32,
    /// Pause before each retry.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: DEFAULT_RETRIES,
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    pub fn new(retries: u32, delay_ms: u64) -> Self {
        Self {
            retries,
            delay: Duration::from_millis(delay_ms),
        }
    }

    /// Total number of times the request may be sent.
    pub fn max_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }
}

/// Run `operation` until it succeeds or the policy's budget is spent.
///
/// Errors that are not retryable (see [`FetchError::is_retryable`]) are
/// returned as-is on the attempt that produced them. Once the budget is gone
/// the last error is wrapped in [`FetchError::Exhausted`].
pub async fn fetch_with_retry<T, F, Fut>(policy: RetryPolicy, mut operation: F) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let max_attempts = policy.max_attempts();
    let mut attempt = 0;

    loop {
        attempt += 1;

        let err = match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    tracing::info!("Request succeeded on attempt {attempt} of {max_attempts}");
                }
                return Ok(value);
            }
            Err(err) => err,
        };

        if !err.is_retryable() {
            tracing::debug!("Non-retryable error: {err}");
            return Err(err);
        }

        if attempt >= max_attempts {
            tracing::error!("All {max_attempts} attempts failed, last error: {err}");
            return Err(FetchError::Exhausted {
                attempts: attempt,
                last: Box::new(err),
            });
        }

        tracing::warn!(
            "Attempt {attempt} of {max_attempts} failed: {err}; retrying in {:?}",
            policy.delay
        );
        tokio::time::sleep(policy.delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn server_error() -> FetchError {
        FetchError::Http {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: String::new(),
        }
    }

    #[test]
    fn default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.retries, 3);
        assert_eq!(policy.delay, Duration::from_millis(1000));
        assert_eq!(policy.max_attempts(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn always_failing_request_is_sent_four_times() {
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = fetch_with_retry(RetryPolicy::new(3, 1000), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(server_error()) }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 4);
        match result {
            Err(FetchError::Exhausted { attempts, last }) => {
                assert_eq!(attempts, 4);
                assert!(matches!(*last, FetchError::Http { .. }));
            }
            other => panic!("expected Exhausted, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn waits_fixed_delay_between_attempts() {
        let start = tokio::time::Instant::now();

        let _: Result<(), _> =
            fetch_with_retry(RetryPolicy::new(2, 1000), || async { Err(server_error()) }).await;

        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(2000));
        assert!(elapsed < Duration::from_millis(3000));
    }

    #[tokio::test(start_paused = true)]
    async fn recovers_after_transient_failures() {
        let calls = AtomicU32::new(0);

        let result = fetch_with_retry(RetryPolicy::default(), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move { if n < 2 { Err(server_error()) } else { Ok(n) } }
        })
        .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn parse_errors_are_not_retried() {
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = fetch_with_retry(RetryPolicy::new(3, 0), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(FetchError::Parse("missing field `Location`".into())) }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(FetchError::Parse(_))));
    }

    #[tokio::test]
    async fn zero_retries_sends_once() {
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = fetch_with_retry(RetryPolicy::new(0, 0), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(server_error()) }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(FetchError::Exhausted { attempts: 1, .. })));
    }
}
