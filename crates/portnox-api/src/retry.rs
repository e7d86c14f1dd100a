//! Bounded retry with exponential backoff for rate-limited calls.
//!
//! Only HTTP 429 is retried. Every other failure, transport errors
//! included, is returned to the caller on the first occurrence.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, warn};

use crate::error::Error;

/// Retry policy shared by every verb/endpoint combination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of calls allowed, including the first. Clamped to 1.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubled for each attempt after.
    pub base_interval: Duration,
    /// Upper bound (exclusive) of the uniform jitter added to each delay.
    pub max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_interval: Duration::from_secs(1),
            max_jitter: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_interval: Duration) -> Self {
        Self {
            max_attempts,
            base_interval,
            ..Self::default()
        }
    }

    /// Override the jitter bound. Tests use `Duration::ZERO`.
    pub fn with_max_jitter(mut self, max_jitter: Duration) -> Self {
        self.max_jitter = max_jitter;
        self
    }

    /// Backoff without jitter: `base_interval * 2^(attempt-1)`.
    ///
    /// `attempt` is 1-based and names the attempt that just failed.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1);
        self.base_interval
            .saturating_mul(2_u32.saturating_pow(exponent))
    }

    /// Backoff plus a uniformly random jitter in `[0, max_jitter)`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let jitter = if self.max_jitter.is_zero() {
            Duration::ZERO
        } else {
            self.max_jitter.mul_f64(rand::thread_rng().r#gen::<f64>())
        };
        self.backoff(attempt).saturating_add(jitter)
    }
}

/// Run `op` until it succeeds, fails with a non-429 error, or the
/// policy's attempts are exhausted.
///
/// `op` receives the 1-based attempt number. The sleep between attempts
/// is awaited inline, so attempts of one call never overlap.
pub async fn with_backoff<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, Error>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, Error>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt: u32 = 1;

    loop {
        debug!(attempt, max_attempts, "sending request");
        match op(attempt).await {
            Ok(value) => {
                debug!(attempt, "request succeeded");
                return Ok(value);
            }
            Err(err) if err.is_rate_limited() && attempt < max_attempts => {
                let delay = policy.delay_for(attempt);
                warn!(
                    attempt,
                    max_attempts,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "received 429 Too Many Requests, backing off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => {
                if err.is_rate_limited() {
                    warn!(attempt, "rate limited on final attempt, giving up");
                } else {
                    debug!(attempt, error = %err, "non-retryable error");
                }
                return Err(err);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::Cell;

    use tokio::time::Instant;

    use super::*;

    fn rate_limited() -> Error {
        Error::RateLimited {
            body: String::new(),
        }
    }

    fn server_error() -> Error {
        Error::RequestFailed {
            status: 500,
            reason: "Internal Server Error".into(),
            body: String::new(),
        }
    }

    #[test]
    fn backoff_doubles_per_attempt() {
        let policy = RetryPolicy::new(5, Duration::from_secs(1));
        assert_eq!(policy.backoff(1), Duration::from_secs(1));
        assert_eq!(policy.backoff(2), Duration::from_secs(2));
        assert_eq!(policy.backoff(3), Duration::from_secs(4));
        assert_eq!(policy.backoff(4), Duration::from_secs(8));
    }

    #[test]
    fn jitter_stays_below_bound() {
        let policy = RetryPolicy::new(5, Duration::from_secs(2));
        for _ in 0..100 {
            let delay = policy.delay_for(1);
            assert!(delay >= Duration::from_secs(2));
            assert!(delay < Duration::from_secs(3), "delay {delay:?} too large");
        }
    }

    #[test]
    fn huge_attempt_numbers_saturate() {
        let policy = RetryPolicy::new(u32::MAX, Duration::from_secs(1));
        assert_eq!(
            policy.backoff(200),
            Duration::from_secs(u64::from(u32::MAX))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn retries_rate_limits_then_succeeds() {
        let policy = RetryPolicy::new(5, Duration::from_secs(1));
        let calls = Cell::new(0_u32);
        let started = Instant::now();

        let result = with_backoff(&policy, |_| {
            calls.set(calls.get() + 1);
            let n = calls.get();
            async move { if n <= 3 { Err(rate_limited()) } else { Ok(n) } }
        })
        .await;

        assert_eq!(result.unwrap(), 4);
        assert_eq!(calls.get(), 4);
        assert!(
            started.elapsed() >= Duration::from_secs(7),
            "slept only {:?}",
            started.elapsed()
        );
        // Three jitters, each under one second.
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn non_rate_limit_error_is_terminal() {
        let policy = RetryPolicy::new(5, Duration::from_secs(1));
        let calls = Cell::new(0_u32);
        let started = Instant::now();

        let result: Result<(), Error> = with_backoff(&policy, |_| {
            calls.set(calls.get() + 1);
            async { Err(server_error()) }
        })
        .await;

        assert!(matches!(result, Err(Error::RequestFailed { status: 500, .. })));
        assert_eq!(calls.get(), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn exhaustion_returns_last_error() {
        let policy = RetryPolicy::new(3, Duration::from_secs(1)).with_max_jitter(Duration::ZERO);
        let calls = Cell::new(0_u32);
        let started = Instant::now();

        let result: Result<(), Error> = with_backoff(&policy, |attempt| {
            calls.set(calls.get() + 1);
            async move {
                Err(Error::RateLimited {
                    body: format!("attempt {attempt}"),
                })
            }
        })
        .await;

        match result {
            Err(Error::RateLimited { body }) => assert_eq!(body, "attempt 3"),
            other => panic!("expected RateLimited, got {other:?}"),
        }
        assert_eq!(calls.get(), 3);
        assert_eq!(started.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_attempts_still_calls_once() {
        let policy = RetryPolicy::new(0, Duration::from_secs(1));
        let calls = Cell::new(0_u32);

        let result = with_backoff(&policy, |_| {
            calls.set(calls.get() + 1);
            async { Ok::<_, Error>(()) }
        })
        .await;

        assert!(result.is_ok());
        assert_eq!(calls.get(), 1);
    }
}
