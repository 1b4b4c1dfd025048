//! Bounded exponential backoff for external calls.

use crate::RetryConfig;
use std::future::Future;
use std::time::Duration;
use storycraft_error::{RetryableError, StorycraftResult};
use tokio_retry2::{Retry, RetryError, strategy::ExponentialFactorBackoff, strategy::jitter};
use tokio::time::sleep;
use tracing::{debug, warn};

/// Retry policy applied to every capability and storage call.
///
/// The first attempt runs immediately. A transient failure picks the strategy:
/// the error's own parameters when it has them (rate limiting, overload),
/// otherwise the configured defaults. Permanent failures surface at once.
///
/// `max_retries` bounds the attempts after the first one, and every retry
/// waits first. Delays double from the initial backoff, are jittered, and
/// never exceed the max delay.
///
/// # Example
///
/// ```rust
/// use storycraft_retry::RetryPolicy;
/// use storycraft_error::StorycraftResult;
///
/// # async fn example() -> StorycraftResult<()> {
/// let policy = RetryPolicy::default();
/// let answer = policy.run("text", || async { Ok::<_, storycraft_error::StorycraftError>(42) }).await?;
/// assert_eq!(answer, 42);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_getters::Getters)]
pub struct RetryPolicy {
    enabled: bool,
    initial_backoff_ms: u64,
    max_retries: usize,
    max_delay_secs: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            initial_backoff_ms: 1000,
            max_retries: 3,
            max_delay_secs: 30,
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            enabled: *config.enabled(),
            initial_backoff_ms: *config.initial_backoff_ms(),
            max_retries: *config.max_retries(),
            max_delay_secs: *config.max_delay_secs(),
        }
    }
}

impl RetryPolicy {
    /// Policy with explicit parameters.
    pub fn new(initial_backoff_ms: u64, max_retries: usize, max_delay_secs: u64) -> Self {
        Self {
            enabled: true,
            initial_backoff_ms,
            max_retries,
            max_delay_secs,
        }
    }

    /// Policy that never retries.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Execute an operation, retrying transient failures with backoff and jitter.
    ///
    /// `operation` names the call in logs.
    pub async fn run<F, Fut, T>(&self, operation: &str, action: F) -> StorycraftResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = StorycraftResult<T>>,
    {
        let first_error = match action().await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        if !self.enabled {
            return Err(first_error);
        }
        if !first_error.is_retryable() {
            debug!(operation, error = %first_error, "Permanent error, failing immediately");
            return Err(first_error);
        }

        let (initial_ms, max_retries, max_delay_secs) =
            first_error.retry_strategy_params().unwrap_or((
                self.initial_backoff_ms,
                self.max_retries,
                self.max_delay_secs,
            ));
        if max_retries == 0 {
            return Err(first_error);
        }

        warn!(
            operation,
            error = %first_error,
            initial_backoff_ms = initial_ms,
            max_retries,
            max_delay_secs,
            "Transient error, will retry with backoff"
        );

        let mut delays = backoff(initial_ms, max_retries, max_delay_secs);
        // Retry::spawn attempts before its first delay, so the first wait happens here
        let Some(first_delay) = delays.next() else {
            return Err(first_error);
        };
        sleep(first_delay).await;

        Retry::spawn(delays, || async {
            match action().await {
                Ok(value) => Ok(value),
                Err(e) => {
                    if e.is_retryable() {
                        warn!(operation, error = %e, "Transient error, will retry");
                        Err(RetryError::Transient {
                            err: e,
                            retry_after: None,
                        })
                    } else {
                        warn!(operation, error = %e, "Permanent error, failing immediately");
                        Err(RetryError::Permanent(e))
                    }
                }
            }
        })
        .await
    }
}

/// Jittered exponential delays, doubling from `initial_ms` and capped at `max_delay_secs`.
fn backoff(
    initial_ms: u64,
    max_retries: usize,
    max_delay_secs: u64,
) -> impl Iterator<Item = Duration> {
    let cap = Duration::from_secs(max_delay_secs);
    ExponentialFactorBackoff::from_millis(initial_ms, 2.0)
        .max_delay(cap)
        .map(jitter)
        .map(move |delay| delay.min(cap))
        .take(max_retries)
}
