use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use super::errors::StoreApiError;

/// How [`FakeStoreApi`](super::FakeStoreApi) retries a failed GET.
///
/// Only transient failures are retried. The wait doubles from
/// `initial_backoff` on every retry, unless the server sent Retry-After,
/// and never exceeds `max_backoff`.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3)
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(10),
        }
    }

    pub fn no_retry() -> Self {
        Self::new(0)
    }

    pub fn with_backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.initial_backoff = initial;
        self.max_backoff = max;
        self
    }

    /// Wait before retry number `retry` (starting at 1) after `error`, or
    /// `None` when the error should be returned to the caller.
    pub fn backoff(&self, retry: u32, error: &StoreApiError) -> Option<Duration> {
        if retry == 0 || retry > self.max_retries || !error.is_transient() {
            return None;
        }
        let wait = match error.retry_after() {
            Some(seconds) => Duration::from_secs(seconds),
            None => self
                .initial_backoff
                .saturating_mul(2_u32.saturating_pow(retry - 1)),
        };
        Some(wait.min(self.max_backoff))
    }

    /// Issue `request` until it succeeds or [`backoff`](Self::backoff) gives up.
    pub async fn execute<F, Fut, T>(
        &self,
        operation: &str,
        mut request: F,
    ) -> Result<T, StoreApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, StoreApiError>>,
    {
        let mut retry = 0;
        loop {
            let error = match request().await {
                Ok(value) => {
                    if retry > 0 {
                        debug!("[{}] Succeeded on retry {}", operation, retry);
                    }
                    return Ok(value);
                }
                Err(error) => error,
            };

            retry += 1;
            let Some(wait) = self.backoff(retry, &error) else {
                if retry > 1 {
                    warn!("[{}] Giving up after {} attempts: {}", operation, retry, error);
                }
                return Err(error);
            };
            debug!(
                "[{}] {}; retry {}/{} in {:?}",
                operation, error, retry, self.max_retries, wait
            );
            sleep(wait).await;
        }
    }
}
