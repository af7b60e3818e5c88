use super::errors::SiteApiError;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Errors that can tell the retry executor whether another attempt makes sense.
pub trait Retryable {
    fn is_transient(&self) -> bool;
}

impl Retryable for SiteApiError {
    fn is_transient(&self) -> bool {
        SiteApiError::is_transient(self)
    }
}

/// Flat exponential backoff without jitter.
///
/// The wait before retry `n` (zero based) is
/// `initial_wait_seconds * backoff_factor^n`. With the defaults that is
/// 2, 4, 8, 16 and 32 seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_wait_seconds: f64,
    pub backoff_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_wait_seconds: 2.0,
            backoff_factor: 2.0,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, initial_wait_seconds: f64, backoff_factor: f64) -> Self {
        Self {
            max_retries,
            initial_wait_seconds,
            backoff_factor,
        }
    }

    /// Policy that never retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Wait before the retry with the given zero based index.
    pub fn delay_for(&self, attempt_index: u32) -> Duration {
        let exponent = i32::try_from(attempt_index).unwrap_or(i32::MAX);
        let seconds = self.initial_wait_seconds * self.backoff_factor.powi(exponent);
        Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX)
    }

    /// The full wait schedule for a call that never stops failing.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        (0..self.max_retries).map(|attempt| self.delay_for(attempt))
    }
}

/// Runs `operation`, retrying it on transient failures.
///
/// The first call is made immediately. Every transient failure is followed by
/// a sleep of [`RetryPolicy::delay_for`] and another call, up to
/// `policy.max_retries` retries. A non-transient failure, or a transient one
/// once the retries are used up, is returned as is.
pub async fn execute_with_retry<T, E, F, Fut>(
    operation_name: &str,
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T, E>
where
    E: Retryable + Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt: u32 = 0;

    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    log::info!(
                        "{operation_name} succeeded on attempt {}",
                        attempt + 1
                    );
                }
                return Ok(value);
            }
            Err(error) if error.is_transient() && attempt < policy.max_retries => {
                let wait = policy.delay_for(attempt);
                log::warn!(
                    "{operation_name} attempt {} of {} throttled, waiting {}s before retrying: {error}",
                    attempt + 1,
                    policy.max_retries + 1,
                    wait.as_secs_f64()
                );
                tokio::time::sleep(wait).await;
                attempt += 1;
            }
            Err(error) => {
                if error.is_transient() {
                    log::error!(
                        "{operation_name} still throttled after {} attempts, giving up: {error}",
                        attempt + 1
                    );
                } else {
                    log::debug!(
                        "{operation_name} attempt {} failed with a non-retryable error: {error}",
                        attempt + 1
                    );
                }
                return Err(error);
            }
        }
    }
}
