use std::time::Duration;

use sqlgate_common::{GatewayError, Result};

/// Backoff configuration for [`execute_with_retry`]. Delay doubles after
/// every attempt, starting at `base_delay` and never exceeding
/// `max_delay`.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfig { max_attempts: 3, base_delay: Duration::from_millis(50), max_delay: Duration::from_secs(5) }
    }
}

/// Outcome of an `execute_with_retry` run, surfaced to callers who need
/// to audit or log the attempt history.
#[derive(Debug, Clone)]
pub struct RetryResult<T> {
    pub attempts: u32,
    pub last_error: Option<GatewayError>,
    pub all_errors: Vec<GatewayError>,
    pub success: Option<T>,
}

impl<T> RetryResult<T> {
    fn failed(attempts: u32, all_errors: Vec<GatewayError>) -> Self {
        let last_error = all_errors.last().cloned();
        RetryResult { attempts, last_error, all_errors, success: None }
    }

    pub fn is_success(&self) -> bool {
        self.success.is_some()
    }
}

/// Classifies whether a failed attempt is worth retrying. The default
/// never retries: cancellation and deadline errors in particular must
/// never be retried, since a retry after a caller-imposed deadline only
/// wastes work the caller has already given up on.
pub fn default_is_retryable(_error: &GatewayError) -> bool {
    false
}

/// Runs `op` up to `config.max_attempts` times, retrying only while
/// `is_retryable` returns true for the failure. Adapters opt into this
/// explicitly; nothing in `Execute` retries implicitly (spec §4.5).
pub async fn execute_with_retry<T, F, Fut>(config: &RetryConfig, is_retryable: impl Fn(&GatewayError) -> bool, op: F) -> RetryResult<T>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let mut all_errors = Vec::new();
    let mut delay = config.base_delay;

    for attempt in 1..=config.max_attempts {
        match op().await {
            Ok(value) => {
                return RetryResult { attempts: attempt, last_error: all_errors.last().cloned(), all_errors, success: Some(value) };
            }
            Err(error) => {
                let retry = attempt < config.max_attempts && is_retryable(&error);
                all_errors.push(error);
                if !retry {
                    return RetryResult::failed(attempt, all_errors);
                }
                tokio::time::sleep(delay).await;
                delay = std::cmp::min(delay * 2, config.max_delay);
            }
        }
    }

    RetryResult::failed(config.max_attempts, all_errors)
}
