use std::time::Duration;

use tokio::time::Instant;

use crate::error::GatewayError;

/// A request-scoped deadline/cancellation context threaded through every
/// suspension point in the pipeline (planner, adapter `Execute`, audit
/// sink writes). Cooperative: every async call that suspends must race
/// itself against `Deadline::remaining()` via `Deadline::guard`.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    pub fn after(duration: Duration) -> Self {
        Deadline { at: Instant::now() + duration }
    }

    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.at
    }

    /// Race `fut` against this deadline. Returns `Err(Timeout)` if the
    /// deadline elapses first; the underlying future is dropped, which for
    /// adapters must translate into aborting the backend driver call.
    pub async fn guard<F, T>(&self, fut: F) -> Result<T, GatewayError>
    where
        F: std::future::Future<Output = T>,
    {
        tokio::select! {
            biased;
            _ = tokio::time::sleep(self.remaining()) => Err(GatewayError::Timeout),
            out = fut => Ok(out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn guard_returns_timeout_when_future_is_slow() {
        let deadline = Deadline::after(Duration::from_millis(5));
        let result = deadline
            .guard(async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                42
            })
            .await;
        assert!(matches!(result, Err(GatewayError::Timeout)));
    }

    #[tokio::test]
    async fn guard_returns_value_when_future_is_fast() {
        let deadline = Deadline::after(Duration::from_secs(5));
        let result = deadline.guard(async { 42 }).await;
        assert_eq!(result.unwrap(), 42);
    }
}
