use core::future::Future;
use std::time::Duration;
use tracing::warn;

/// Bounded exponential backoff for transient read failures.
///
/// Only reads go through this policy. Writes are never retried.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub attempts: u32,
    /// Delay before the first retry.
    pub initial_backoff: Duration,
    /// Factor by which the delay grows per attempt.
    pub multiplier: f64,
    /// Cap on the delay between attempts.
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            initial_backoff: Duration::from_millis(250),
            multiplier: 2.0,
            max_backoff: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    fn backoff_duration(&self, attempt: u32) -> Duration {
        let backoff =
            self.initial_backoff.as_millis() as f64 * self.multiplier.powi(attempt as i32);
        Duration::from_millis(backoff.min(self.max_backoff.as_millis() as f64) as u64)
    }
}

/// Run a read operation under a [`RetryPolicy`], returning the last error
/// once attempts are exhausted.
pub async fn retry_read<T, E, F, Fut>(
    policy: &RetryPolicy,
    label: &'static str,
    mut op: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: core::fmt::Display,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(error) if attempt + 1 < policy.attempts => {
                warn!(%error, label, attempt, "transient chain read failure, backing off");
                tokio::time::sleep(policy.backoff_duration(attempt)).await;
                attempt += 1;
            }
            Err(error) => return Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            attempts: 3,
            initial_backoff: Duration::from_millis(1),
            multiplier: 2.0,
            max_backoff: Duration::from_millis(4),
        }
    }

    #[tokio::test]
    async fn succeeds_without_retry() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, &str> = retry_read(&fast_policy(), "test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(7) }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn recovers_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, &str> = retry_read(&fast_policy(), "test", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move { if n < 2 { Err("transient") } else { Ok(42) } }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhausts_attempts_then_fails() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, &str> = retry_read(&fast_policy(), "test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err("down") }
        })
        .await;
        assert_eq!(result.unwrap_err(), "down");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn backoff_is_capped() {
        let policy = fast_policy();
        assert_eq!(policy.backoff_duration(0), Duration::from_millis(1));
        assert_eq!(policy.backoff_duration(1), Duration::from_millis(2));
        // 1 * 2^10 far exceeds the 4ms cap.
        assert_eq!(policy.backoff_duration(10), Duration::from_millis(4));
    }
}
