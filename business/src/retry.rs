//! Bounded retry with capped exponential backoff.
//!
//! - Max retries: 3 (4 attempts in total)
//! - Delay before retry `n` (0-based): `min(1s * 2^n, 30s)`, so 1s, 2s, 4s
//! - No jitter; the delays are deterministic

use std::future::Future;
use std::time::Duration;

use log::{error, warn};

use crate::{DirectoryError, DirectoryResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retries (not counting the initial request).
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Upper bound for any single delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(30_000),
        }
    }
}

impl RetryPolicy {
    /// A policy that makes exactly one attempt.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Delay before retry `attempt` (0 before the first retry).
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.initial_delay
            .saturating_mul(2_u32.saturating_pow(attempt))
            .min(self.max_delay)
    }
}

/// Run `op` until it succeeds, `should_retry` rejects the error, or the policy
/// is exhausted. The last error is returned as-is.
pub async fn retry_with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    label: &str,
    should_retry: impl Fn(&DirectoryError) -> bool,
    mut op: F,
) -> DirectoryResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = DirectoryResult<T>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < policy.max_retries && should_retry(&err) => {
                let delay = policy.delay_for(attempt);
                warn!(
                    "{label}: attempt {} of {} failed ({err}), retrying in {delay:?}",
                    attempt + 1,
                    policy.max_retries + 1
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => {
                error!("{label}: giving up after {} attempt(s): {err}", attempt + 1);
                return Err(err);
            }
        }
    }
}
