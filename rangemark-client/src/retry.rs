//! Opt-in exponential backoff for fetch/patch calls.
//!
//! The default policy performs no retries, preserving fail-fast behavior.
//! `RANGEMARK_RETRIES` enables bounded backoff: transport failures and
//! server-side 5xx answers are retried, client-side 4xx answers are not.

use std::time::Duration;

use crate::error::ClientError;

/// Retry policy configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts (0 = no retries).
    pub max_retries: u32,
    /// Base delay for exponential backoff.
    pub base_delay: Duration,
    /// Cap applied to the computed delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(0)
    }
}

impl RetryPolicy {
    /// Policy with the given attempt budget and the standard 1s base / 30s
    /// cap backoff curve.
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }

    /// Delay before retry number `attempt` (0-based): `base * 2^attempt`,
    /// capped at `max_delay`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }

    /// Run `op`, retrying retryable failures within the attempt budget.
    pub fn run<T>(&self, op: impl Fn() -> Result<T, ClientError>) -> Result<T, ClientError> {
        let mut attempt = 0u32;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(err) if attempt < self.max_retries && err.is_retryable() => {
                    let delay = self.delay_for(attempt);
                    attempt += 1;
                    tracing::warn!(
                        "retryable failure (attempt {attempt}/{}): {err}; backing off {delay:?}",
                        self.max_retries
                    );
                    std::thread::sleep(delay);
                }
                Err(err) => return Err(err),
            }
        }
    }
}
