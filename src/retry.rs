// ABOUTME: Bounded retry with exponential backoff for flaky upstream calls.
// ABOUTME: Off by default; adapters opt in per instance.

use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use backoff::ExponentialBackoff;
use backoff::future::retry_notify;
use tracing::{error, warn};

use crate::error::ToolError;

/// How many times an upstream call is attempted and how long to wait between tries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Always at least 1.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles after each failure.
    pub base_delay: Duration,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

impl RetryPolicy {
    /// A single attempt, no retry.
    pub const fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Up to `max_attempts` tries with delays of `base_delay * 2^n`, capped at 30s.
    pub fn exponential(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay: Duration::from_secs(30),
        }
    }

    /// Builder for the delay cap.
    pub fn max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Delay after the given zero-based failed attempt.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Run `op`, retrying failures that [`ToolError::is_retryable`] allows.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut op: F) -> Result<T, ToolError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ToolError>>,
    {
        let attempts = self.max_attempts.max(1);
        let attempt = AtomicU32::new(0);
        let schedule = ExponentialBackoff {
            current_interval: self.base_delay,
            initial_interval: self.base_delay,
            randomization_factor: 0.0,
            multiplier: 2.0,
            max_interval: self.max_delay,
            max_elapsed_time: None,
            ..Default::default()
        };

        retry_notify(
            schedule,
            || {
                let current = attempt.fetch_add(1, Ordering::SeqCst) + 1;
                let call = op();
                async move {
                    call.await.map_err(|e| {
                        if !e.is_retryable() {
                            return backoff::Error::permanent(e);
                        }
                        if current >= attempts {
                            if attempts > 1 {
                                error!(
                                    operation,
                                    attempts,
                                    error = %e,
                                    "upstream call failed after all attempts"
                                );
                            }
                            return backoff::Error::permanent(e);
                        }
                        backoff::Error::transient(e)
                    })
                }
            },
            |e: ToolError, delay: Duration| {
                warn!(
                    operation,
                    attempt = attempt.load(Ordering::SeqCst),
                    max_attempts = attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "upstream call failed, retrying"
                );
            },
        )
        .await
    }
}
