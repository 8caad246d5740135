//! Retry and backoff policy for the provider cascade.

use std::time::Duration;

/// How often a single provider is retried and how long to wait in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum invocations per provider (at least 1)
    pub per_provider_retries: u32,
    /// Delay before retry `i`; the last entry repeats past the end
    pub backoff_schedule: Vec<Duration>,
    /// Upper bound applied to every delay
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            per_provider_retries: 3,
            backoff_schedule: vec![Duration::from_secs(30), Duration::from_secs(60)],
            max_backoff: Duration::from_secs(120),
        }
    }
}

impl RetryPolicy {
    pub fn new(per_provider_retries: u32, backoff_schedule: Vec<Duration>) -> Self {
        Self {
            per_provider_retries: per_provider_retries.max(1),
            backoff_schedule,
            ..Default::default()
        }
    }

    /// One attempt per provider, no waiting.
    pub fn no_retry() -> Self {
        Self {
            per_provider_retries: 1,
            backoff_schedule: Vec::new(),
            max_backoff: Duration::ZERO,
        }
    }

    pub fn with_max_backoff(mut self, max_backoff: Duration) -> Self {
        self.max_backoff = max_backoff;
        self
    }

    /// Effective invocation limit per provider.
    pub fn max_tries(&self) -> u32 {
        self.per_provider_retries.max(1)
    }

    /// Delay after the failed attempt with 0-based `attempt_index`.
    pub fn backoff_for(&self, attempt_index: usize) -> Duration {
        let base = self
            .backoff_schedule
            .get(attempt_index)
            .or_else(|| self.backoff_schedule.last())
            .copied()
            .unwrap_or(Duration::ZERO);
        base.min(self.max_backoff)
    }

    /// Worst-case total sleep for one provider.
    pub fn worst_case_wait(&self) -> Duration {
        (0..self.max_tries().saturating_sub(1) as usize)
            .map(|i| self.backoff_for(i))
            .sum()
    }
}
