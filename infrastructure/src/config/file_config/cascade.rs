//! Cascade retry configuration from TOML (`[cascade]` section)

use draftloop_domain::{ConfigIssue, ConfigIssueCode, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCascadeConfig {
    /// Tries per provider before falling back to the next one
    pub retries: u32,
    /// Wait before the 1st, 2nd, ... retry; the last entry repeats
    pub backoff_secs: Vec<u64>,
    /// Upper bound for any single wait
    pub max_backoff_secs: u64,
    /// Attempt timeout for providers that do not set their own
    pub attempt_timeout_secs: u64,
}

impl Default for FileCascadeConfig {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            retries: policy.per_provider_retries,
            backoff_secs: policy
                .backoff_schedule
                .iter()
                .map(Duration::as_secs)
                .collect(),
            max_backoff_secs: policy.max_backoff.as_secs(),
            attempt_timeout_secs: 120,
        }
    }
}

impl FileCascadeConfig {
    pub fn to_retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retries,
            self.backoff_secs
                .iter()
                .copied()
                .map(Duration::from_secs)
                .collect(),
        )
        .with_max_backoff(Duration::from_secs(self.max_backoff_secs))
    }

    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_secs(self.attempt_timeout_secs.max(1))
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.retries == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ZeroRetries,
                "cascade.retries: 0 is not allowed, each provider gets 1 try",
            ));
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_round_trips_policy() {
        let config = FileCascadeConfig::default();
        assert_eq!(config.retries, 3);
        assert_eq!(config.backoff_secs, vec![30, 60]);
        assert_eq!(config.to_retry_policy(), RetryPolicy::default());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_zero_retries_warns_and_clamps() {
        let config = FileCascadeConfig {
            retries: 0,
            ..Default::default()
        };
        assert_eq!(config.to_retry_policy().max_tries(), 1);
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, ConfigIssueCode::ZeroRetries);
    }
}
