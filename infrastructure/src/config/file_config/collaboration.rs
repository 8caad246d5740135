//! Collaboration configuration from TOML (`[collaboration]` section)

use draftloop_application::ExecutionParams;
use draftloop_application::config::execution_params::{MAX_ROUNDS_LIMIT, clamp_rounds};
use draftloop_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCollaborationConfig {
    /// Author/critic rounds before giving up (clamped into 1..=10)
    pub max_rounds: usize,
    /// Requested article length in characters
    pub target_length: usize,
    /// Optional style hint passed to the author
    pub style: Option<String>,
    /// Minimum body length for a draft to count as valid
    pub min_body_chars: usize,
    pub author_timeout_secs: u64,
    pub critic_timeout_secs: u64,
}

impl Default for FileCollaborationConfig {
    fn default() -> Self {
        let params = ExecutionParams::default();
        Self {
            max_rounds: 3,
            target_length: 1500,
            style: None,
            min_body_chars: params.min_body_chars,
            author_timeout_secs: params.author_timeout.as_secs(),
            critic_timeout_secs: params.critic_timeout.as_secs(),
        }
    }
}

impl FileCollaborationConfig {
    /// Round limit after clamping, plus a warning when clamping changed it.
    pub fn rounds(&self) -> (usize, Option<ConfigIssue>) {
        let rounds = clamp_rounds(self.max_rounds);
        if rounds == self.max_rounds {
            return (rounds, None);
        }
        let issue = ConfigIssue::warning(
            ConfigIssueCode::RoundLimitOutOfRange,
            format!(
                "collaboration.max_rounds: {} is outside 1..={}, using {}",
                self.max_rounds, MAX_ROUNDS_LIMIT, rounds
            ),
        );
        (rounds, Some(issue))
    }

    pub fn to_execution_params(&self) -> ExecutionParams {
        // A zero timeout would fail every call immediately
        ExecutionParams::default()
            .with_author_timeout(Duration::from_secs(self.author_timeout_secs.max(1)))
            .with_critic_timeout(Duration::from_secs(self.critic_timeout_secs.max(1)))
            .with_min_body_chars(self.min_body_chars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_execution_params() {
        let config = FileCollaborationConfig::default();
        let params = config.to_execution_params();
        assert_eq!(params, ExecutionParams::default());
        assert_eq!(config.rounds(), (3, None));
    }

    #[test]
    fn test_rounds_clamped_with_warning() {
        let config = FileCollaborationConfig {
            max_rounds: 25,
            ..Default::default()
        };
        let (rounds, issue) = config.rounds();
        assert_eq!(rounds, MAX_ROUNDS_LIMIT);
        let issue = issue.unwrap();
        assert_eq!(issue.code, ConfigIssueCode::RoundLimitOutOfRange);
        assert!(!issue.is_error());

        let config = FileCollaborationConfig {
            max_rounds: 0,
            ..Default::default()
        };
        assert_eq!(config.rounds().0, 1);
    }

    #[test]
    fn test_zero_timeout_becomes_one_second() {
        let config = FileCollaborationConfig {
            author_timeout_secs: 0,
            ..Default::default()
        };
        let params = config.to_execution_params();
        assert_eq!(params.author_timeout, Duration::from_secs(1));
    }
}
