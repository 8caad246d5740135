//! Execution parameters: use case loop control.
//!
//! [`ExecutionParams`] groups the static parameters that bound every external
//! call made by the collaboration loop. These are application-layer concerns,
//! not domain policy.

use draftloop_domain::MIN_BODY_CHARS;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upper bound on review rounds accepted from configuration.
pub const MAX_ROUNDS_LIMIT: usize = 10;

/// Collaboration loop control parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Timeout for each author call (create or revise).
    pub author_timeout: Duration,
    /// Timeout for each critic call.
    pub critic_timeout: Duration,
    /// Minimum trimmed body length for a draft to be kept.
    pub min_body_chars: usize,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            author_timeout: Duration::from_secs(180),
            critic_timeout: Duration::from_secs(120),
            min_body_chars: MIN_BODY_CHARS,
        }
    }
}

impl ExecutionParams {
    // ==================== Builder Methods ====================

    pub fn with_author_timeout(mut self, timeout: Duration) -> Self {
        self.author_timeout = timeout;
        self
    }

    pub fn with_critic_timeout(mut self, timeout: Duration) -> Self {
        self.critic_timeout = timeout;
        self
    }

    pub fn with_min_body_chars(mut self, min: usize) -> Self {
        self.min_body_chars = min;
        self
    }
}

/// Clamp a configured round count into `1..=MAX_ROUNDS_LIMIT`.
pub fn clamp_rounds(rounds: usize) -> usize {
    rounds.clamp(1, MAX_ROUNDS_LIMIT)
}
