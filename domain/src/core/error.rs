//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid round limit: {0} (must be at least 1)")]
    InvalidRoundLimit(usize),

    #[error("Invalid topic: {0}")]
    InvalidTopic(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_limit_display() {
        let error = DomainError::InvalidRoundLimit(0);
        assert_eq!(error.to_string(), "Invalid round limit: 0 (must be at least 1)");
    }
}
