//! Structured configuration issues.
//!
//! Config validation never fails outright; it returns a list of issues so the
//! caller can print warnings and refuse to run only on errors.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The configuration cannot work at all.
    Error,
    /// The configuration works but was adjusted or looks suspicious.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// `max_rounds` outside `1..=10`; it is clamped.
    RoundLimitOutOfRange,
    /// A model name is empty.
    EmptyModel,
    /// `per_provider_retries` is zero; treated as 1.
    ZeroRetries,
    /// A provider declares a capability tag no adapter understands.
    UnknownCapability,
    /// Two providers share an id.
    DuplicateProviderId,
    /// A provider has no endpoint or id.
    IncompleteProvider,
    /// A vocabulary pattern is not a valid regex.
    InvalidPattern,
    /// A vocabulary entry names an unknown status.
    UnknownStatus,
}

/// A detected configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let issue = ConfigIssue::error(ConfigIssueCode::EmptyModel, "author model is empty");
        assert!(issue.is_error());
        let issue = ConfigIssue::warning(ConfigIssueCode::ZeroRetries, "clamped to 1");
        assert!(!issue.is_error());
        assert_eq!(issue.code, ConfigIssueCode::ZeroRetries);
    }
}
