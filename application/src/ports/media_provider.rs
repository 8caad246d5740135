//! Media provider port
//!
//! One concrete generation backend behind a uniform `attempt` operation. The
//! cascade owns retry and fallback; an adapter performs exactly one call.

use async_trait::async_trait;
use draftloop_domain::{Artifact, ErrorSignal, FailureKind, MediaRequest, ProviderSpec};
use std::time::Duration;
use thiserror::Error;

/// Default upper bound for a single attempt
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(120);

/// Raw failure reported by an adapter
///
/// Carries whatever structure the backend exposed; the cascade turns it into
/// an [`ErrorSignal`] for classification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct ProviderFailure {
    pub status_code: Option<u16>,
    pub code: Option<String>,
    pub kind: Option<FailureKind>,
    pub message: String,
}

impl ProviderFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status_code: None,
            code: None,
            kind: None,
            message: message.into(),
        }
    }

    /// Failure with an HTTP status code.
    pub fn http(status_code: u16, message: impl Into<String>) -> Self {
        Self::new(message).with_status(status_code)
    }

    /// The attempt exceeded its time budget.
    pub fn timeout(after: Duration) -> Self {
        Self::new(format!("attempt timed out after {}s", after.as_secs()))
            .with_kind(FailureKind::Timeout)
    }

    pub fn with_status(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_kind(mut self, kind: FailureKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn into_signal(self, provider_id: &str) -> ErrorSignal {
        ErrorSignal {
            provider_id: provider_id.to_string(),
            status_code: self.status_code,
            code: self.code,
            kind: self.kind,
            message: self.message,
        }
    }
}

impl std::fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.status_code, &self.code) {
            (Some(status), Some(code)) => write!(f, "HTTP {} [{}]: {}", status, code, self.message),
            (Some(status), None) => write!(f, "HTTP {}: {}", status, self.message),
            (None, Some(code)) => write!(f, "[{}] {}", code, self.message),
            (None, None) => write!(f, "{}", self.message),
        }
    }
}

/// A single media generation backend
#[async_trait]
pub trait MediaProvider: Send + Sync {
    /// Static description (id, priority, capability)
    fn spec(&self) -> &ProviderSpec;

    /// Upper bound for one `attempt` call
    fn timeout(&self) -> Duration {
        DEFAULT_ATTEMPT_TIMEOUT
    }

    /// Perform exactly one generation call
    async fn attempt(&self, request: &MediaRequest) -> Result<Artifact, ProviderFailure>;
}
