//! Attempt outcomes and the aggregated cascade result.

use super::provider::ProviderSpec;
use serde::{Deserialize, Serialize};

/// Classified status of one provider attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttemptStatus {
    Success,
    /// Quota or rate limit hit; retry the same provider after a backoff
    QuotaExceeded,
    /// Provider cannot serve this request; skip it for the rest of the call
    NotSupported,
    /// Temporary failure; retry with backoff, then move on
    TransientError,
    /// Unrecoverable (e.g. authentication); abort the whole cascade
    Fatal,
}

impl AttemptStatus {
    pub fn as_str(&self) -> &str {
        match self {
            AttemptStatus::Success => "success",
            AttemptStatus::QuotaExceeded => "quota_exceeded",
            AttemptStatus::NotSupported => "not_supported",
            AttemptStatus::TransientError => "transient_error",
            AttemptStatus::Fatal => "fatal",
        }
    }

    /// Whether the same provider should be tried again after a backoff.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AttemptStatus::QuotaExceeded | AttemptStatus::TransientError)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AttemptStatus::Success)
    }
}

impl std::fmt::Display for AttemptStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A generated artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Artifact {
    /// Raw bytes; only the MIME type and size are persisted
    Bytes {
        mime_type: String,
        size: usize,
        #[serde(skip_serializing, default)]
        data: Vec<u8>,
    },
    /// Retrievable location of the artifact
    Uri { uri: String },
}

impl Artifact {
    pub fn bytes(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Artifact::Bytes {
            mime_type: mime_type.into(),
            size: data.len(),
            data,
        }
    }

    pub fn uri(uri: impl Into<String>) -> Self {
        Artifact::Uri { uri: uri.into() }
    }

    /// Short human-readable description.
    pub fn describe(&self) -> String {
        match self {
            Artifact::Bytes { mime_type, size, .. } => format!("{size} bytes ({mime_type})"),
            Artifact::Uri { uri } => uri.clone(),
        }
    }
}

/// Result of a single attempt (or of a skipped provider).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptOutcome {
    pub status: AttemptStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<Artifact>,
    pub detail: String,
}

impl AttemptOutcome {
    pub fn success(artifact: Artifact, detail: impl Into<String>) -> Self {
        Self {
            status: AttemptStatus::Success,
            artifact: Some(artifact),
            detail: detail.into(),
        }
    }

    pub fn failure(status: AttemptStatus, detail: impl Into<String>) -> Self {
        Self {
            status,
            artifact: None,
            detail: detail.into(),
        }
    }
}

/// Final outcome for one provider within a cascade call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderAttempt {
    pub provider: ProviderSpec,
    pub outcome: AttemptOutcome,
    /// Number of invocations; `None` when the provider was skipped unseen
    pub tries: Option<u32>,
}

impl ProviderAttempt {
    pub fn tried(provider: ProviderSpec, outcome: AttemptOutcome, tries: u32) -> Self {
        Self {
            provider,
            outcome,
            tries: Some(tries),
        }
    }

    pub fn skipped(provider: ProviderSpec, reason: impl Into<String>) -> Self {
        Self {
            provider,
            outcome: AttemptOutcome::failure(AttemptStatus::NotSupported, reason),
            tries: None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.tries.is_none()
    }
}

/// Aggregated result of a cascade call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeResult {
    /// Outcome of the winning attempt, or of the last attempt seen
    pub outcome: AttemptOutcome,
    /// One entry per provider reached, in the order they were reached
    pub attempts: Vec<ProviderAttempt>,
}

impl CascadeResult {
    pub fn is_success(&self) -> bool {
        self.outcome.status.is_success()
    }

    pub fn artifact(&self) -> Option<&Artifact> {
        self.outcome.artifact.as_ref()
    }

    /// Provider that produced the artifact, if any.
    pub fn winner(&self) -> Option<&ProviderSpec> {
        self.attempts
            .iter()
            .find(|a| a.outcome.status.is_success())
            .map(|a| &a.provider)
    }

    /// Total number of provider invocations across the call.
    pub fn total_tries(&self) -> u32 {
        self.attempts.iter().filter_map(|a| a.tries).sum()
    }

    /// One line per provider: `id: status (tries) - detail`.
    pub fn diagnostics(&self) -> Vec<String> {
        self.attempts
            .iter()
            .map(|a| match a.tries {
                Some(n) => format!(
                    "{}: {} after {} tr{} - {}",
                    a.provider.id,
                    a.outcome.status,
                    n,
                    if n == 1 { "y" } else { "ies" },
                    a.outcome.detail
                ),
                None => format!("{}: skipped - {}", a.provider.id, a.outcome.detail),
            })
            .collect()
    }
}
