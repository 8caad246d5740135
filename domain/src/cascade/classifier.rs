//! Error classification for provider attempts.
//!
//! A raw provider failure is reduced to an [`ErrorSignal`] and passed through
//! an ordered list of [`ClassificationRule`]s. The first rule that returns a
//! status wins. Rules registered for a specific provider id are consulted
//! before the global list, so a provider can bring its own error vocabulary
//! without touching the cascade.
//!
//! | Signal                                | Status          |
//! |---------------------------------------|-----------------|
//! | structured kind from the adapter      | mapped directly |
//! | HTTP 401 / 403                        | `Fatal`         |
//! | HTTP 429                              | `QuotaExceeded` |
//! | HTTP 404 / 501                        | `NotSupported`  |
//! | HTTP 408 / 5xx                        | `TransientError`|
//! | "not supported", "model not found"... | `NotSupported`  |
//! | "quota", "rate limit"...              | `QuotaExceeded` |
//! | "invalid api key", "unauthorized"...  | `Fatal`         |
//! | "timeout", "overloaded"...            | `TransientError`|
//! | anything else                         | `TransientError`|
//!
//! Keywords only decide signals whose status code is absent or not listed.

use super::outcome::AttemptStatus;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Structured failure hint an adapter can attach when it knows what went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    RateLimited,
    QuotaExhausted,
    Unsupported,
    Unauthorized,
    Timeout,
    Network,
    ServerError,
}

impl FailureKind {
    pub fn status(&self) -> AttemptStatus {
        match self {
            FailureKind::RateLimited | FailureKind::QuotaExhausted => AttemptStatus::QuotaExceeded,
            FailureKind::Unsupported => AttemptStatus::NotSupported,
            FailureKind::Unauthorized => AttemptStatus::Fatal,
            FailureKind::Timeout | FailureKind::Network | FailureKind::ServerError => {
                AttemptStatus::TransientError
            }
        }
    }
}

/// Opaque description of a failed attempt.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ErrorSignal {
    pub provider_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    /// Provider-specific error code, e.g. `insufficient_quota`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<FailureKind>,
    pub message: String,
}

impl ErrorSignal {
    pub fn new(provider_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            message: message.into(),
            ..Default::default()
        }
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

    /// Lowercased message and code, for keyword matching.
    fn haystack(&self) -> String {
        match &self.code {
            Some(code) => format!("{} {}", self.message, code).to_lowercase(),
            None => self.message.to_lowercase(),
        }
    }

    /// One-line summary used in attempt details.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(status) = self.status_code {
            parts.push(format!("HTTP {status}"));
        }
        if let Some(code) = &self.code {
            parts.push(format!("[{code}]"));
        }
        if !self.message.is_empty() {
            parts.push(self.message.clone());
        }
        if parts.is_empty() {
            "unknown error".to_string()
        } else {
            parts.join(" ")
        }
    }
}

/// A single predicate in the classifier chain.
pub trait ClassificationRule: Send + Sync {
    /// Name shown in logs when the rule matches.
    fn name(&self) -> &str;

    /// Return a status when the rule recognizes the signal.
    fn classify(&self, signal: &ErrorSignal) -> Option<AttemptStatus>;
}

/// Trusts the adapter's structured [`FailureKind`].
#[derive(Debug, Clone, Default)]
pub struct StructuredKindRule;

impl ClassificationRule for StructuredKindRule {
    fn name(&self) -> &str {
        "structured_kind"
    }

    fn classify(&self, signal: &ErrorSignal) -> Option<AttemptStatus> {
        signal.kind.map(|k| k.status())
    }
}

/// Matches a set of HTTP status codes.
#[derive(Debug, Clone)]
pub struct StatusCodeRule {
    name: String,
    codes: Vec<u16>,
    status: AttemptStatus,
}

impl StatusCodeRule {
    pub fn new(name: impl Into<String>, codes: &[u16], status: AttemptStatus) -> Self {
        Self {
            name: name.into(),
            codes: codes.to_vec(),
            status,
        }
    }

    /// Matches every code in `500..=599`.
    pub fn server_errors(status: AttemptStatus) -> Self {
        Self {
            name: "http_5xx".to_string(),
            codes: (500..=599).collect(),
            status,
        }
    }
}

impl ClassificationRule for StatusCodeRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn classify(&self, signal: &ErrorSignal) -> Option<AttemptStatus> {
        signal
            .status_code
            .filter(|code| self.codes.contains(code))
            .map(|_| self.status)
    }
}

/// Case-insensitive substring match over the message and error code.
#[derive(Debug, Clone)]
pub struct KeywordRule {
    name: String,
    keywords: Vec<String>,
    status: AttemptStatus,
}

impl KeywordRule {
    pub fn new<I, S>(name: impl Into<String>, keywords: I, status: AttemptStatus) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            name: name.into(),
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
            status,
        }
    }
}

impl ClassificationRule for KeywordRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn classify(&self, signal: &ErrorSignal) -> Option<AttemptStatus> {
        let haystack = signal.haystack();
        self.keywords
            .iter()
            .any(|k| haystack.contains(k.as_str()))
            .then_some(self.status)
    }
}

/// Wraps an arbitrary closure.
pub struct FnRule<F> {
    name: String,
    f: F,
}

impl<F> FnRule<F>
where
    F: Fn(&ErrorSignal) -> Option<AttemptStatus> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> ClassificationRule for FnRule<F>
where
    F: Fn(&ErrorSignal) -> Option<AttemptStatus> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn classify(&self, signal: &ErrorSignal) -> Option<AttemptStatus> {
        (self.f)(signal)
    }
}

/// Built-in vocabularies used by [`ErrorClassifier::standard`].
pub mod vocabulary {
    pub const NOT_SUPPORTED: &[&str] = &[
        "not supported",
        "unsupported",
        "does not support",
        "model not found",
        "model_not_found",
        "modelnotopen",
        "model not open",
        "no such model",
    ];

    pub const QUOTA: &[&str] = &[
        "quota",
        "rate limit",
        "rate_limit",
        "ratelimit",
        "too many requests",
    ];

    pub const FATAL: &[&str] = &[
        "invalid api key",
        "invalid_api_key",
        "incorrect api key",
        "unauthorized",
        "authentication",
        "permission denied",
        "account suspended",
    ];

    pub const TRANSIENT: &[&str] = &[
        "timeout",
        "timed out",
        "connection reset",
        "connection refused",
        "temporarily unavailable",
        "overloaded",
    ];
}

/// Which rule produced a classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub status: AttemptStatus,
    /// Rule name, or `"fallback"` when nothing matched
    pub rule: String,
}

/// Ordered, pluggable error classifier.
///
/// Never returns [`AttemptStatus::Success`]; a rule that does is ignored.
pub struct ErrorClassifier {
    rules: Vec<Box<dyn ClassificationRule>>,
    provider_rules: HashMap<String, Vec<Box<dyn ClassificationRule>>>,
    fallback: AttemptStatus,
}

impl ErrorClassifier {
    /// An empty classifier that maps everything to `TransientError`.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            provider_rules: HashMap::new(),
            fallback: AttemptStatus::TransientError,
        }
    }

    /// The default rule chain (see the module table).
    pub fn standard() -> Self {
        Self::new()
            .with_rule(StructuredKindRule)
            .with_rule(StatusCodeRule::new("http_auth", &[401, 403], AttemptStatus::Fatal))
            .with_rule(StatusCodeRule::new(
                "http_rate_limit",
                &[429],
                AttemptStatus::QuotaExceeded,
            ))
            .with_rule(StatusCodeRule::new(
                "http_not_found",
                &[404, 501],
                AttemptStatus::NotSupported,
            ))
            .with_rule(StatusCodeRule::new(
                "http_timeout",
                &[408],
                AttemptStatus::TransientError,
            ))
            .with_rule(StatusCodeRule::server_errors(AttemptStatus::TransientError))
            .with_rule(KeywordRule::new(
                "unsupported_vocabulary",
                vocabulary::NOT_SUPPORTED,
                AttemptStatus::NotSupported,
            ))
            .with_rule(KeywordRule::new(
                "quota_vocabulary",
                vocabulary::QUOTA,
                AttemptStatus::QuotaExceeded,
            ))
            .with_rule(KeywordRule::new(
                "auth_vocabulary",
                vocabulary::FATAL,
                AttemptStatus::Fatal,
            ))
            .with_rule(KeywordRule::new(
                "transient_vocabulary",
                vocabulary::TRANSIENT,
                AttemptStatus::TransientError,
            ))
    }

    /// Append a global rule (builder form).
    pub fn with_rule(mut self, rule: impl ClassificationRule + 'static) -> Self {
        self.register(rule);
        self
    }

    /// Replace the status used when no rule matches.
    ///
    /// `Success` is rejected and leaves the fallback unchanged.
    pub fn with_fallback(mut self, fallback: AttemptStatus) -> Self {
        if !fallback.is_success() {
            self.fallback = fallback;
        }
        self
    }

    /// Append a global rule.
    pub fn register(&mut self, rule: impl ClassificationRule + 'static) {
        self.rules.push(Box::new(rule));
    }

    /// Insert a global rule ahead of all existing global rules.
    pub fn register_first(&mut self, rule: impl ClassificationRule + 'static) {
        self.rules.insert(0, Box::new(rule));
    }

    /// Append a rule consulted only for `provider_id`, before the global rules.
    pub fn register_for(
        &mut self,
        provider_id: impl Into<String>,
        rule: impl ClassificationRule + 'static,
    ) {
        self.provider_rules
            .entry(provider_id.into())
            .or_default()
            .push(Box::new(rule));
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len() + self.provider_rules.values().map(Vec::len).sum::<usize>()
    }

    pub fn classify(&self, signal: &ErrorSignal) -> AttemptStatus {
        self.explain(signal).status
    }

    /// Classify and report which rule matched.
    pub fn explain(&self, signal: &ErrorSignal) -> Classification {
        let scoped = self
            .provider_rules
            .get(&signal.provider_id)
            .into_iter()
            .flatten();

        for rule in scoped.chain(self.rules.iter()) {
            if let Some(status) = rule.classify(signal)
                && !status.is_success()
            {
                return Classification {
                    status,
                    rule: rule.name().to_string(),
                };
            }
        }

        Classification {
            status: self.fallback,
            rule: "fallback".to_string(),
        }
    }
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for ErrorClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.rules.iter().map(|r| r.name()).collect();
        f.debug_struct("ErrorClassifier")
            .field("rules", &names)
            .field(
                "provider_rules",
                &self.provider_rules.keys().collect::<Vec<_>>(),
            )
            .field("fallback", &self.fallback)
            .finish()
    }
}
