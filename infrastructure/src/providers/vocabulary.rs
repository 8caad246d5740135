//! Provider-scoped error vocabularies
//!
//! Turns the `[media_providers.vocabulary]` tables into classifier rules that
//! run before the global chain for that provider only.

use crate::config::{ConfigError, FileMediaProviderConfig};
use draftloop_domain::{AttemptStatus, ClassificationRule, ErrorClassifier, ErrorSignal, KeywordRule};
use regex::{Regex, RegexBuilder};
use tracing::debug;

/// Parse a status name as written in configuration.
///
/// Accepts the snake_case names plus the short forms `quota` and `transient`.
pub fn parse_status(value: &str) -> Option<AttemptStatus> {
    match value.trim().to_ascii_lowercase().as_str() {
        "quota_exceeded" | "quota" => Some(AttemptStatus::QuotaExceeded),
        "not_supported" | "unsupported" => Some(AttemptStatus::NotSupported),
        "transient_error" | "transient" => Some(AttemptStatus::TransientError),
        "fatal" => Some(AttemptStatus::Fatal),
        _ => None,
    }
}

/// Case-insensitive regex over the error message and code.
pub struct RegexRule {
    name: String,
    regex: Regex,
    status: AttemptStatus,
}

impl RegexRule {
    pub fn new(
        name: impl Into<String>,
        pattern: &str,
        status: AttemptStatus,
    ) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        Ok(Self {
            name: name.into(),
            regex,
            status,
        })
    }
}

impl ClassificationRule for RegexRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn classify(&self, signal: &ErrorSignal) -> Option<AttemptStatus> {
        let code_matches = signal
            .code
            .as_deref()
            .is_some_and(|code| self.regex.is_match(code));
        (code_matches || self.regex.is_match(&signal.message)).then_some(self.status)
    }
}

/// Register every provider's vocabulary on `classifier`.
///
/// Patterns are consulted first, then the keyword lists in the order
/// not_supported, quota, fatal, transient.
pub fn register_vocabularies(
    classifier: &mut ErrorClassifier,
    providers: &[FileMediaProviderConfig],
) -> Result<(), ConfigError> {
    for provider in providers {
        let vocabulary = &provider.vocabulary;
        if vocabulary.is_empty() {
            continue;
        }

        for (index, rule) in vocabulary.patterns.iter().enumerate() {
            let status = parse_status(&rule.status).ok_or_else(|| ConfigError::InvalidVocabulary {
                provider: provider.id.clone(),
                message: format!("unknown status '{}'", rule.status),
            })?;
            let regex_rule = RegexRule::new(
                format!("{}_pattern_{}", provider.id, index),
                &rule.pattern,
                status,
            )
            .map_err(|e| ConfigError::InvalidVocabulary {
                provider: provider.id.clone(),
                message: e.to_string(),
            })?;
            classifier.register_for(&provider.id, regex_rule);
        }

        for (suffix, keywords, status) in [
            ("not_supported", &vocabulary.not_supported, AttemptStatus::NotSupported),
            ("quota", &vocabulary.quota, AttemptStatus::QuotaExceeded),
            ("fatal", &vocabulary.fatal, AttemptStatus::Fatal),
            ("transient", &vocabulary.transient, AttemptStatus::TransientError),
        ] {
            if keywords.is_empty() {
                continue;
            }
            classifier.register_for(
                &provider.id,
                KeywordRule::new(format!("{}_{}", provider.id, suffix), keywords, status),
            );
        }

        debug!("Registered error vocabulary for provider {}", provider.id);
    }
    Ok(())
}

/// Standard classifier extended with the configured vocabularies.
pub fn build_classifier(
    providers: &[FileMediaProviderConfig],
) -> Result<ErrorClassifier, ConfigError> {
    let mut classifier = ErrorClassifier::standard();
    register_vocabularies(&mut classifier, providers)?;
    Ok(classifier)
}
