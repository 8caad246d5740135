//! Media provider configuration from TOML (`[[media_providers]]` array)
//!
//! ```toml
//! [[media_providers]]
//! id = "seedream45"
//! priority = 0
//! capability = "image"
//! base_url = "https://ark.example.com/api/v3"
//! model = "seedream-4-5"
//! api_key_env = "ARK_API_KEY"
//!
//! [media_providers.vocabulary]
//! quota = ["SetLimitExceeded"]
//! patterns = [{ pattern = "model .* is not open", status = "not_supported" }]
//! ```

use crate::providers::vocabulary::parse_status;
use draftloop_domain::{ConfigIssue, ConfigIssueCode, ProviderSpec, capability};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How the endpoint should return the generated artifact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileResponseFormat {
    #[default]
    Url,
    B64Json,
}

impl FileResponseFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileResponseFormat::Url => "url",
            FileResponseFormat::B64Json => "b64_json",
        }
    }
}

/// A regex matched against the error message and code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePatternRule {
    pub pattern: String,
    /// `quota_exceeded`, `not_supported`, `transient_error` or `fatal`
    pub status: String,
}

/// Provider-specific error phrases, consulted before the global rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileVocabularyConfig {
    pub quota: Vec<String>,
    pub not_supported: Vec<String>,
    pub fatal: Vec<String>,
    pub transient: Vec<String>,
    pub patterns: Vec<FilePatternRule>,
}

impl FileVocabularyConfig {
    pub fn is_empty(&self) -> bool {
        self.quota.is_empty()
            && self.not_supported.is_empty()
            && self.fatal.is_empty()
            && self.transient.is_empty()
            && self.patterns.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileMediaProviderConfig {
    pub id: String,
    /// Lower runs first
    pub priority: i32,
    pub capability: String,
    /// Base URL of an OpenAI-compatible generation API
    pub base_url: String,
    /// Path appended to `base_url`; derived from the capability when unset
    pub path: Option<String>,
    pub model: String,
    pub api_key_env: Option<String>,
    /// Overrides `cascade.attempt_timeout_secs` for this provider
    pub timeout_secs: Option<u64>,
    /// Default size when the request does not carry one, e.g. "1024x1024"
    pub size: Option<String>,
    pub response_format: FileResponseFormat,
    pub vocabulary: FileVocabularyConfig,
}

impl Default for FileMediaProviderConfig {
    fn default() -> Self {
        Self {
            id: String::new(),
            priority: 0,
            capability: capability::IMAGE.to_string(),
            base_url: String::new(),
            path: None,
            model: String::new(),
            api_key_env: None,
            timeout_secs: None,
            size: None,
            response_format: FileResponseFormat::default(),
            vocabulary: FileVocabularyConfig::default(),
        }
    }
}

impl FileMediaProviderConfig {
    pub fn to_spec(&self) -> ProviderSpec {
        ProviderSpec::new(&self.id, self.priority, &self.capability)
    }

    /// Request path, e.g. `/images/generations`.
    pub fn request_path(&self) -> String {
        match &self.path {
            Some(path) if path.starts_with('/') => path.clone(),
            Some(path) => format!("/{}", path),
            None if self.capability.eq_ignore_ascii_case(capability::VIDEO) => {
                "/videos/generations".to_string()
            }
            None => "/images/generations".to_string(),
        }
    }

    pub fn timeout(&self, default: Duration) -> Duration {
        self.timeout_secs
            .map(|secs| Duration::from_secs(secs.max(1)))
            .unwrap_or(default)
    }

    pub fn api_key(&self) -> Option<String> {
        self.api_key_env
            .as_ref()
            .and_then(|name| std::env::var(name).ok())
            .filter(|key| !key.trim().is_empty())
    }

    pub fn validate(&self, index: usize) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        let label = if self.id.is_empty() {
            format!("media_providers[{}]", index)
        } else {
            format!("media_providers.{}", self.id)
        };

        if self.id.trim().is_empty() || self.base_url.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::IncompleteProvider,
                format!("{}: both id and base_url are required", label),
            ));
        }
        if self.model.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyModel,
                format!("{}: model name cannot be empty", label),
            ));
        }
        if !capability::KNOWN
            .iter()
            .any(|known| known.eq_ignore_ascii_case(&self.capability))
        {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::UnknownCapability,
                format!(
                    "{}: unknown capability '{}', expected one of {}",
                    label,
                    self.capability,
                    capability::KNOWN.join(", ")
                ),
            ));
        }
        for rule in &self.vocabulary.patterns {
            if parse_status(&rule.status).is_none() {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::UnknownStatus,
                    format!(
                        "{}: unknown status '{}' for pattern '{}'",
                        label, rule.status, rule.pattern
                    ),
                ));
            }
            if let Err(e) = regex::Regex::new(&rule.pattern) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::InvalidPattern,
                    format!("{}: invalid pattern '{}': {}", label, rule.pattern, e),
                ));
            }
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(id: &str) -> FileMediaProviderConfig {
        FileMediaProviderConfig {
            id: id.to_string(),
            base_url: "https://api.example.com/v1".to_string(),
            model: "flux-dev".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_deserialize_with_vocabulary() {
        let toml_str = r#"
id = "seedream45"
priority = 2
capability = "image"
base_url = "https://ark.example.com/api/v3"
model = "seedream-4-5"
response_format = "b64_json"

[vocabulary]
quota = ["SetLimitExceeded"]
patterns = [{ pattern = "model .* is not open", status = "not_supported" }]
"#;
        let config: FileMediaProviderConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.priority, 2);
        assert_eq!(config.response_format, FileResponseFormat::B64Json);
        assert_eq!(config.vocabulary.quota, vec!["SetLimitExceeded"]);
        assert_eq!(config.vocabulary.patterns[0].status, "not_supported");
        assert!(config.validate(0).is_empty());
    }

    #[test]
    fn test_request_path() {
        let mut config = provider("flux");
        assert_eq!(config.request_path(), "/images/generations");
        config.capability = "Video".to_string();
        assert_eq!(config.request_path(), "/videos/generations");
        config.path = Some("v2/generate".to_string());
        assert_eq!(config.request_path(), "/v2/generate");
    }

    #[test]
    fn test_timeout_override() {
        let mut config = provider("flux");
        let default = Duration::from_secs(120);
        assert_eq!(config.timeout(default), default);
        config.timeout_secs = Some(45);
        assert_eq!(config.timeout(default), Duration::from_secs(45));
    }

    #[test]
    fn test_validate_reports_problems() {
        let mut config = FileMediaProviderConfig {
            capability: "audio".to_string(),
            ..Default::default()
        };
        config.vocabulary.patterns.push(FilePatternRule {
            pattern: "([unclosed".to_string(),
            status: "maybe".to_string(),
        });

        let codes: Vec<_> = config.validate(3).iter().map(|i| i.code).collect();
        assert!(codes.contains(&ConfigIssueCode::IncompleteProvider));
        assert!(codes.contains(&ConfigIssueCode::EmptyModel));
        assert!(codes.contains(&ConfigIssueCode::UnknownCapability));
        assert!(codes.contains(&ConfigIssueCode::UnknownStatus));
        assert!(codes.contains(&ConfigIssueCode::InvalidPattern));
    }

    #[test]
    fn test_spec_conversion() {
        let spec = provider("flux").to_spec();
        assert_eq!(spec.id, "flux");
        assert_eq!(spec.capability_tag, "image");
    }
}
