//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod cascade;
mod collaboration;
mod logging;
mod media_providers;
mod output;
mod text;

pub use cascade::FileCascadeConfig;
pub use collaboration::FileCollaborationConfig;
pub use logging::FileLoggingConfig;
pub use media_providers::{
    FileMediaProviderConfig, FilePatternRule, FileResponseFormat, FileVocabularyConfig,
};
pub use output::{FileOutputConfig, FileOutputFormat};
pub use text::FileTextConfig;

use draftloop_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Author/critic loop settings
    pub collaboration: FileCollaborationConfig,
    /// Text generation endpoint and models
    pub text: FileTextConfig,
    /// Retry and backoff for the provider cascade
    pub cascade: FileCascadeConfig,
    /// Media generation backends, tried in priority order
    pub media_providers: Vec<FileMediaProviderConfig>,
    /// Output settings
    pub output: FileOutputConfig,
    /// Session transcript and diagnostic log files
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        issues.extend(self.collaboration.rounds().1);
        issues.extend(self.text.validate());
        issues.extend(self.cascade.validate());

        let mut seen = HashSet::new();
        for (index, provider) in self.media_providers.iter().enumerate() {
            issues.extend(provider.validate(index));
            if !provider.id.is_empty() && !seen.insert(provider.id.as_str()) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::DuplicateProviderId,
                    format!("media_providers: id '{}' is used more than once", provider.id),
                ));
            }
        }

        issues
    }

    /// True when any issue is an error.
    pub fn has_errors(&self) -> bool {
        self.validate().iter().any(ConfigIssue::is_error)
    }
}
