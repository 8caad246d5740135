//! Text endpoint configuration from TOML (`[text]` section)

use draftloop_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// OpenAI-compatible chat completions endpoint used by author and critic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTextConfig {
    /// Base URL, without the `/chat/completions` suffix.
    pub base_url: String,
    /// Environment variable holding the API key (default: "OPENAI_API_KEY").
    pub api_key_env: String,
    pub author_model: String,
    pub critic_model: String,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
}

impl Default for FileTextConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            author_model: "gpt-4o".to_string(),
            critic_model: "gpt-4o-mini".to_string(),
            max_tokens: 4096,
            temperature: None,
        }
    }
}

impl FileTextConfig {
    /// Read the API key from the configured environment variable.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        for (field, value) in [
            ("text.author_model", &self.author_model),
            ("text.critic_model", &self.critic_model),
        ] {
            if value.trim().is_empty() {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::EmptyModel,
                    format!("{}: model name cannot be empty", field),
                ));
            }
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(FileTextConfig::default().validate().is_empty());
    }

    #[test]
    fn test_empty_models_reported() {
        let config = FileTextConfig {
            author_model: " ".to_string(),
            critic_model: String::new(),
            ..Default::default()
        };
        let issues = config.validate();
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.code == ConfigIssueCode::EmptyModel));
        assert!(issues[0].message.starts_with("text.author_model"));
    }
}
