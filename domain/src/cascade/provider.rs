//! Provider specs and media requests.

use serde::{Deserialize, Serialize};

/// Well-known capability tags.
pub mod capability {
    pub const IMAGE: &str = "image";
    pub const VIDEO: &str = "video";

    /// All tags the built-in adapters understand.
    pub const KNOWN: &[&str] = &[IMAGE, VIDEO];
}

/// Static description of one generation backend.
///
/// Lower `priority` values are tried first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProviderSpec {
    pub id: String,
    pub priority: i32,
    pub capability_tag: String,
}

impl ProviderSpec {
    pub fn new(id: impl Into<String>, priority: i32, capability_tag: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            priority,
            capability_tag: capability_tag.into(),
        }
    }

    /// Shorthand for an image provider.
    pub fn image(id: impl Into<String>, priority: i32) -> Self {
        Self::new(id, priority, capability::IMAGE)
    }

    /// Shorthand for a video provider.
    pub fn video(id: impl Into<String>, priority: i32) -> Self {
        Self::new(id, priority, capability::VIDEO)
    }

    pub fn supports(&self, capability: &str) -> bool {
        self.capability_tag.eq_ignore_ascii_case(capability)
    }
}

impl std::fmt::Display for ProviderSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}#{}]", self.id, self.capability_tag, self.priority)
    }
}

/// A request for one media artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRequest {
    pub prompt: String,
    /// Capability tag a provider must carry to serve this request
    pub capability: String,
    /// Requested output size, e.g. "1024x1024"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
}

impl MediaRequest {
    pub fn new(prompt: impl Into<String>, capability: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            capability: capability.into(),
            size: None,
            negative_prompt: None,
        }
    }

    pub fn image(prompt: impl Into<String>) -> Self {
        Self::new(prompt, capability::IMAGE)
    }

    pub fn video(prompt: impl Into<String>) -> Self {
        Self::new(prompt, capability::VIDEO)
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn with_negative_prompt(mut self, negative: impl Into<String>) -> Self {
        self.negative_prompt = Some(negative.into());
        self
    }
}
