//! Draft entity - the title/body pair refined by the collaboration loop.

use serde::{Deserialize, Serialize};

/// Minimum body length (in characters) for a draft to be usable.
///
/// Anything shorter is treated as a failed generation, never as a final draft.
pub const MIN_BODY_CHARS: usize = 50;

/// A working draft produced by the author.
///
/// Drafts are replaced, never edited in place: each revision yields a new
/// `Draft` and older versions only survive in the collaboration history.
///
/// # Example
///
/// ```
/// use draftloop_domain::Draft;
///
/// let draft = Draft::new("Tide pools", "Tide pools are rocky hollows left behind by the ebbing sea.");
/// assert_eq!(draft.word_count, draft.content.chars().count());
/// assert!(draft.is_valid());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    /// Article title
    pub title: String,
    /// Article body
    pub content: String,
    /// Length of `content` in characters
    pub word_count: usize,
}

impl Draft {
    /// Create a draft, deriving `word_count` from the body.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        let word_count = content.chars().count();
        Self {
            title: title.into(),
            content,
            word_count,
        }
    }

    /// Whether the draft has a body long enough to be kept.
    pub fn is_valid(&self) -> bool {
        self.is_valid_with(MIN_BODY_CHARS)
    }

    /// Whether the trimmed body has at least `min_body_chars` characters.
    pub fn is_valid_with(&self, min_body_chars: usize) -> bool {
        let body = self.content.trim();
        !body.is_empty() && body.chars().count() >= min_body_chars
    }

    /// First `max_chars` characters of the body, for previews and prompts.
    pub fn excerpt(&self, max_chars: usize) -> String {
        let body = self.content.trim();
        if body.chars().count() <= max_chars {
            return body.to_string();
        }
        let cut: String = body.chars().take(max_chars).collect();
        format!("{}...", cut.trim_end())
    }

    /// Render as a Markdown document (`# title` followed by the body).
    pub fn to_markdown(&self) -> String {
        format!("# {}\n\n{}\n", self.title.trim(), self.content.trim())
    }
}
