//! Prompt templates for the author/critic loop

use crate::draft::{BODY_MARKER, Draft, END_MARKER, TITLE_MARKER};
use crate::review::ReviewVerdict;

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt for the author
    pub fn author_system() -> &'static str {
        r#"You are an experienced writer producing articles for a general audience.
Write accurate, well-structured prose. Avoid repetition and filler.
Always answer in the exact marker format you are given, with nothing before or after it."#
    }

    /// User prompt for the first draft
    pub fn create_prompt(topic: &str, target_length: usize, style: Option<&str>) -> String {
        let style_line = style
            .map(|s| format!("Style: {}\n", s))
            .unwrap_or_default();
        format!(
            r#"Write an article about the following topic:

{topic}

Target length: about {target_length} characters.
{style_line}
Respond in exactly this format:
{TITLE_MARKER}
<a short title>
{BODY_MARKER}
<the article body>
{END_MARKER}"#
        )
    }

    /// User prompt for a revision
    pub fn revise_prompt(draft: &Draft, verdict: &ReviewVerdict) -> String {
        let mut prompt = format!(
            r#"Revise the article below based on the reviewer's feedback.

Current title: {}

Current body:
{}

Reviewer opinion (score {}/10):
{}
"#,
            draft.title, draft.content, verdict.score, verdict.opinion
        );

        let feedback = verdict.feedback_lines();
        if !feedback.is_empty() {
            prompt.push_str("\nPoints to address:\n");
            for line in feedback {
                prompt.push_str(&format!("- {}\n", line));
            }
        }

        prompt.push_str(&format!(
            r#"
Keep what works, fix what the reviewer flagged, and remove redundant passages.
Respond in exactly this format:
{TITLE_MARKER}
<title>
{BODY_MARKER}
<revised body>
{END_MARKER}"#
        ));

        prompt
    }

    /// System prompt for the critic
    pub fn critic_system() -> &'static str {
        r#"You are a strict editor reviewing article drafts.
Check facts, structure, clarity, and redundancy. Be specific in your criticism.
Answer with a single JSON object and nothing else."#
    }

    /// User prompt for a review
    pub fn review_prompt(draft: &Draft) -> String {
        format!(
            r#"Review the following article.

Title: {}

Body:
{}

Return a JSON object with these fields:
{{
  "opinion": "overall assessment in a few sentences",
  "needs_revision": true or false,
  "score": integer from 0 to 10,
  "fact_errors": ["factual errors, if any"],
  "redundant_content": ["redundant passages, if any"],
  "issues": ["other problems"],
  "suggestions": ["concrete improvements"]
}}

Set needs_revision to false only if the article is ready to publish."#,
            draft.title, draft.content
        )
    }

    /// Prompt for an illustration of a finished draft
    pub fn illustration_prompt(draft: &Draft, style: Option<&str>) -> String {
        let mut prompt = format!(
            "Editorial illustration for an article titled \"{}\". Theme: {}",
            draft.title,
            draft.excerpt(200)
        );
        if let Some(style) = style {
            prompt.push_str(&format!(". Style: {}", style));
        }
        prompt.push_str(". No text or lettering in the image.");
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_prompt_contains_markers() {
        let prompt = PromptTemplate::create_prompt("Tidal power", 1200, Some("conversational"));
        assert!(prompt.contains("Tidal power"));
        assert!(prompt.contains("1200"));
        assert!(prompt.contains("Style: conversational"));
        assert!(prompt.contains(TITLE_MARKER));
        assert!(prompt.contains(BODY_MARKER));
        assert!(prompt.contains(END_MARKER));
    }

    #[test]
    fn test_create_prompt_without_style() {
        let prompt = PromptTemplate::create_prompt("Tidal power", 800, None);
        assert!(!prompt.contains("Style:"));
    }

    #[test]
    fn test_revise_prompt_lists_feedback() {
        let draft = Draft::new("Tides", "The moon pulls the ocean.");
        let verdict = ReviewVerdict::revise("Too short", 4)
            .with_fact_errors(vec!["The sun matters too".to_string()])
            .with_suggestions(vec!["Add an example".to_string()]);
        let prompt = PromptTemplate::revise_prompt(&draft, &verdict);
        assert!(prompt.contains("score 4/10"));
        assert!(prompt.contains("- Factual error: The sun matters too"));
        assert!(prompt.contains("- Suggestion: Add an example"));
        assert!(prompt.contains("The moon pulls the ocean."));
    }

    #[test]
    fn test_review_prompt_names_fields() {
        let draft = Draft::new("Tides", "Body");
        let prompt = PromptTemplate::review_prompt(&draft);
        for field in [
            "opinion",
            "needs_revision",
            "score",
            "fact_errors",
            "redundant_content",
            "issues",
            "suggestions",
        ] {
            assert!(prompt.contains(field), "missing {field}");
        }
    }

    #[test]
    fn test_illustration_prompt() {
        let draft = Draft::new("Tides", "The moon pulls the ocean.");
        let prompt = PromptTemplate::illustration_prompt(&draft, Some("watercolor"));
        assert!(prompt.contains("\"Tides\""));
        assert!(prompt.contains("Style: watercolor"));
    }
}
