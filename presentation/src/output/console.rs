//! Console output formatter for collaboration and cascade results

use colored::Colorize;
use draftloop_application::ArticleOutput;
use draftloop_domain::{
    Artifact, CascadeResult, CollaborationResult, OutputFormat, ReviewVerdict, TerminationReason,
};
use serde::Serialize;

/// Formats results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Disable ANSI colors for the rest of the process
    pub fn set_color(enabled: bool) {
        if !enabled {
            colored::control::set_override(false);
        }
    }

    // ==================== Collaboration ====================

    /// Format the complete collaboration result
    pub fn format_collaboration(result: &CollaborationResult) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Collaboration Result"));
        output.push('\n');
        output.push_str(&Self::collaboration_summary(result));

        if let Some(verdict) = &result.last_verdict {
            output.push_str(&Self::section_header("Last Review"));
            output.push_str(&Self::verdict(verdict));
        }

        output.push_str(&Self::section_header("History"));
        for event in &result.history {
            output.push_str(&format!(
                "  {} {:<7} {}\n",
                format!("[{}]", event.round).dimmed(),
                event.actor.as_str(),
                event.action
            ));
        }

        output.push_str(&Self::section_header("Draft"));
        output.push_str(&Self::draft_or_placeholder(result));
        output.push_str(&Self::footer());

        output
    }

    /// Format the final draft only (Markdown)
    pub fn format_collaboration_draft(result: &CollaborationResult) -> String {
        match &result.draft {
            Some(draft) => draft.to_markdown(),
            None => format!(
                "{} {}\n",
                "No draft produced:".red().bold(),
                result.termination_reason
            ),
        }
    }

    // ==================== Cascade ====================

    /// Format the complete cascade result
    pub fn format_cascade(result: &CascadeResult) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Media Cascade Result"));
        output.push('\n');
        output.push_str(&Self::cascade_summary(result));

        output.push_str(&Self::section_header("Attempts"));
        for line in result.diagnostics() {
            output.push_str(&format!("  * {}\n", line));
        }
        output.push_str(&Self::footer());

        output
    }

    /// Format the artifact only
    pub fn format_cascade_artifact(result: &CascadeResult) -> String {
        match result.artifact() {
            Some(artifact) => format!("{}\n", Self::artifact(artifact)),
            None => format!(
                "{} {}\n",
                "No artifact:".red().bold(),
                result.outcome.detail
            ),
        }
    }

    // ==================== Article ====================

    /// Format the complete article output
    pub fn format_article(output: &ArticleOutput) -> String {
        let mut text = Self::format_collaboration(&output.collaboration);

        if let Some(illustration) = &output.illustration {
            text.push_str(&Self::format_cascade(illustration));
        } else if let Some(error) = &output.illustration_error {
            text.push_str(&format!("\n{} {}\n", "Illustration:".yellow().bold(), error));
        }

        text
    }

    /// Format the draft plus the cover reference
    pub fn format_article_draft(output: &ArticleOutput) -> String {
        let mut text = Self::format_collaboration_draft(&output.collaboration);
        if let Some(artifact) = output.illustration.as_ref().and_then(|r| r.artifact()) {
            text.push_str(&format!("\n<!-- cover: {} -->\n", Self::artifact(artifact)));
        }
        text
    }

    // ==================== Dispatch ====================

    pub fn render_collaboration(result: &CollaborationResult, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => Self::format_collaboration(result),
            OutputFormat::Draft => Self::format_collaboration_draft(result),
            OutputFormat::Json => Self::format_json(result),
        }
    }

    pub fn render_cascade(result: &CascadeResult, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => Self::format_cascade(result),
            OutputFormat::Draft => Self::format_cascade_artifact(result),
            OutputFormat::Json => Self::format_json(result),
        }
    }

    pub fn render_article(output: &ArticleOutput, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => Self::format_article(output),
            OutputFormat::Draft => Self::format_article_draft(output),
            OutputFormat::Json => Self::format_json(output),
        }
    }

    /// Format as JSON
    pub fn format_json<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    // ==================== Pieces ====================

    fn collaboration_summary(result: &CollaborationResult) -> String {
        let reason = result.termination_reason.to_string();
        let reason = match result.termination_reason {
            TerminationReason::Accepted => reason.green().bold(),
            TerminationReason::MaxRounds => reason.yellow().bold(),
            _ => reason.red().bold(),
        };
        format!(
            "{} {}\n{} {} ({} revisions)\n",
            "Outcome:".cyan().bold(),
            reason,
            "Rounds:".cyan().bold(),
            result.rounds_used,
            result.revision_count()
        )
    }

    fn cascade_summary(result: &CascadeResult) -> String {
        let status = result.outcome.status.as_str();
        let status = if result.is_success() {
            status.green().bold()
        } else {
            status.red().bold()
        };
        let mut output = format!("{} {}\n", "Outcome:".cyan().bold(), status);
        if let Some(winner) = result.winner() {
            output.push_str(&format!("{} {}\n", "Provider:".cyan().bold(), winner));
        }
        if let Some(artifact) = result.artifact() {
            output.push_str(&format!(
                "{} {}\n",
                "Artifact:".cyan().bold(),
                Self::artifact(artifact)
            ));
        } else {
            output.push_str(&format!(
                "{} {}\n",
                "Detail:".cyan().bold(),
                result.outcome.detail
            ));
        }
        output.push_str(&format!(
            "{} {}\n",
            "Total tries:".cyan().bold(),
            result.total_tries()
        ));
        output
    }

    fn verdict(verdict: &ReviewVerdict) -> String {
        let mut output = format!(
            "{} {}/10  {} {}\n{}\n",
            "Score:".bold(),
            verdict.score,
            "Needs revision:".bold(),
            verdict.needs_revision,
            Self::indent(&verdict.opinion, "  ")
        );
        let feedback = verdict.feedback_lines();
        if !feedback.is_empty() {
            output.push('\n');
            for line in feedback {
                output.push_str(&format!("  * {}\n", line));
            }
        }
        output
    }

    fn draft_or_placeholder(result: &CollaborationResult) -> String {
        match &result.draft {
            Some(draft) => format!(
                "\n{}\n\n{}\n",
                draft.title.yellow().bold(),
                draft.content.trim()
            ),
            None => format!("\n{}\n", "(no draft)".dimmed()),
        }
    }

    fn artifact(artifact: &Artifact) -> String {
        match artifact {
            Artifact::Uri { uri } => uri.clone(),
            other => other.describe(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftloop_domain::{
        AttemptOutcome, AttemptStatus, CollaborationEvent, Draft, ProviderAttempt, ProviderSpec,
        action,
    };

    fn collaboration(draft: Option<Draft>, reason: TerminationReason) -> CollaborationResult {
        CollaborationResult {
            draft,
            rounds_used: 2,
            history: vec![
                CollaborationEvent::author(0, action::DRAFT_CREATED, serde_json::json!({})),
                CollaborationEvent::critic(1, action::REVIEW_COMPLETED, serde_json::json!({})),
            ],
            termination_reason: reason,
            last_verdict: Some(ReviewVerdict::approve("Clear and accurate.", 8)),
        }
    }

    fn cascade() -> CascadeResult {
        CascadeResult {
            outcome: AttemptOutcome::success(Artifact::uri("https://cdn.example/c.png"), "ok"),
            attempts: vec![
                ProviderAttempt::tried(
                    ProviderSpec::image("seedream45", 0),
                    AttemptOutcome::failure(AttemptStatus::QuotaExceeded, "HTTP 429"),
                    3,
                ),
                ProviderAttempt::tried(
                    ProviderSpec::image("flux", 1),
                    AttemptOutcome::success(Artifact::uri("https://cdn.example/c.png"), "ok"),
                    1,
                ),
            ],
        }
    }

    #[test]
    fn test_full_collaboration_report() {
        colored::control::set_override(false);
        let result = collaboration(
            Some(Draft::new("Lighthouses", "Lighthouses guided ships.")),
            TerminationReason::Accepted,
        );
        let text = ConsoleFormatter::format_collaboration(&result);
        assert!(text.contains("Outcome: Accepted by critic"));
        assert!(text.contains("Score: 8/10"));
        assert!(text.contains(action::REVIEW_COMPLETED));
        assert!(text.contains("Lighthouses guided ships."));
    }

    #[test]
    fn test_draft_only_is_markdown() {
        let result = collaboration(
            Some(Draft::new("Lighthouses", "Body text.")),
            TerminationReason::MaxRounds,
        );
        assert_eq!(
            ConsoleFormatter::render_collaboration(&result, OutputFormat::Draft),
            "# Lighthouses\n\nBody text.\n"
        );
    }

    #[test]
    fn test_missing_draft() {
        colored::control::set_override(false);
        let result = collaboration(None, TerminationReason::AuthorFailed);
        let text = ConsoleFormatter::format_collaboration_draft(&result);
        assert!(text.contains("No draft produced: Author failed"));
        assert!(ConsoleFormatter::format_collaboration(&result).contains("(no draft)"));
    }

    #[test]
    fn test_cascade_report_lists_attempts() {
        colored::control::set_override(false);
        let text = ConsoleFormatter::format_cascade(&cascade());
        assert!(text.contains("Outcome: success"));
        assert!(text.contains("Provider: flux"));
        assert!(text.contains("https://cdn.example/c.png"));
        assert!(text.contains("seedream45: quota_exceeded after 3 tries"));
        assert!(text.contains("Total tries: 4"));
    }

    #[test]
    fn test_json_is_parseable() {
        let json = ConsoleFormatter::render_cascade(&cascade(), OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["attempts"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_article_draft_mentions_cover() {
        let output = ArticleOutput {
            collaboration: collaboration(
                Some(Draft::new("Lighthouses", "Body text.")),
                TerminationReason::Accepted,
            ),
            illustration: Some(cascade()),
            illustration_error: None,
        };
        let text = ConsoleFormatter::render_article(&output, OutputFormat::Draft);
        assert!(text.starts_with("# Lighthouses"));
        assert!(text.contains("<!-- cover: https://cdn.example/c.png -->"));
    }
}
