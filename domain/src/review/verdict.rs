//! Critic verdict value object.

use serde::{Deserialize, Serialize};

/// Highest score a verdict may carry.
pub const MAX_SCORE: u8 = 10;
/// Score cap applied when the critic reports factual errors.
pub const FACT_ERROR_SCORE_CAP: u8 = 5;
/// Score cap applied when the critic reports redundant content.
pub const REDUNDANT_SCORE_CAP: u8 = 6;
/// Score used when the critic omits one.
pub const DEFAULT_SCORE: u8 = 6;

/// The critic's structured assessment of a draft.
///
/// Built fresh every round. Use [`ReviewVerdict::normalized`] before acting on
/// a verdict so the score caps and forced revisions always hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewVerdict {
    pub opinion: String,
    pub needs_revision: bool,
    pub score: u8,
    pub fact_errors: Vec<String>,
    pub redundant_content: Vec<String>,
    pub issues: Vec<String>,
    pub suggestions: Vec<String>,
}

impl Default for ReviewVerdict {
    fn default() -> Self {
        Self {
            opinion: String::new(),
            needs_revision: true,
            score: DEFAULT_SCORE,
            fact_errors: Vec::new(),
            redundant_content: Vec::new(),
            issues: Vec::new(),
            suggestions: Vec::new(),
        }
    }
}

impl ReviewVerdict {
    /// A verdict that accepts the draft as-is.
    pub fn approve(opinion: impl Into<String>, score: u8) -> Self {
        Self {
            opinion: opinion.into(),
            needs_revision: false,
            score,
            ..Default::default()
        }
    }

    /// A verdict that asks for another revision.
    pub fn revise(opinion: impl Into<String>, score: u8) -> Self {
        Self {
            opinion: opinion.into(),
            needs_revision: true,
            score,
            ..Default::default()
        }
    }

    /// Conservative verdict used when the critic's output cannot be parsed.
    pub fn conservative_default() -> Self {
        Self::revise("<unparsable, conservative default>", DEFAULT_SCORE)
    }

    pub fn with_fact_errors(mut self, errors: Vec<String>) -> Self {
        self.fact_errors = errors;
        self
    }

    pub fn with_redundant_content(mut self, redundant: Vec<String>) -> Self {
        self.redundant_content = redundant;
        self
    }

    pub fn with_issues(mut self, issues: Vec<String>) -> Self {
        self.issues = issues;
        self
    }

    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.suggestions = suggestions;
        self
    }

    /// Apply the verdict invariants.
    ///
    /// - score is clamped to `0..=10`
    /// - any fact error forces a revision and caps the score at 5
    /// - any redundant content forces a revision and caps the score at 6
    pub fn normalized(mut self) -> Self {
        self.score = self.score.min(MAX_SCORE);
        if !self.fact_errors.is_empty() {
            self.needs_revision = true;
            self.score = self.score.min(FACT_ERROR_SCORE_CAP);
        }
        if !self.redundant_content.is_empty() {
            self.needs_revision = true;
            self.score = self.score.min(REDUNDANT_SCORE_CAP);
        }
        self
    }

    /// Whether the verdict accepts the draft.
    pub fn is_accepting(&self) -> bool {
        !self.needs_revision
    }

    /// Flatten every finding into prompt-ready bullet lines.
    pub fn feedback_lines(&self) -> Vec<String> {
        let sections: [(&str, &Vec<String>); 4] = [
            ("Factual error", &self.fact_errors),
            ("Redundant", &self.redundant_content),
            ("Issue", &self.issues),
            ("Suggestion", &self.suggestions),
        ];
        sections
            .iter()
            .flat_map(|(label, items)| items.iter().map(move |item| format!("{label}: {item}")))
            .collect()
    }
}
