//! Critic response parsing.
//!
//! Critics are asked for a JSON object with the [`ReviewVerdict`] fields, but
//! models routinely wrap it in a Markdown fence or surround it with prose.
//! Parsing therefore runs in stages:
//!
//! | Stage | Input | Result |
//! |-------|-------|--------|
//! | Direct | trimmed response | [`VerdictSource::Direct`] |
//! | Salvage | fence-stripped text, then outermost `{...}` span | [`VerdictSource::Salvaged`] |
//! | Fallback | nothing parsed | [`ReviewVerdict::conservative_default`] |
//!
//! Missing fields default to an empty list, `needs_revision = true` and
//! `score = 6`.

use super::verdict::{DEFAULT_SCORE, MAX_SCORE, ReviewVerdict};
use serde::Serialize;
use serde_json::{Map, Value};

/// How a verdict was obtained from the raw critic output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictSource {
    /// The response was a well-formed JSON object.
    Direct,
    /// The JSON object had to be dug out of wrappers.
    Salvaged,
    /// Nothing parsed; the conservative default was used.
    Default,
}

/// A parsed verdict together with how it was recovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedVerdict {
    pub verdict: ReviewVerdict,
    pub source: VerdictSource,
}

/// Parse a critic response. Never fails.
///
/// # Examples
///
/// ```
/// use draftloop_domain::review::parsing::{parse_verdict, VerdictSource};
///
/// let parsed = parse_verdict("```json\n{\"needs_revision\": false, \"score\": 8}\n```");
/// assert_eq!(parsed.source, VerdictSource::Salvaged);
/// assert!(!parsed.verdict.needs_revision);
///
/// let fallback = parse_verdict("looks fine to me");
/// assert_eq!(fallback.source, VerdictSource::Default);
/// assert!(fallback.verdict.needs_revision);
/// ```
pub fn parse_verdict(response: &str) -> ParsedVerdict {
    if let Some(verdict) = parse_object(response.trim()) {
        return ParsedVerdict {
            verdict,
            source: VerdictSource::Direct,
        };
    }

    let unfenced = strip_code_fence(response);
    let salvaged = parse_object(unfenced)
        .or_else(|| outermost_object(unfenced).and_then(parse_object))
        .or_else(|| outermost_object(response).and_then(parse_object));
    if let Some(verdict) = salvaged {
        return ParsedVerdict {
            verdict,
            source: VerdictSource::Salvaged,
        };
    }

    ParsedVerdict {
        verdict: ReviewVerdict::conservative_default(),
        source: VerdictSource::Default,
    }
}

/// Remove a surrounding Markdown code fence (```` ``` ```` or ```` ```json ````).
///
/// Text before the opening fence and after the closing fence is dropped.
/// Returns the trimmed input unchanged when no fence is present.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(open) = trimmed.find("```") else {
        return trimmed;
    };
    let after_open = &trimmed[open + 3..];
    // Skip the info string (e.g. "json"); a one-line fence keeps the rest of its line
    let body_start = match after_open.find('\n') {
        Some(newline) if !after_open[..newline].contains("```") => newline + 1,
        _ => after_open.len() - after_open.trim_start_matches(is_info_char).len(),
    };
    let body = &after_open[body_start..];
    match body.rfind("```") {
        Some(close) => body[..close].trim(),
        None => body.trim(),
    }
}

fn is_info_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn outermost_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn parse_object(text: &str) -> Option<ReviewVerdict> {
    match serde_json::from_str::<Value>(text).ok()? {
        Value::Object(map) => Some(verdict_from_map(&map)),
        _ => None,
    }
}

fn verdict_from_map(map: &Map<String, Value>) -> ReviewVerdict {
    ReviewVerdict {
        opinion: map
            .get("opinion")
            .map(value_to_text)
            .unwrap_or_default(),
        needs_revision: map.get("needs_revision").and_then(as_bool).unwrap_or(true),
        score: map.get("score").and_then(as_score).unwrap_or(DEFAULT_SCORE),
        fact_errors: string_list(map.get("fact_errors")),
        redundant_content: string_list(map.get("redundant_content")),
        issues: string_list(map.get("issues")),
        suggestions: string_list(map.get("suggestions")),
    }
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" => Some(true),
            "false" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn as_score(value: &Value) -> Option<u8> {
    let raw = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().split('/').next()?.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !raw.is_finite() {
        return None;
    }
    Some(raw.round().clamp(0.0, f64::from(MAX_SCORE)) as u8)
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(value_to_text)
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    }
}
