//! Author response parsing.
//!
//! The author is asked to answer in a marker-delimited layout:
//!
//! ```text
//! [TITLE]
//! The title line
//! [BODY]
//! Body lines...
//! [END]
//! ```
//!
//! `[BODY]` and `[END]` are optional. When the `[TITLE]` marker is missing the
//! first non-empty line is taken as the title (Markdown heading hashes are
//! stripped) and the remaining lines form the body.

use super::entities::Draft;
use thiserror::Error;

/// Line marking that the next non-empty line is the title.
pub const TITLE_MARKER: &str = "[TITLE]";
/// Optional line marking the start of the body.
pub const BODY_MARKER: &str = "[BODY]";
/// Line terminating the body; anything after it is ignored.
pub const END_MARKER: &str = "[END]";

/// Reasons an author response cannot be turned into a [`Draft`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthorResponseError {
    #[error("Author response is empty")]
    Empty,

    #[error("Author response has no title line")]
    MissingTitle,
}

/// Parse a free-text author response into a [`Draft`].
///
/// The body may come back empty; callers decide whether the draft is usable
/// via [`Draft::is_valid`].
///
/// # Examples
///
/// ```
/// use draftloop_domain::draft::parsing::parse_author_response;
///
/// let draft = parse_author_response("[TITLE]\nOn Tides\n[BODY]\nThe moon pulls.\n[END]\nnotes").unwrap();
/// assert_eq!(draft.title, "On Tides");
/// assert_eq!(draft.content, "The moon pulls.");
///
/// let fallback = parse_author_response("# On Tides\nThe moon pulls.").unwrap();
/// assert_eq!(fallback.title, "On Tides");
/// ```
pub fn parse_author_response(response: &str) -> Result<Draft, AuthorResponseError> {
    if response.trim().is_empty() {
        return Err(AuthorResponseError::Empty);
    }

    let lines: Vec<&str> = response.lines().collect();

    let (title, body_start) = match lines.iter().position(|l| l.trim() == TITLE_MARKER) {
        Some(marker) => {
            let (offset, title) = lines[marker + 1..]
                .iter()
                .enumerate()
                .find(|(_, l)| !l.trim().is_empty())
                .ok_or(AuthorResponseError::MissingTitle)?;
            if is_marker(title) {
                return Err(AuthorResponseError::MissingTitle);
            }
            (clean_title(title), marker + 1 + offset + 1)
        }
        None => {
            let (idx, title) = lines
                .iter()
                .enumerate()
                .find(|(_, l)| !l.trim().is_empty() && !is_marker(l))
                .ok_or(AuthorResponseError::MissingTitle)?;
            (clean_title(title), idx + 1)
        }
    };

    if title.is_empty() {
        return Err(AuthorResponseError::MissingTitle);
    }

    let mut body_lines = Vec::new();
    for line in &lines[body_start.min(lines.len())..] {
        let trimmed = line.trim();
        if trimmed == END_MARKER {
            break;
        }
        if trimmed == BODY_MARKER || trimmed == TITLE_MARKER {
            continue;
        }
        body_lines.push(*line);
    }

    Ok(Draft::new(title, body_lines.join("\n").trim()))
}

fn is_marker(line: &str) -> bool {
    matches!(line.trim(), TITLE_MARKER | BODY_MARKER | END_MARKER)
}

fn clean_title(line: &str) -> String {
    line.trim()
        .trim_start_matches('#')
        .trim()
        .trim_matches(|c| c == '*' || c == '"')
        .trim()
        .to_string()
}
