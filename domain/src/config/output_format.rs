//! Output format value object

use serde::{Deserialize, Serialize};

/// How a finished run is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Draft, round history and cascade attempts (default)
    #[default]
    Full,
    /// Only the final draft as Markdown
    Draft,
    /// JSON output
    Json,
}
