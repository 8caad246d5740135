//! Output configuration from TOML (`[output]` section)

use serde::{Deserialize, Serialize};

// Re-export OutputFormat from domain for convenience
pub use draftloop_domain::OutputFormat as FileOutputFormat;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Default output format (overridden by `--output`)
    pub format: Option<FileOutputFormat>,
    /// Enable colored terminal output
    pub color: bool,
    /// Show spinners while calls are in flight
    pub show_progress: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
            show_progress: true,
        }
    }
}
