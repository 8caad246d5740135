//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL session transcript; one file per run
    pub session_log: Option<PathBuf>,
    /// Directory for daily-rolling diagnostic logs
    pub file_dir: Option<PathBuf>,
}
