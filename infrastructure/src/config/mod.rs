//! Configuration file loading for draftloop
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `DRAFTLOOP_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./draftloop.toml` or `./.draftloop.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/draftloop/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileCascadeConfig, FileCollaborationConfig, FileConfig, FileLoggingConfig,
    FileMediaProviderConfig, FileOutputConfig, FileOutputFormat, FilePatternRule,
    FileResponseFormat, FileTextConfig, FileVocabularyConfig,
};
pub use loader::{ConfigError, ConfigLoader};
