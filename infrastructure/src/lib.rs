//! Infrastructure layer for draftloop
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod providers;

// Re-export commonly used types
pub use config::{
    ConfigError, ConfigLoader, FileCascadeConfig, FileCollaborationConfig, FileConfig,
    FileLoggingConfig, FileMediaProviderConfig, FileOutputConfig, FileOutputFormat,
    FileTextConfig,
};
pub use logging::JsonlSessionLogger;
pub use providers::{HttpMediaProvider, OpenAiTextGenerator, RegexRule, build_classifier};
