//! Application layer for draftloop
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod agents;
pub mod config;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use agents::{AgentError, AuthorAgent, CriticAgent};
pub use config::{ExecutionParams, RetryPolicy};
pub use ports::{
    media_provider::{MediaProvider, ProviderFailure},
    progress::{CascadeProgress, CollaborationProgress, NoProgress},
    session_logger::{NoSessionLogger, SessionEvent, SessionLogger},
    text_generator::{GatewayError, TextGenerator},
};
pub use use_cases::collaborate::{CollaborateError, CollaborateInput, CollaborationController};
pub use use_cases::compose_article::{ArticleOutput, ComposeArticleInput, ComposeArticleUseCase};
pub use use_cases::generate_media::{CascadeError, ProviderCascade};
