//! Author and critic agents
//!
//! Thin wrappers around a [`TextGenerator`](crate::ports::text_generator::TextGenerator)
//! that build prompts, bound each call with a timeout, and parse the output
//! into domain types.

pub mod author;
pub mod critic;

use crate::ports::text_generator::GatewayError;
use draftloop_domain::AuthorResponseError;
use std::time::Duration;
use thiserror::Error;

pub use author::AuthorAgent;
pub use critic::CriticAgent;

/// Errors returned by a single agent call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AgentError {
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Unusable author response: {0}")]
    Unparsable(#[from] AuthorResponseError),

    #[error("Draft rejected: {0}")]
    InvalidDraft(String),
}

/// Run one completion bounded by `limit`.
pub(crate) async fn complete_within(
    generator: &dyn crate::ports::text_generator::TextGenerator,
    limit: Duration,
    system_prompt: &str,
    prompt: &str,
) -> Result<String, AgentError> {
    match tokio::time::timeout(limit, generator.complete(system_prompt, prompt)).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(AgentError::Timeout(limit)),
    }
}
