//! Text generation port
//!
//! Defines the interface the author and critic agents use to reach a
//! text-generation endpoint.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during text generation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// Gateway to a text-generation model
///
/// Each call is a single stateless completion. Implementations (adapters)
/// live in the infrastructure layer and are injected by the caller.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Model identifier, used in logs and history payloads
    fn model(&self) -> &str;

    /// Complete `prompt` under `system_prompt` and return the raw text
    async fn complete(&self, system_prompt: &str, prompt: &str) -> Result<String, GatewayError>;
}
