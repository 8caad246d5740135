//! Author agent: writes and revises drafts.

use super::{AgentError, complete_within};
use crate::config::ExecutionParams;
use crate::ports::text_generator::TextGenerator;
use draftloop_domain::{Draft, PromptTemplate, ReviewVerdict, parse_author_response};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Produces drafts through a text generator.
///
/// Every returned draft satisfies `is_valid_with(min_body_chars)`; anything
/// shorter comes back as [`AgentError::InvalidDraft`].
pub struct AuthorAgent {
    generator: Arc<dyn TextGenerator>,
    timeout: Duration,
    min_body_chars: usize,
}

impl AuthorAgent {
    pub fn new(generator: Arc<dyn TextGenerator>, params: &ExecutionParams) -> Self {
        Self {
            generator,
            timeout: params.author_timeout,
            min_body_chars: params.min_body_chars,
        }
    }

    pub fn model(&self) -> &str {
        self.generator.model()
    }

    /// Write the first draft for `topic`.
    pub async fn create(
        &self,
        topic: &str,
        target_length: usize,
        style: Option<&str>,
    ) -> Result<Draft, AgentError> {
        let prompt = PromptTemplate::create_prompt(topic, target_length, style);
        self.write(&prompt).await
    }

    /// Rewrite `draft` according to `verdict`.
    pub async fn revise(&self, draft: &Draft, verdict: &ReviewVerdict) -> Result<Draft, AgentError> {
        let prompt = PromptTemplate::revise_prompt(draft, verdict);
        self.write(&prompt).await
    }

    async fn write(&self, prompt: &str) -> Result<Draft, AgentError> {
        let raw = complete_within(
            self.generator.as_ref(),
            self.timeout,
            PromptTemplate::author_system(),
            prompt,
        )
        .await?;
        debug!("Author {} returned {} bytes", self.model(), raw.len());

        let draft = parse_author_response(&raw)?;
        if !draft.is_valid_with(self.min_body_chars) {
            return Err(AgentError::InvalidDraft(format!(
                "body has {} characters, need at least {}",
                draft.content.trim().chars().count(),
                self.min_body_chars
            )));
        }
        Ok(draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::text_generator::GatewayError;
    use crate::test_support::{ScriptedTextGenerator, author_reply, long_body};

    fn agent(generator: Arc<ScriptedTextGenerator>) -> AuthorAgent {
        AuthorAgent::new(generator, &ExecutionParams::default())
    }

    #[tokio::test]
    async fn test_create_parses_markers() {
        let body = long_body("tides");
        let generator = Arc::new(ScriptedTextGenerator::new(vec![Ok(author_reply(
            "On Tides", &body,
        ))]));
        let draft = agent(generator.clone())
            .create("tides", 800, Some("plain"))
            .await
            .unwrap();

        assert_eq!(draft.title, "On Tides");
        assert_eq!(draft.content, body);
        let calls = generator.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].1.contains("tides"));
        assert!(calls[0].1.contains("Style: plain"));
    }

    #[tokio::test]
    async fn test_short_body_is_rejected() {
        let generator = Arc::new(ScriptedTextGenerator::new(vec![Ok(author_reply(
            "Tiny", "Too short.",
        ))]));
        let err = agent(generator).create("x", 100, None).await.unwrap_err();
        assert!(matches!(err, AgentError::InvalidDraft(_)));
    }

    #[tokio::test]
    async fn test_empty_response_is_unparsable() {
        let generator = Arc::new(ScriptedTextGenerator::new(vec![Ok("   ".to_string())]));
        let err = agent(generator).create("x", 100, None).await.unwrap_err();
        assert_eq!(err, AgentError::Unparsable(draftloop_domain::AuthorResponseError::Empty));
    }

    #[tokio::test]
    async fn test_gateway_error_propagates() {
        let generator = Arc::new(ScriptedTextGenerator::new(vec![Err(
            GatewayError::RequestFailed("503".to_string()),
        )]));
        let draft = Draft::new("t", long_body("b"));
        let err = agent(generator)
            .revise(&draft, &ReviewVerdict::revise("meh", 4))
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Gateway(GatewayError::RequestFailed(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_generator_times_out() {
        let generator = Arc::new(
            ScriptedTextGenerator::new(vec![Ok(author_reply("Late", &long_body("late")))])
                .with_delay(Duration::from_secs(600)),
        );
        let params = ExecutionParams::default().with_author_timeout(Duration::from_secs(5));
        let err = AuthorAgent::new(generator, &params)
            .create("x", 100, None)
            .await
            .unwrap_err();
        assert_eq!(err, AgentError::Timeout(Duration::from_secs(5)));
    }
}
