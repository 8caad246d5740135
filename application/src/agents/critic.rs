//! Critic agent: reviews drafts and returns normalized verdicts.

use super::{AgentError, complete_within};
use crate::config::ExecutionParams;
use crate::ports::text_generator::TextGenerator;
use draftloop_domain::{Draft, ParsedVerdict, PromptTemplate, VerdictSource, parse_verdict};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Reviews drafts through a text generator.
///
/// Only the call itself can fail. Unparsable output yields the conservative
/// default verdict, and every verdict is normalized before it is returned.
pub struct CriticAgent {
    generator: Arc<dyn TextGenerator>,
    timeout: Duration,
}

impl CriticAgent {
    pub fn new(generator: Arc<dyn TextGenerator>, params: &ExecutionParams) -> Self {
        Self {
            generator,
            timeout: params.critic_timeout,
        }
    }

    pub fn model(&self) -> &str {
        self.generator.model()
    }

    pub async fn review(&self, draft: &Draft) -> Result<ParsedVerdict, AgentError> {
        let raw = complete_within(
            self.generator.as_ref(),
            self.timeout,
            PromptTemplate::critic_system(),
            &PromptTemplate::review_prompt(draft),
        )
        .await?;

        let parsed = parse_verdict(&raw);
        match parsed.source {
            VerdictSource::Direct => {}
            VerdictSource::Salvaged => debug!("Critic verdict salvaged from wrapped output"),
            VerdictSource::Default => warn!(
                "Critic {} returned unparsable output, using conservative default",
                self.model()
            ),
        }

        Ok(ParsedVerdict {
            verdict: parsed.verdict.normalized(),
            source: parsed.source,
        })
    }
}
