//! Collaborate use case
//!
//! Drives the bounded author/critic loop:
//!
//! ```text
//! Drafting ─ok─▶ Reviewing(1) ─accept─▶ ACCEPTED
//!    │                 │
//!    │ fail            ├─critic fails──▶ CRITIC_FAILED (keeps last valid draft)
//!    ▼                 ▼
//! AUTHOR_FAILED    Revising(1) ─▶ Reviewing(2) ─▶ … ─▶ MAX_ROUNDS
//! ```
//!
//! A failed or too-short revision never replaces the current draft; the loop
//! records a `revision_failed_keeping_prior_draft` event and moves on to the
//! next round.

use crate::agents::{AuthorAgent, CriticAgent};
use crate::config::ExecutionParams;
use crate::ports::progress::{CollaborationProgress, NoProgress};
use crate::ports::session_logger::{NoSessionLogger, SessionEvent, SessionLogger, event_type};
use crate::ports::text_generator::TextGenerator;
use crate::use_cases::shared::{Interrupted, is_cancelled, until_cancelled};
use draftloop_domain::{
    CollaborationEvent, CollaborationPhase, CollaborationResult, DomainError, Draft,
    ReviewVerdict, TerminationReason, action,
};
use serde_json::{Value, json};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that prevent a session from starting
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollaborateError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] DomainError),
}

/// Input for the Collaborate use case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollaborateInput {
    pub topic: String,
    /// Length guidance for the author, never enforced
    pub target_length: usize,
    pub style: Option<String>,
    /// Maximum review rounds (at least 1)
    pub max_rounds: usize,
}

impl CollaborateInput {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            target_length: 1500,
            style: None,
            max_rounds: 3,
        }
    }

    pub fn with_target_length(mut self, target_length: usize) -> Self {
        self.target_length = target_length;
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    fn validate(&self) -> Result<(), DomainError> {
        if self.max_rounds == 0 {
            return Err(DomainError::InvalidRoundLimit(self.max_rounds));
        }
        if self.topic.trim().is_empty() {
            return Err(DomainError::InvalidTopic("topic is empty".to_string()));
        }
        Ok(())
    }
}

/// Append-only history that mirrors every event to the session logger.
struct History<'a> {
    events: Vec<CollaborationEvent>,
    logger: &'a dyn SessionLogger,
}

impl<'a> History<'a> {
    fn new(logger: &'a dyn SessionLogger) -> Self {
        Self {
            events: Vec::new(),
            logger,
        }
    }

    fn record(&mut self, event: CollaborationEvent) {
        debug!(
            "[round {}] {} {}",
            event.round, event.actor, event.action
        );
        if let Ok(payload) = serde_json::to_value(&event) {
            self.logger
                .log(SessionEvent::new(event_type::COLLABORATION_EVENT, payload));
        }
        self.events.push(event);
    }
}

fn draft_payload(draft: &Draft) -> Value {
    json!({
        "title": draft.title,
        "content": draft.content,
        "word_count": draft.word_count,
    })
}

fn error_payload(error: &impl std::fmt::Display) -> Value {
    json!({ "error": error.to_string() })
}

/// Use case driving one author/critic session
pub struct CollaborationController {
    author: AuthorAgent,
    critic: CriticAgent,
    cancellation_token: Option<CancellationToken>,
    logger: Arc<dyn SessionLogger>,
}

impl CollaborationController {
    pub fn new(
        author: Arc<dyn TextGenerator>,
        critic: Arc<dyn TextGenerator>,
        params: &ExecutionParams,
    ) -> Self {
        Self::from_agents(
            AuthorAgent::new(author, params),
            CriticAgent::new(critic, params),
        )
    }

    pub fn from_agents(author: AuthorAgent, critic: CriticAgent) -> Self {
        Self {
            author,
            critic,
            cancellation_token: None,
            logger: Arc::new(NoSessionLogger),
        }
    }

    /// Set a cancellation token checked between steps and raced against every call.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    pub fn with_session_logger(mut self, logger: Arc<dyn SessionLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn run(&self, input: CollaborateInput) -> Result<CollaborationResult, CollaborateError> {
        self.run_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn run_with_progress(
        &self,
        input: CollaborateInput,
        progress: &dyn CollaborationProgress,
    ) -> Result<CollaborationResult, CollaborateError> {
        input.validate()?;

        info!(
            "Starting collaboration on {:?} (author: {}, critic: {}, max rounds: {})",
            input.topic,
            self.author.model(),
            self.critic.model(),
            input.max_rounds
        );

        let mut history = History::new(self.logger.as_ref());
        history.record(CollaborationEvent::system(
            0,
            action::SESSION_STARTED,
            json!({
                "topic": input.topic,
                "target_length": input.target_length,
                "style": input.style,
                "max_rounds": input.max_rounds,
                "author_model": self.author.model(),
                "critic_model": self.critic.model(),
            }),
        ));

        // Step 1: Drafting
        progress.on_phase(&CollaborationPhase::Drafting);
        let created = until_cancelled(
            &self.cancellation_token,
            self.author
                .create(&input.topic, input.target_length, input.style.as_deref()),
        )
        .await;

        let mut draft = match created {
            Ok(Ok(draft)) => draft,
            Ok(Err(e)) => {
                warn!("Author failed to produce a first draft: {}", e);
                history.record(CollaborationEvent::system(
                    0,
                    action::AUTHOR_FAILED,
                    error_payload(&e),
                ));
                return Ok(self.finish(history, None, 0, TerminationReason::AuthorFailed, None, progress));
            }
            Err(Interrupted) => {
                return Ok(self.cancelled(history, None, 0, None, progress));
            }
        };
        history.record(CollaborationEvent::author(
            0,
            action::DRAFT_CREATED,
            draft_payload(&draft),
        ));
        progress.on_draft(0, &draft);

        // Step 2: review/revise rounds
        let mut last_verdict: Option<ReviewVerdict> = None;

        for round in 1..=input.max_rounds {
            if is_cancelled(&self.cancellation_token) {
                return Ok(self.cancelled(history, Some(draft), round - 1, last_verdict, progress));
            }

            progress.on_phase(&CollaborationPhase::Reviewing { round });
            let reviewed =
                until_cancelled(&self.cancellation_token, self.critic.review(&draft)).await;

            let parsed = match reviewed {
                Ok(Ok(parsed)) => parsed,
                Ok(Err(e)) => {
                    warn!("Critic failed in round {}: {}", round, e);
                    history.record(CollaborationEvent::system(
                        round,
                        action::CRITIC_FAILED,
                        error_payload(&e),
                    ));
                    return Ok(self.finish(
                        history,
                        Some(draft),
                        round,
                        TerminationReason::CriticFailed,
                        last_verdict,
                        progress,
                    ));
                }
                Err(Interrupted) => {
                    return Ok(self.cancelled(history, Some(draft), round, last_verdict, progress));
                }
            };

            let verdict = parsed.verdict;
            history.record(CollaborationEvent::critic(
                round,
                action::REVIEW_COMPLETED,
                json!({ "verdict": verdict, "source": parsed.source }),
            ));
            progress.on_verdict(round, &verdict, parsed.source);

            if verdict.is_accepting() {
                progress.on_phase(&CollaborationPhase::Accepting { round });
                history.record(CollaborationEvent::system(
                    round,
                    action::DRAFT_ACCEPTED,
                    json!({ "score": verdict.score }),
                ));
                return Ok(self.finish(
                    history,
                    Some(draft),
                    round,
                    TerminationReason::Accepted,
                    Some(verdict),
                    progress,
                ));
            }

            progress.on_phase(&CollaborationPhase::Revising { round });
            let revised = until_cancelled(
                &self.cancellation_token,
                self.author.revise(&draft, &verdict),
            )
            .await;
            last_verdict = Some(verdict);

            match revised {
                Ok(Ok(revision)) => {
                    history.record(CollaborationEvent::author(
                        round,
                        action::DRAFT_REVISED,
                        draft_payload(&revision),
                    ));
                    progress.on_draft(round, &revision);
                    draft = revision;
                }
                Ok(Err(e)) => {
                    warn!("Revision failed in round {}, keeping prior draft: {}", round, e);
                    history.record(CollaborationEvent::system(
                        round,
                        action::REVISION_FAILED,
                        error_payload(&e),
                    ));
                    progress.on_warning(round, &format!("revision failed, keeping prior draft: {}", e));
                }
                Err(Interrupted) => {
                    return Ok(self.cancelled(history, Some(draft), round, last_verdict, progress));
                }
            }
        }

        history.record(CollaborationEvent::system(
            input.max_rounds,
            action::MAX_ROUNDS_REACHED,
            json!({ "max_rounds": input.max_rounds }),
        ));
        Ok(self.finish(
            history,
            Some(draft),
            input.max_rounds,
            TerminationReason::MaxRounds,
            last_verdict,
            progress,
        ))
    }

    fn cancelled(
        &self,
        mut history: History<'_>,
        draft: Option<Draft>,
        rounds_used: usize,
        last_verdict: Option<ReviewVerdict>,
        progress: &dyn CollaborationProgress,
    ) -> CollaborationResult {
        info!("Collaboration cancelled after {} round(s)", rounds_used);
        history.record(CollaborationEvent::system(
            rounds_used,
            action::CANCELLED,
            Value::Null,
        ));
        self.finish(
            history,
            draft,
            rounds_used,
            TerminationReason::Cancelled,
            last_verdict,
            progress,
        )
    }

    fn finish(
        &self,
        history: History<'_>,
        draft: Option<Draft>,
        rounds_used: usize,
        termination_reason: TerminationReason,
        last_verdict: Option<ReviewVerdict>,
        progress: &dyn CollaborationProgress,
    ) -> CollaborationResult {
        let logger = history.logger;
        let result = CollaborationResult {
            draft,
            rounds_used,
            history: history.events,
            termination_reason,
            last_verdict,
        };

        info!(
            "Collaboration finished: {} after {} round(s)",
            termination_reason.as_str(),
            rounds_used
        );
        if let Ok(payload) = serde_json::to_value(&result) {
            logger.log(SessionEvent::new(event_type::COLLABORATION_RESULT, payload));
        }

        progress.on_phase(&CollaborationPhase::Terminal(termination_reason));
        progress.on_finished(&result);
        result
    }
}
