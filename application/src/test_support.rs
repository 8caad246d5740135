//! Scripted port implementations shared by the unit tests.

use crate::ports::media_provider::{MediaProvider, ProviderFailure};
use crate::ports::session_logger::{SessionEvent, SessionLogger};
use crate::ports::text_generator::{GatewayError, TextGenerator};
use async_trait::async_trait;
use draftloop_domain::{Artifact, MediaRequest, ProviderSpec};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// Text generator that replays scripted replies in order and records prompts.
pub struct ScriptedTextGenerator {
    model: String,
    replies: Mutex<VecDeque<Result<String, GatewayError>>>,
    calls: Mutex<Vec<(String, String)>>,
    delay: Option<Duration>,
}

impl ScriptedTextGenerator {
    pub fn new(replies: Vec<Result<String, GatewayError>>) -> Self {
        Self {
            model: "scripted".to_string(),
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// `(system_prompt, prompt)` pairs in call order
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl TextGenerator for ScriptedTextGenerator {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, system_prompt: &str, prompt: &str) -> Result<String, GatewayError> {
        self.calls
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), prompt.to_string()));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::Other("script exhausted".to_string())))
    }
}

/// Media provider that replays scripted results and counts invocations.
pub struct ScriptedProvider {
    spec: ProviderSpec,
    results: Mutex<VecDeque<Result<Artifact, ProviderFailure>>>,
    /// Result returned once the script runs out
    repeat: Result<Artifact, ProviderFailure>,
    calls: Mutex<u32>,
    delay: Option<Duration>,
    timeout: Duration,
}

impl ScriptedProvider {
    pub fn new(spec: ProviderSpec, results: Vec<Result<Artifact, ProviderFailure>>) -> Self {
        Self {
            spec,
            results: Mutex::new(results.into()),
            repeat: Err(ProviderFailure::new("script exhausted")),
            calls: Mutex::new(0),
            delay: None,
            timeout: Duration::from_secs(60),
        }
    }

    /// Provider that returns the same result forever.
    pub fn always(spec: ProviderSpec, result: Result<Artifact, ProviderFailure>) -> Self {
        let mut provider = Self::new(spec, Vec::new());
        provider.repeat = result;
        provider
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn calls(&self) -> u32 {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl MediaProvider for ScriptedProvider {
    fn spec(&self) -> &ProviderSpec {
        &self.spec
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn attempt(&self, _request: &MediaRequest) -> Result<Artifact, ProviderFailure> {
        *self.calls.lock().unwrap() += 1;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.repeat.clone())
    }
}

/// Session logger that keeps every event in memory.
#[derive(Default)]
pub struct RecordingLogger {
    events: Mutex<Vec<SessionEvent>>,
}

impl RecordingLogger {
    pub fn event_types(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().iter().map(|e| e.event_type).collect()
    }
}

impl SessionLogger for RecordingLogger {
    fn log(&self, event: SessionEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Body text comfortably above the minimum length.
pub fn long_body(topic: &str) -> String {
    format!(
        "This article explains {topic} in plain words. It covers the basics, a worked example, and common mistakes readers make."
    )
}

/// Author reply in marker format.
pub fn author_reply(title: &str, body: &str) -> String {
    format!("[TITLE]\n{title}\n[BODY]\n{body}\n[END]")
}

/// Critic reply accepting the draft.
pub fn accept_json(score: u8) -> String {
    format!(r#"{{"opinion": "ready", "needs_revision": false, "score": {score}}}"#)
}

/// Critic reply asking for a revision.
pub fn revise_json(score: u8, issue: &str) -> String {
    format!(
        r#"{{"opinion": "needs work", "needs_revision": true, "score": {score}, "issues": ["{issue}"]}}"#
    )
}

pub fn uri(value: &str) -> Result<Artifact, ProviderFailure> {
    Ok(Artifact::uri(value))
}
