//! Generate media use case
//!
//! [`ProviderCascade`] obtains one artifact by walking an ordered provider list.
//! Attempts are strictly sequential: at most one provider call is in flight
//! for a request.
//!
//! | Classified status | Action                                                 |
//! |-------------------|--------------------------------------------------------|
//! | `Success`         | return immediately                                     |
//! | `QuotaExceeded`   | back off, retry same provider, then move on            |
//! | `TransientError`  | back off, retry same provider, then move on            |
//! | `NotSupported`    | add to the skip-set, move on without retrying          |
//! | `Fatal`           | abort the whole cascade                                |

use crate::config::RetryPolicy;
use crate::ports::media_provider::{MediaProvider, ProviderFailure};
use crate::ports::progress::{CascadeProgress, NoProgress};
use crate::ports::session_logger::{NoSessionLogger, SessionEvent, SessionLogger, event_type};
use crate::use_cases::shared::{Interrupted, is_cancelled, until_cancelled};
use draftloop_domain::{
    AttemptOutcome, AttemptStatus, CascadeResult, ErrorClassifier, MediaRequest, ProviderAttempt,
    ProviderSpec,
};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that prevent the cascade from producing a [`CascadeResult`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CascadeError {
    #[error("No providers configured")]
    NoProviders,

    #[error("Cascade cancelled")]
    Cancelled {
        /// Providers reached before cancellation
        attempts: Vec<ProviderAttempt>,
    },
}

impl CascadeError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, CascadeError::Cancelled { .. })
    }
}

/// How the attempts against one provider ended
enum ProviderRun {
    Finished { outcome: AttemptOutcome, tries: u32 },
    Interrupted { last: Option<AttemptOutcome>, tries: u32 },
}

/// Sequential multi-provider fallback with per-provider retries
pub struct ProviderCascade {
    providers: Vec<Arc<dyn MediaProvider>>,
    classifier: Arc<ErrorClassifier>,
    policy: RetryPolicy,
    cancellation_token: Option<CancellationToken>,
    logger: Arc<dyn SessionLogger>,
}

impl ProviderCascade {
    /// Providers are ordered by ascending priority; ties keep their given order.
    pub fn new(mut providers: Vec<Arc<dyn MediaProvider>>, policy: RetryPolicy) -> Self {
        providers.sort_by_key(|p| p.spec().priority);
        Self {
            providers,
            classifier: Arc::new(ErrorClassifier::standard()),
            policy,
            cancellation_token: None,
            logger: Arc::new(NoSessionLogger),
        }
    }

    pub fn with_classifier(mut self, classifier: Arc<ErrorClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Set a cancellation token checked before every attempt and during backoff.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    pub fn with_session_logger(mut self, logger: Arc<dyn SessionLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Provider specs in the order they will be tried
    pub fn provider_specs(&self) -> Vec<ProviderSpec> {
        self.providers.iter().map(|p| p.spec().clone()).collect()
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Execute the use case with default (no-op) progress
    pub async fn generate(&self, request: &MediaRequest) -> Result<CascadeResult, CascadeError> {
        self.generate_with_progress(request, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn generate_with_progress(
        &self,
        request: &MediaRequest,
        progress: &dyn CascadeProgress,
    ) -> Result<CascadeResult, CascadeError> {
        if self.providers.is_empty() {
            return Err(CascadeError::NoProviders);
        }

        info!(
            "Starting {} cascade over {} provider(s)",
            request.capability,
            self.providers.len()
        );

        // Session skip-set: lives for this call only
        let mut skip_set: HashSet<String> = HashSet::new();
        let mut attempts: Vec<ProviderAttempt> = Vec::new();
        let mut last_outcome: Option<AttemptOutcome> = None;

        for provider in &self.providers {
            let spec = provider.spec();

            if skip_set.contains(&spec.id) {
                self.record_skip(spec, "marked not supported earlier in this call", &mut attempts, progress);
                continue;
            }

            if !spec.supports(&request.capability) {
                skip_set.insert(spec.id.clone());
                let reason = format!(
                    "capability '{}' does not match request '{}'",
                    spec.capability_tag, request.capability
                );
                self.record_skip(spec, &reason, &mut attempts, progress);
                continue;
            }

            let (outcome, tries) = match self.run_provider(provider.as_ref(), request, progress).await {
                ProviderRun::Finished { outcome, tries } => (outcome, tries),
                ProviderRun::Interrupted { last, tries } => {
                    if let Some(outcome) = last {
                        self.record_attempt(ProviderAttempt::tried(spec.clone(), outcome, tries), &mut attempts);
                    }
                    info!("Cascade cancelled after {} provider(s)", attempts.len());
                    return Err(CascadeError::Cancelled { attempts });
                }
            };

            self.record_attempt(ProviderAttempt::tried(spec.clone(), outcome.clone(), tries), &mut attempts);

            match outcome.status {
                AttemptStatus::Success => {
                    info!("Provider {} succeeded on try {}", spec.id, tries);
                    return Ok(self.finish(outcome, attempts, progress));
                }
                AttemptStatus::Fatal => {
                    warn!("Provider {} failed fatally, aborting cascade: {}", spec.id, outcome.detail);
                    return Ok(self.finish(outcome, attempts, progress));
                }
                AttemptStatus::NotSupported => {
                    debug!("Adding {} to skip-set", spec.id);
                    skip_set.insert(spec.id.clone());
                }
                AttemptStatus::QuotaExceeded | AttemptStatus::TransientError => {
                    debug!("Provider {} exhausted after {} tries", spec.id, tries);
                }
            }
            last_outcome = Some(outcome);
        }

        let outcome = last_outcome
            .or_else(|| attempts.last().map(|a| a.outcome.clone()))
            .unwrap_or_else(|| {
                AttemptOutcome::failure(AttemptStatus::NotSupported, "no provider was attempted")
            });
        warn!("All providers exhausted: {}", outcome.detail);
        Ok(self.finish(outcome, attempts, progress))
    }

    /// Attempt one provider up to the policy's retry limit.
    async fn run_provider(
        &self,
        provider: &dyn MediaProvider,
        request: &MediaRequest,
        progress: &dyn CascadeProgress,
    ) -> ProviderRun {
        let spec = provider.spec();
        let max_tries = self.policy.max_tries();
        let limit = provider.timeout();
        let mut tries: u32 = 0;
        let mut last: Option<AttemptOutcome> = None;

        loop {
            if is_cancelled(&self.cancellation_token) {
                return ProviderRun::Interrupted { last, tries };
            }

            tries += 1;
            progress.on_attempt_start(spec, tries, max_tries);
            debug!("Attempting {} (try {}/{})", spec.id, tries, max_tries);

            let call = tokio::time::timeout(limit, provider.attempt(request));
            let result = match until_cancelled(&self.cancellation_token, call).await {
                Ok(Ok(result)) => result,
                Ok(Err(_elapsed)) => Err(ProviderFailure::timeout(limit)),
                Err(Interrupted) => {
                    return ProviderRun::Interrupted { last, tries: tries - 1 };
                }
            };

            let failure = match result {
                Ok(artifact) => {
                    let detail = format!("{} via {}", artifact.describe(), spec.id);
                    return ProviderRun::Finished {
                        outcome: AttemptOutcome::success(artifact, detail),
                        tries,
                    };
                }
                Err(failure) => failure,
            };

            let signal = failure.into_signal(&spec.id);
            let classification = self.classifier.explain(&signal);
            let detail = signal.summary();
            warn!(
                "Provider {} try {}/{} failed: {} -> {} (rule: {})",
                spec.id, tries, max_tries, detail, classification.status, classification.rule
            );
            progress.on_attempt_failed(spec, classification.status, &detail);

            let outcome = AttemptOutcome::failure(classification.status, detail);
            if !classification.status.is_retryable() || tries >= max_tries {
                return ProviderRun::Finished { outcome, tries };
            }
            last = Some(outcome);

            let delay = self.policy.backoff_for((tries - 1) as usize);
            if !delay.is_zero() {
                progress.on_backoff(spec, delay);
                debug!("Backing off {:?} before retrying {}", delay, spec.id);
                let slept =
                    until_cancelled(&self.cancellation_token, tokio::time::sleep(delay)).await;
                if slept.is_err() {
                    return ProviderRun::Interrupted { last, tries };
                }
            }
        }
    }

    fn record_skip(
        &self,
        spec: &ProviderSpec,
        reason: &str,
        attempts: &mut Vec<ProviderAttempt>,
        progress: &dyn CascadeProgress,
    ) {
        debug!("Skipping {}: {}", spec.id, reason);
        progress.on_skip(spec, reason);
        self.record_attempt(ProviderAttempt::skipped(spec.clone(), reason), attempts);
    }

    fn record_attempt(&self, attempt: ProviderAttempt, attempts: &mut Vec<ProviderAttempt>) {
        if let Ok(payload) = serde_json::to_value(&attempt) {
            self.logger
                .log(SessionEvent::new(event_type::PROVIDER_ATTEMPT, payload));
        }
        attempts.push(attempt);
    }

    fn finish(
        &self,
        outcome: AttemptOutcome,
        attempts: Vec<ProviderAttempt>,
        progress: &dyn CascadeProgress,
    ) -> CascadeResult {
        let result = CascadeResult { outcome, attempts };
        if let Ok(payload) = serde_json::to_value(&result) {
            self.logger
                .log(SessionEvent::new(event_type::CASCADE_RESULT, payload));
        }
        progress.on_finished(&result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{RecordingLogger, ScriptedProvider, uri};
    use draftloop_domain::{Artifact, FailureKind, KeywordRule};
    use std::time::Duration;
    use tokio::time::Instant;

    fn quota() -> Result<Artifact, ProviderFailure> {
        Err(ProviderFailure::http(429, "Too Many Requests"))
    }

    fn unavailable() -> Result<Artifact, ProviderFailure> {
        Err(ProviderFailure::http(503, "Service Unavailable"))
    }

    fn unsupported() -> Result<Artifact, ProviderFailure> {
        Err(ProviderFailure::http(400, "model does not support this size"))
    }

    fn unauthorized() -> Result<Artifact, ProviderFailure> {
        Err(ProviderFailure::http(401, "Invalid API key"))
    }

    fn policy(retries: u32, backoff_secs: &[u64]) -> RetryPolicy {
        RetryPolicy::new(
            retries,
            backoff_secs.iter().map(|s| Duration::from_secs(*s)).collect(),
        )
    }

    fn cascade(providers: &[Arc<ScriptedProvider>], policy: RetryPolicy) -> ProviderCascade {
        let providers = providers
            .iter()
            .map(|p| p.clone() as Arc<dyn MediaProvider>)
            .collect();
        ProviderCascade::new(providers, policy)
    }

    fn ids(result: &CascadeResult) -> Vec<&str> {
        result.attempts.iter().map(|a| a.provider.id.as_str()).collect()
    }

    // ==================== Ordering & success ====================

    #[tokio::test(start_paused = true)]
    async fn test_quota_exhaustion_falls_through_to_next_provider() {
        let seedream45 = Arc::new(ScriptedProvider::always(ProviderSpec::image("Seedream45", 0), quota()));
        let seedream40 = Arc::new(ScriptedProvider::new(
            ProviderSpec::image("Seedream40", 1),
            vec![uri("https://cdn.example/cover.png")],
        ));
        let flux = Arc::new(ScriptedProvider::always(
            ProviderSpec::image("AntigravityFlux", 2),
            uri("https://flux.example/x.png"),
        ));

        let started = Instant::now();
        let result = cascade(&[seedream45.clone(), seedream40.clone(), flux.clone()], policy(3, &[30, 60]))
            .generate(&MediaRequest::image("a lighthouse at dusk"))
            .await
            .unwrap();

        assert_eq!(result.outcome.status, AttemptStatus::Success);
        assert_eq!(ids(&result), vec!["Seedream45", "Seedream40"]);
        assert_eq!(result.attempts[0].outcome.status, AttemptStatus::QuotaExceeded);
        assert_eq!(result.attempts[0].tries, Some(3));
        assert_eq!(result.attempts[1].tries, Some(1));
        assert_eq!(
            result.artifact(),
            Some(&Artifact::uri("https://cdn.example/cover.png"))
        );
        assert_eq!(seedream45.calls(), 3);
        assert_eq!(seedream40.calls(), 1);
        assert_eq!(flux.calls(), 0);
        let waited = started.elapsed();
        assert!(waited >= Duration::from_secs(90) && waited < Duration::from_secs(91));
    }

    #[tokio::test]
    async fn test_providers_sorted_by_priority() {
        let late = Arc::new(ScriptedProvider::always(ProviderSpec::image("late", 9), uri("late")));
        let early = Arc::new(ScriptedProvider::always(ProviderSpec::image("early", 1), uri("early")));

        let cascade = cascade(&[late.clone(), early.clone()], RetryPolicy::no_retry());
        let order: Vec<String> = cascade.provider_specs().into_iter().map(|s| s.id).collect();
        assert_eq!(order, vec!["early", "late"]);

        let result = cascade.generate(&MediaRequest::image("x")).await.unwrap();
        assert_eq!(result.winner().map(|p| p.id.as_str()), Some("early"));
        assert_eq!(late.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_then_success_on_same_provider() {
        let flaky = Arc::new(ScriptedProvider::new(
            ProviderSpec::image("flaky", 0),
            vec![unavailable(), uri("https://ok")],
        ));
        let backup = Arc::new(ScriptedProvider::always(ProviderSpec::image("backup", 1), uri("b")));

        let result = cascade(&[flaky.clone(), backup.clone()], policy(3, &[5]))
            .generate(&MediaRequest::image("x"))
            .await
            .unwrap();

        assert!(result.is_success());
        assert_eq!(result.attempts.len(), 1);
        assert_eq!(result.attempts[0].tries, Some(2));
        assert_eq!(backup.calls(), 0);
    }

    // ==================== Skip-set ====================

    #[tokio::test(start_paused = true)]
    async fn test_not_supported_is_never_retried() {
        let p1 = Arc::new(ScriptedProvider::always(ProviderSpec::image("p1", 0), unsupported()));
        let p2 = Arc::new(ScriptedProvider::always(ProviderSpec::image("p2", 1), unavailable()));
        let p3 = Arc::new(ScriptedProvider::always(ProviderSpec::image("p3", 2), unavailable()));

        let result = cascade(&[p1.clone(), p2.clone(), p3.clone()], policy(2, &[1]))
            .generate(&MediaRequest::image("x"))
            .await
            .unwrap();

        assert_eq!(p1.calls(), 1);
        assert_eq!(p2.calls(), 2);
        assert_eq!(p3.calls(), 2);
        assert_eq!(result.attempts[0].outcome.status, AttemptStatus::NotSupported);
        assert_eq!(result.attempts[0].tries, Some(1));
        assert_eq!(result.outcome.status, AttemptStatus::TransientError);
        assert_eq!(ids(&result), vec!["p1", "p2", "p3"]);
    }

    #[tokio::test]
    async fn test_skip_set_applies_to_repeated_provider_id() {
        let first = Arc::new(ScriptedProvider::always(ProviderSpec::image("dup", 0), unsupported()));
        let again = Arc::new(ScriptedProvider::always(ProviderSpec::image("dup", 5), uri("never")));
        let other = Arc::new(ScriptedProvider::always(ProviderSpec::image("other", 9), uri("ok")));

        let result = cascade(&[first.clone(), again.clone(), other.clone()], RetryPolicy::no_retry())
            .generate(&MediaRequest::image("x"))
            .await
            .unwrap();

        assert!(result.is_success());
        assert_eq!(again.calls(), 0);
        assert!(result.attempts[1].is_skipped());
        assert_eq!(result.attempts[1].outcome.status, AttemptStatus::NotSupported);
        assert_eq!(result.winner().map(|p| p.id.as_str()), Some("other"));
    }

    #[tokio::test]
    async fn test_capability_mismatch_is_skipped() {
        let video = Arc::new(ScriptedProvider::always(ProviderSpec::video("kling", 0), uri("v")));
        let image = Arc::new(ScriptedProvider::always(ProviderSpec::image("flux", 1), uri("i")));

        let result = cascade(&[video.clone(), image.clone()], RetryPolicy::no_retry())
            .generate(&MediaRequest::image("x"))
            .await
            .unwrap();

        assert_eq!(video.calls(), 0);
        assert!(result.attempts[0].is_skipped());
        assert!(result.attempts[0].outcome.detail.contains("capability"));
        assert!(result.is_success());
    }

    #[tokio::test]
    async fn test_skip_set_does_not_leak_across_calls() {
        let provider = Arc::new(ScriptedProvider::new(
            ProviderSpec::image("p", 0),
            vec![unsupported(), uri("second call works")],
        ));
        let cascade = cascade(&[provider.clone()], RetryPolicy::no_retry());

        let first = cascade.generate(&MediaRequest::image("x")).await.unwrap();
        assert_eq!(first.outcome.status, AttemptStatus::NotSupported);

        let second = cascade.generate(&MediaRequest::image("x")).await.unwrap();
        assert!(second.is_success());
        assert_eq!(provider.calls(), 2);
    }

    // ==================== Fatal ====================

    #[tokio::test]
    async fn test_fatal_aborts_cascade() {
        let a = Arc::new(ScriptedProvider::always(ProviderSpec::image("A", 0), unauthorized()));
        let b = Arc::new(ScriptedProvider::always(ProviderSpec::image("B", 1), uri("never")));

        let result = cascade(&[a.clone(), b.clone()], policy(3, &[30]))
            .generate(&MediaRequest::image("x"))
            .await
            .unwrap();

        assert_eq!(result.outcome.status, AttemptStatus::Fatal);
        assert_eq!(a.calls(), 1);
        assert_eq!(b.calls(), 0);
        assert_eq!(result.attempts.len(), 1);
    }

    // ==================== Timeouts & backoff ====================

    #[tokio::test(start_paused = true)]
    async fn test_attempt_timeout_is_transient() {
        let slow = Arc::new(
            ScriptedProvider::always(ProviderSpec::image("slow", 0), uri("late"))
                .with_delay(Duration::from_secs(600))
                .with_timeout(Duration::from_secs(10)),
        );
        let fast = Arc::new(ScriptedProvider::always(ProviderSpec::image("fast", 1), uri("ok")));

        let result = cascade(&[slow.clone(), fast.clone()], RetryPolicy::no_retry())
            .generate(&MediaRequest::image("x"))
            .await
            .unwrap();

        assert_eq!(result.attempts[0].outcome.status, AttemptStatus::TransientError);
        assert!(result.attempts[0].outcome.detail.contains("timed out"));
        assert!(result.is_success());
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_is_capped() {
        let busy = Arc::new(ScriptedProvider::always(ProviderSpec::image("busy", 0), quota()));
        let policy = policy(3, &[500]).with_max_backoff(Duration::from_secs(120));

        let started = Instant::now();
        let result = cascade(&[busy.clone()], policy)
            .generate(&MediaRequest::image("x"))
            .await
            .unwrap();

        assert_eq!(result.outcome.status, AttemptStatus::QuotaExceeded);
        assert_eq!(busy.calls(), 3);
        let waited = started.elapsed();
        assert!(waited >= Duration::from_secs(240) && waited < Duration::from_secs(241));
    }

    // ==================== Classifier plug-in ====================

    #[tokio::test]
    async fn test_provider_vocabulary_overrides_default() {
        let mut classifier = ErrorClassifier::standard();
        classifier.register_for(
            "seedream",
            KeywordRule::new(
                "seedream_sensitive",
                ["OutputImageSensitiveContentDetected"],
                AttemptStatus::NotSupported,
            ),
        );
        let seedream = Arc::new(ScriptedProvider::always(
            ProviderSpec::image("seedream", 0),
            Err(ProviderFailure::http(500, "generation rejected")
                .with_code("OutputImageSensitiveContentDetected")),
        ));
        let flux = Arc::new(ScriptedProvider::always(ProviderSpec::image("flux", 1), uri("ok")));

        let result = cascade(&[seedream.clone(), flux.clone()], policy(3, &[]))
            .with_classifier(Arc::new(classifier))
            .generate(&MediaRequest::image("x"))
            .await
            .unwrap();

        assert_eq!(seedream.calls(), 1);
        assert_eq!(result.attempts[0].outcome.status, AttemptStatus::NotSupported);
        assert!(result.is_success());
    }

    #[tokio::test]
    async fn test_structured_kind_from_adapter() {
        let p = Arc::new(ScriptedProvider::always(
            ProviderSpec::image("p", 0),
            Err(ProviderFailure::new("opaque").with_kind(FailureKind::Unauthorized)),
        ));
        let result = cascade(&[p.clone()], policy(3, &[]))
            .generate(&MediaRequest::image("x"))
            .await
            .unwrap();
        assert_eq!(result.outcome.status, AttemptStatus::Fatal);
        assert_eq!(p.calls(), 1);
    }

    // ==================== Errors & cancellation ====================

    #[tokio::test]
    async fn test_no_providers() {
        let err = ProviderCascade::new(Vec::new(), RetryPolicy::default())
            .generate(&MediaRequest::image("x"))
            .await
            .unwrap_err();
        assert_eq!(err, CascadeError::NoProviders);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_backoff() {
        let busy = Arc::new(ScriptedProvider::always(ProviderSpec::image("busy", 0), quota()));
        let next = Arc::new(ScriptedProvider::always(ProviderSpec::image("next", 1), uri("x")));
        let token = CancellationToken::new();
        let trigger = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(5)).await;
            trigger.cancel();
        });

        let err = cascade(&[busy.clone(), next.clone()], policy(3, &[30]))
            .with_cancellation(token)
            .generate(&MediaRequest::image("x"))
            .await
            .unwrap_err();

        match err {
            CascadeError::Cancelled { attempts } => {
                assert_eq!(attempts.len(), 1);
                assert_eq!(attempts[0].tries, Some(1));
                assert_eq!(attempts[0].outcome.status, AttemptStatus::QuotaExceeded);
            }
            other => panic!("expected cancellation, got {:?}", other),
        }
        assert_eq!(busy.calls(), 1);
        assert_eq!(next.calls(), 0);
    }

    #[tokio::test]
    async fn test_session_logger_records_attempts() {
        let a = Arc::new(ScriptedProvider::always(ProviderSpec::image("a", 0), unsupported()));
        let b = Arc::new(ScriptedProvider::always(ProviderSpec::image("b", 1), uri("ok")));
        let logger = Arc::new(RecordingLogger::default());

        cascade(&[a, b], RetryPolicy::no_retry())
            .with_session_logger(logger.clone())
            .generate(&MediaRequest::image("x"))
            .await
            .unwrap();

        assert_eq!(
            logger.event_types(),
            vec![
                event_type::PROVIDER_ATTEMPT,
                event_type::PROVIDER_ATTEMPT,
                event_type::CASCADE_RESULT,
            ]
        );
    }
}
