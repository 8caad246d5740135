//! Progress notification ports
//!
//! Callbacks for reporting progress of a collaboration session and of a
//! provider cascade. Implementations live in the presentation layer.

use draftloop_domain::{
    AttemptStatus, CascadeResult, CollaborationPhase, CollaborationResult, Draft, ProviderSpec,
    ReviewVerdict, VerdictSource,
};
use std::time::Duration;

/// Callback for progress updates during a collaboration session
pub trait CollaborationProgress: Send + Sync {
    /// Called when the session enters a new phase
    fn on_phase(&self, phase: &CollaborationPhase);

    /// Called when the author produced a draft that was kept
    fn on_draft(&self, _round: usize, _draft: &Draft) {}

    /// Called when the critic returned a (normalized) verdict
    fn on_verdict(&self, _round: usize, _verdict: &ReviewVerdict, _source: VerdictSource) {}

    /// Called when a step failed but the session continues
    fn on_warning(&self, _round: usize, _message: &str) {}

    /// Called once with the final result
    fn on_finished(&self, _result: &CollaborationResult) {}
}

/// Callback for progress updates during a provider cascade
pub trait CascadeProgress: Send + Sync {
    /// Called before each invocation of a provider (`try_number` is 1-based)
    fn on_attempt_start(&self, provider: &ProviderSpec, try_number: u32, max_tries: u32);

    /// Called after a failed invocation
    fn on_attempt_failed(&self, _provider: &ProviderSpec, _status: AttemptStatus, _detail: &str) {}

    /// Called before sleeping between retries
    fn on_backoff(&self, _provider: &ProviderSpec, _delay: Duration) {}

    /// Called when a provider is skipped without being invoked
    fn on_skip(&self, _provider: &ProviderSpec, _reason: &str) {}

    /// Called once with the final result
    fn on_finished(&self, _result: &CascadeResult) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl CollaborationProgress for NoProgress {
    fn on_phase(&self, _phase: &CollaborationPhase) {}
}

impl CascadeProgress for NoProgress {
    fn on_attempt_start(&self, _provider: &ProviderSpec, _try_number: u32, _max_tries: u32) {}
}
