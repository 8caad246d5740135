//! Port for structured session logging.
//!
//! Defines the [`SessionLogger`] trait for recording session events (drafts,
//! verdicts, provider attempts, final results) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the session
//! transcript in a machine-readable format (JSONL).

use serde_json::Value;

/// Event type tags written by the use cases.
pub mod event_type {
    pub const COLLABORATION_EVENT: &str = "collaboration_event";
    pub const COLLABORATION_RESULT: &str = "collaboration_result";
    pub const PROVIDER_ATTEMPT: &str = "provider_attempt";
    pub const CASCADE_RESULT: &str = "cascade_result";
}

/// A structured session event for logging.
#[derive(Debug, Clone)]
pub struct SessionEvent {
    /// Event type identifier, one of [`event_type`]
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl SessionEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging session events to a structured log.
///
/// `log` is synchronous and infallible; write failures are dropped by the
/// implementation so they never disturb the session.
pub trait SessionLogger: Send + Sync {
    /// Record a session event.
    fn log(&self, event: SessionEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoSessionLogger;

impl SessionLogger for NoSessionLogger {
    fn log(&self, _event: SessionEvent) {}
}
