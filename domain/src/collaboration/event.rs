//! Collaboration history events.
//!
//! The history is append-only and is the sole audit trail of a session: every
//! round shows up in it no matter how the session ends.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Who produced an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Actor {
    System,
    Author,
    Critic,
}

impl Actor {
    pub fn as_str(&self) -> &str {
        match self {
            Actor::System => "system",
            Actor::Author => "author",
            Actor::Critic => "critic",
        }
    }
}

impl std::fmt::Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Action tags recorded in [`CollaborationEvent::action`].
pub mod action {
    pub const SESSION_STARTED: &str = "session_started";
    pub const DRAFT_CREATED: &str = "draft_created";
    pub const AUTHOR_FAILED: &str = "author_failed";
    pub const REVIEW_COMPLETED: &str = "review_completed";
    pub const CRITIC_FAILED: &str = "critic_failed";
    pub const DRAFT_ACCEPTED: &str = "draft_accepted";
    pub const DRAFT_REVISED: &str = "draft_revised";
    pub const REVISION_FAILED: &str = "revision_failed_keeping_prior_draft";
    pub const MAX_ROUNDS_REACHED: &str = "max_rounds_reached";
    pub const CANCELLED: &str = "cancelled";
}

/// One entry in the collaboration history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollaborationEvent {
    /// Round the event belongs to (0 = initial drafting)
    pub round: usize,
    pub actor: Actor,
    /// Action tag, one of [`action`]
    pub action: String,
    /// Event-specific data
    pub payload: Value,
}

impl CollaborationEvent {
    pub fn new(round: usize, actor: Actor, action: impl Into<String>, payload: Value) -> Self {
        Self {
            round,
            actor,
            action: action.into(),
            payload,
        }
    }

    pub fn system(round: usize, action: impl Into<String>, payload: Value) -> Self {
        Self::new(round, Actor::System, action, payload)
    }

    pub fn author(round: usize, action: impl Into<String>, payload: Value) -> Self {
        Self::new(round, Actor::Author, action, payload)
    }

    pub fn critic(round: usize, action: impl Into<String>, payload: Value) -> Self {
        Self::new(round, Actor::Critic, action, payload)
    }

    pub fn is(&self, action: &str) -> bool {
        self.action == action
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_serialization() {
        let event = CollaborationEvent::critic(2, action::REVIEW_COMPLETED, json!({"score": 7}));
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["round"], 2);
        assert_eq!(value["actor"], "CRITIC");
        assert_eq!(value["action"], "review_completed");
        assert_eq!(value["payload"]["score"], 7);
    }

    #[test]
    fn test_is_action() {
        let event = CollaborationEvent::system(1, action::CRITIC_FAILED, Value::Null);
        assert!(event.is(action::CRITIC_FAILED));
        assert!(!event.is(action::DRAFT_ACCEPTED));
        assert_eq!(event.actor, Actor::System);
    }
}
