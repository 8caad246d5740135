//! Collaboration session outcome.

use super::event::{Actor, CollaborationEvent};
use super::phase::TerminationReason;
use crate::draft::Draft;
use crate::review::ReviewVerdict;
use serde::{Deserialize, Serialize};

/// Result of a collaboration session.
///
/// `draft` is `None` only when the author never produced a valid first draft
/// (or the session was cancelled before it did); in every other case it holds
/// the last valid draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollaborationResult {
    pub draft: Option<Draft>,
    /// Number of review rounds that were started
    pub rounds_used: usize,
    pub history: Vec<CollaborationEvent>,
    pub termination_reason: TerminationReason,
    /// Most recent normalized verdict, if any review succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_verdict: Option<ReviewVerdict>,
}

impl CollaborationResult {
    pub fn is_accepted(&self) -> bool {
        self.termination_reason == TerminationReason::Accepted
    }

    /// Events produced by one actor, in order.
    pub fn events_by(&self, actor: Actor) -> impl Iterator<Item = &CollaborationEvent> {
        self.history.iter().filter(move |e| e.actor == actor)
    }

    /// Events belonging to one round, in order.
    pub fn events_in_round(&self, round: usize) -> impl Iterator<Item = &CollaborationEvent> {
        self.history.iter().filter(move |e| e.round == round)
    }

    /// Number of revisions that replaced the draft.
    pub fn revision_count(&self) -> usize {
        self.history
            .iter()
            .filter(|e| e.is(super::event::action::DRAFT_REVISED))
            .count()
    }
}
