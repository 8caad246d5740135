//! Collaboration state machine phases and terminal reasons.

use serde::{Deserialize, Serialize};

/// Why a collaboration session stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TerminationReason {
    /// The critic accepted the draft.
    Accepted,
    /// The round limit was reached without acceptance.
    MaxRounds,
    /// The critic could not be reached; the last valid draft was kept.
    CriticFailed,
    /// The author never produced a valid first draft.
    AuthorFailed,
    /// The caller cancelled the session between steps.
    Cancelled,
}

impl TerminationReason {
    pub fn as_str(&self) -> &str {
        match self {
            TerminationReason::Accepted => "accepted",
            TerminationReason::MaxRounds => "max_rounds",
            TerminationReason::CriticFailed => "critic_failed",
            TerminationReason::AuthorFailed => "author_failed",
            TerminationReason::Cancelled => "cancelled",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            TerminationReason::Accepted => "Accepted by critic",
            TerminationReason::MaxRounds => "Round limit reached",
            TerminationReason::CriticFailed => "Critic failed",
            TerminationReason::AuthorFailed => "Author failed",
            TerminationReason::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Phase of a collaboration session
///
/// ```text
/// Drafting → Reviewing → { Accepting | Revising } → Reviewing → … → Terminal
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollaborationPhase {
    /// Author is writing the first draft
    Drafting,
    /// Critic is reviewing the current draft
    Reviewing { round: usize },
    /// Author is revising after a rejecting verdict
    Revising { round: usize },
    /// Critic accepted; the session is about to end
    Accepting { round: usize },
    /// Session ended
    Terminal(TerminationReason),
}

impl CollaborationPhase {
    pub fn as_str(&self) -> &str {
        match self {
            CollaborationPhase::Drafting => "drafting",
            CollaborationPhase::Reviewing { .. } => "reviewing",
            CollaborationPhase::Revising { .. } => "revising",
            CollaborationPhase::Accepting { .. } => "accepting",
            CollaborationPhase::Terminal(_) => "terminal",
        }
    }

    /// Round number the phase belongs to (0 while drafting).
    pub fn round(&self) -> usize {
        match self {
            CollaborationPhase::Drafting | CollaborationPhase::Terminal(_) => 0,
            CollaborationPhase::Reviewing { round }
            | CollaborationPhase::Revising { round }
            | CollaborationPhase::Accepting { round } => *round,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, CollaborationPhase::Terminal(_))
    }

    /// Whether moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(&self, next: &CollaborationPhase) -> bool {
        use CollaborationPhase::*;
        match (self, next) {
            (Terminal(_), _) => false,
            (_, Terminal(_)) => true,
            (Drafting, Reviewing { round }) => *round == 1,
            (Reviewing { round: a }, Accepting { round: b })
            | (Reviewing { round: a }, Revising { round: b }) => a == b,
            (Revising { round: a }, Reviewing { round: b }) => *b == a + 1,
            _ => false,
        }
    }
}

impl std::fmt::Display for CollaborationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollaborationPhase::Terminal(reason) => write!(f, "terminal ({})", reason.as_str()),
            CollaborationPhase::Drafting => write!(f, "drafting"),
            other => write!(f, "{} (round {})", other.as_str(), other.round()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legal_transitions() {
        use CollaborationPhase::*;
        assert!(Drafting.can_transition_to(&Reviewing { round: 1 }));
        assert!(Reviewing { round: 1 }.can_transition_to(&Revising { round: 1 }));
        assert!(Revising { round: 1 }.can_transition_to(&Reviewing { round: 2 }));
        assert!(Reviewing { round: 2 }.can_transition_to(&Accepting { round: 2 }));
        assert!(Accepting { round: 2 }.can_transition_to(&Terminal(TerminationReason::Accepted)));
    }

    #[test]
    fn test_illegal_transitions() {
        use CollaborationPhase::*;
        assert!(!Drafting.can_transition_to(&Reviewing { round: 2 }));
        assert!(!Revising { round: 1 }.can_transition_to(&Reviewing { round: 1 }));
        assert!(!Terminal(TerminationReason::MaxRounds).can_transition_to(&Drafting));
        assert!(!Drafting.can_transition_to(&Accepting { round: 1 }));
    }

    #[test]
    fn test_termination_reason_serializes_screaming() {
        let json = serde_json::to_string(&TerminationReason::MaxRounds).unwrap();
        assert_eq!(json, "\"MAX_ROUNDS\"");
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(
            CollaborationPhase::Reviewing { round: 3 }.to_string(),
            "reviewing (round 3)"
        );
        assert_eq!(
            CollaborationPhase::Terminal(TerminationReason::CriticFailed).to_string(),
            "terminal (critic_failed)"
        );
    }
}
