//! Collaboration subdomain
//!
//! Types describing a bounded author/critic revision session:
//!
//! - [`phase::CollaborationPhase`]: state machine phases
//! - [`phase::TerminationReason`]: why a session stopped
//! - [`event::CollaborationEvent`]: append-only audit trail entries
//! - [`result::CollaborationResult`]: final draft, history and reason

pub mod event;
pub mod phase;
pub mod result;

pub use event::{Actor, CollaborationEvent, action};
pub use phase::{CollaborationPhase, TerminationReason};
pub use result::CollaborationResult;
