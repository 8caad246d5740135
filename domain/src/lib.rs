//! Domain layer for draftloop
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Collaboration
//!
//! An author writes a [`Draft`], a critic returns a [`ReviewVerdict`], and the
//! author revises until the critic accepts or the round limit is reached.
//! Every step is recorded as a [`CollaborationEvent`].
//!
//! ## Cascade
//!
//! A media request is tried against an ordered list of providers. Failures are
//! reduced to an [`ErrorSignal`] and classified by the [`ErrorClassifier`] into
//! an [`AttemptStatus`] that decides whether to retry, skip or abort.

pub mod cascade;
pub mod collaboration;
pub mod config;
pub mod core;
pub mod draft;
pub mod prompt;
pub mod review;

// Re-export commonly used types
pub use cascade::{
    Artifact, AttemptOutcome, AttemptStatus, CascadeResult, Classification, ClassificationRule,
    ErrorClassifier, ErrorSignal, FailureKind, FnRule, KeywordRule, MediaRequest, ProviderAttempt,
    ProviderSpec, RetryPolicy, StatusCodeRule, StructuredKindRule, capability,
};
pub use collaboration::{
    Actor, CollaborationEvent, CollaborationPhase, CollaborationResult, TerminationReason, action,
};
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use core::error::DomainError;
pub use draft::{AuthorResponseError, Draft, MIN_BODY_CHARS, parse_author_response};
pub use prompt::PromptTemplate;
pub use review::{ParsedVerdict, ReviewVerdict, VerdictSource, parse_verdict};
