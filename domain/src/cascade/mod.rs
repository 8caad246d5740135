//! Provider fallback cascade domain
//!
//! Provider descriptions, attempt outcomes, retry policy, and the pluggable
//! error classifier. The cascade driver lives in the application layer.

pub mod classifier;
pub mod outcome;
pub mod policy;
pub mod provider;

pub use classifier::{
    Classification, ClassificationRule, ErrorClassifier, ErrorSignal, FailureKind, FnRule,
    KeywordRule, StatusCodeRule, StructuredKindRule,
};
pub use outcome::{Artifact, AttemptOutcome, AttemptStatus, CascadeResult, ProviderAttempt};
pub use policy::RetryPolicy;
pub use provider::{MediaRequest, ProviderSpec, capability};
