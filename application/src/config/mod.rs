//! Application-level configuration.
//!
//! - [`ExecutionParams`]: per-call timeouts and draft acceptance threshold
//! - [`RetryPolicy`]: re-exported cascade retry/backoff policy

pub mod execution_params;

pub use draftloop_domain::RetryPolicy;
pub use execution_params::ExecutionParams;
