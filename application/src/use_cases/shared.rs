//! Shared utilities for use cases.
//!
//! Cancellation checks used by the collaboration loop and the cascade.

use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Returned when the cancellation token fired before the future finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Interrupted;

/// Check if cancellation has been requested.
pub(crate) fn is_cancelled(token: &Option<CancellationToken>) -> bool {
    token.as_ref().is_some_and(CancellationToken::is_cancelled)
}

/// Drive `fut` to completion unless the token is cancelled first.
///
/// An already-cancelled token wins without polling `fut`.
pub(crate) async fn until_cancelled<F: Future>(
    token: &Option<CancellationToken>,
    fut: F,
) -> Result<F::Output, Interrupted> {
    match token {
        Some(token) => {
            tokio::select! {
                biased;
                _ = token.cancelled() => Err(Interrupted),
                output = fut => Ok(output),
            }
        }
        None => Ok(fut.await),
    }
}
