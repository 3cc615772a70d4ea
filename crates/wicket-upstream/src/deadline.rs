//! Wall-clock deadline race for upstream calls

use std::future::Future;
use std::time::Duration;

use crate::error::UpstreamError;

/// Race `op` against a hard deadline
///
/// Returns the operation's own result when it resolves within `budget`,
/// otherwise `UpstreamError::Timeout`. Losing the race drops the operation
/// future, which aborts any in-flight transfer and releases the timer;
/// cancellation of the upstream socket is cooperative and handled by the
/// transport's own teardown.
pub async fn with_deadline<T, F>(budget: Duration, op: F) -> Result<T, UpstreamError>
where
    F: Future<Output = Result<T, UpstreamError>>,
{
    match tokio::time::timeout(budget, op).await {
        Ok(outcome) => outcome,
        Err(_elapsed) => Err(UpstreamError::Timeout),
    }
}
