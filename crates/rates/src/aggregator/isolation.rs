//! Per-source isolation boundary.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::time::timeout;

use crate::errors::RatesError;
use crate::models::SourceId;

/// Run `work` as its own task and fold every way it can go wrong into a
/// [`RatesError`].
///
/// When `permits` is given, a permit is held for the duration of the work.
/// The deadline starts once the permit is acquired, so queueing behind other
/// sources does not count against it.
pub(super) async fn isolate<T, F>(
    source_id: SourceId,
    permits: Option<Arc<Semaphore>>,
    deadline: Duration,
    work: F,
) -> Result<T, RatesError>
where
    T: Send + 'static,
    F: Future<Output = Result<T, RatesError>> + Send + 'static,
{
    let handle = tokio::spawn(async move {
        let _permit = match permits {
            Some(permits) => permits.acquire_owned().await.ok(),
            None => None,
        };
        timeout(deadline, work).await
    });

    match handle.await {
        Ok(Ok(result)) => result,
        Ok(Err(_elapsed)) => Err(RatesError::Timeout {
            source_id: source_id.into_owned(),
        }),
        Err(join_error) => Err(RatesError::TaskFailed {
            source_id: source_id.into_owned(),
            message: join_error.to_string(),
        }),
    }
}
