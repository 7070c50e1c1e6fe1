//! Windowed scheduling shared by pull and push.

use crate::{Error, Result};
use futures::future::BoxFuture;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

/// Size of the parallel layer transfer window. A layer transfer may not start
/// until the layer preceding it by the length of the window has completed.
pub const LAYER_TRANSFER_WINDOW: usize = 4;

/// Drive `count` per-layer transfers through a sliding window.
///
/// `transfer` produces the future for layer `i`; each runs on its own task
/// and reports on a per-layer channel. Results are consumed in strict index
/// order, so the error returned is always the failure of the lowest-indexed
/// layer the scheduler has observed. On the first failure the cancellation
/// token fans out to all in-flight workers, aborting their transfers; the
/// scheduler does not wait for them to acknowledge.
pub(crate) async fn run_window<F>(count: usize, transfer: F) -> Result<()>
where
    F: Fn(usize) -> BoxFuture<'static, Result<()>>,
{
    let cancel = CancellationToken::new();
    let mut results: Vec<Option<oneshot::Receiver<Result<()>>>> = Vec::with_capacity(count);

    for i in 0..count + LAYER_TRANSFER_WINDOW {
        if let Some(dependent) = i.checked_sub(LAYER_TRANSFER_WINDOW) {
            if let Some(rx) = results[dependent].take() {
                let outcome = match rx.await {
                    Ok(result) => result,
                    // The worker died without reporting.
                    Err(_) => Err(Error::Aborted),
                };
                if let Err(err) = outcome {
                    tracing::warn!(layer = dependent, error = %err, "transfer aborted");
                    cancel.cancel();
                    return Err(err);
                }
            }
        }

        if i < count {
            let (tx, rx) = oneshot::channel();
            results.push(Some(rx));
            let work = transfer(i);
            let cancel = cancel.clone();
            tokio::spawn(async move {
                tokio::select! {
                    result = work => {
                        // The scheduler may have moved on; a dropped receiver
                        // discards the result.
                        let _ = tx.send(result);
                    }
                    _ = cancel.cancelled() => {}
                }
            });
        }
    }

    Ok(())
}
