//! Periodic refresh for list views.
//!
//! DESIGN
//! ======
//! One task per view. The fetch runs immediately, then once per period. A
//! fetch that outlives the period pushes the next tick back instead of
//! overlapping it, so at most one request is in flight per poller. Results
//! go out on a `watch` channel; failures are logged and the last good value
//! stays. Dropping or cancelling the handle aborts the task together with
//! any request it is awaiting.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::warn;

use crate::error::ApiError;

/// Shortest accepted period. A zero period would make `interval` panic.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Owner of a running poller.
pub struct PollHandle<T> {
    receiver: watch::Receiver<Option<T>>,
    task: JoinHandle<()>,
}

impl<T: Clone> PollHandle<T> {
    /// Most recent successful result.
    pub fn latest(&self) -> Option<T> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next successful result. `None` once the poller stopped.
    pub async fn changed(&mut self) -> Option<T> {
        self.receiver.changed().await.ok()?;
        self.receiver.borrow_and_update().clone()
    }

    /// Extra receiver for another consumer of the same poller.
    pub fn subscribe(&self) -> watch::Receiver<Option<T>> {
        self.receiver.clone()
    }
}

impl<T> PollHandle<T> {
    /// Stop polling. Idempotent.
    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl<T> Drop for PollHandle<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Run `fetch` now and then every `period` until the handle is cancelled.
/// Periods below one millisecond are raised to it.
pub fn spawn_poller<T, F, Fut>(period: Duration, mut fetch: F) -> PollHandle<T>
where
    T: Send + Sync + 'static,
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
{
    let (tx, receiver) = watch::channel(None);
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period.max(MIN_PERIOD));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match fetch().await {
                Ok(value) => {
                    if tx.send(Some(value)).is_err() {
                        break;
                    }
                }
                Err(e) => warn!(error = %e, "poll fetch failed"),
            }
        }
    });
    PollHandle { receiver, task }
}

#[cfg(test)]
#[path = "poll_test.rs"]
mod tests;
