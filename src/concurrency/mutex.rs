//! Latest-wins mutual exclusion for async work.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Outcome of an invocation that a newer one superseded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("superseded by a newer invocation")]
pub struct Cancelled;

struct Invocation {
    id: u64,
    token: CancellationToken,
}

/// Runs at most one piece of work at a time; starting new work cancels
/// the work in flight.
///
/// # Example
///
/// ```rust
/// use pageflow::concurrency::CancellingMutex;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mutex = CancellingMutex::new();
/// let result = mutex.run_cancelling(|_token| async { 7 }).await;
/// assert_eq!(result, Ok(7));
/// assert!(!mutex.is_running());
/// # }
/// ```
#[derive(Default)]
pub struct CancellingMutex {
    slot: Mutex<Option<Invocation>>,
    next_id: AtomicU64,
}

impl CancellingMutex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel whatever is running and run `work` in its place.
    ///
    /// `work` receives this invocation's token so it can stop
    /// cooperatively. Resolves to `Err(Cancelled)` if a later invocation
    /// or [`cancel`](Self::cancel) fires the token before `work` finishes.
    pub async fn run_cancelling<F, Fut, T>(&self, work: F) -> Result<T, Cancelled>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = T>,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();

        let previous = self.slot().replace(Invocation {
            id,
            token: token.clone(),
        });
        if let Some(previous) = previous {
            debug!(superseded = previous.id, by = id, "cancelling in-flight invocation");
            previous.token.cancel();
        }

        let _guard = SlotGuard { mutex: self, id };
        let work = work(token.clone());
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                trace!(invocation = id, "invocation cancelled");
                Err(Cancelled)
            }
            value = work => Ok(value),
        }
    }

    /// Cancel the running invocation, if any.
    pub fn cancel(&self) {
        if let Some(invocation) = self.slot().take() {
            debug!(invocation = invocation.id, "invocation cancelled explicitly");
            invocation.token.cancel();
        }
    }

    pub fn is_running(&self) -> bool {
        self.slot().is_some()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<Invocation>> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Clears the slot when an invocation ends, however it ends, unless a
/// newer invocation has taken it over.
struct SlotGuard<'a> {
    mutex: &'a CancellingMutex,
    id: u64,
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        let mut slot = self.mutex.slot();
        if slot.as_ref().is_some_and(|current| current.id == self.id) {
            *slot = None;
        }
    }
}
