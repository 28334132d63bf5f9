//! Cancellation scope owned by one page's state.

use crate::core::PageId;
use std::future::Future;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// The lifetime of one page's state.
///
/// A scope is a child of the store's parent scope: cancelling the parent
/// cancels every page scope, while cancelling a page scope leaves its
/// siblings and the parent running. A page's scope is cancelled when the
/// page leaves the stack.
#[derive(Clone, Debug)]
pub struct PageScope {
    page_id: PageId,
    token: CancellationToken,
}

impl PageScope {
    pub(crate) fn child_of(parent: &CancellationToken, page_id: PageId) -> Self {
        Self {
            page_id,
            token: parent.child_token(),
        }
    }

    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    pub fn is_active(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Token that fires when the scope ends. Child tokens derived from it
    /// end with it.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Completes once the scope has ended.
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }

    /// Spawn `task` on the current tokio runtime, bounded by this scope.
    ///
    /// The task is dropped at its next suspension point after the scope
    /// ends, and the handle then resolves to `None`.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn spawn<F>(&self, task: F) -> JoinHandle<Option<F::Output>>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let token = self.token.clone();
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => None,
                output = task => Some(output),
            }
        })
    }

    pub(crate) fn cancel(&self) {
        self.token.cancel();
    }
}
