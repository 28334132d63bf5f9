//! A page stack paired with the states of its pages.

use super::error::{LifecycleError, LookupError};
use super::store::PageStateStore;
use crate::concurrency::{Cancelled, CancellingMutex};
use crate::core::{PageDefinition, PageId, PageStack};
use crate::persistence::{RepositoryError, StackRepository};
use std::sync::{Arc, Mutex, MutexGuard};
use stillwater::prelude::*;
use tracing::{debug, info};

/// How a [`PageStackState::persist`] call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    /// The stack as of the call was written.
    Saved,
    /// A later persist started first; this one was abandoned.
    Superseded,
}

/// The live navigation stack of one host and the states of its pages.
///
/// Changes that remove pages are reported to the store, so pages that
/// leave the stack have their scopes cancelled immediately.
pub struct PageStackState<D: PageDefinition, P: ?Sized> {
    stack: Mutex<PageStack<D>>,
    store: PageStateStore<D, P>,
    persistence: CancellingMutex,
}

impl<D, P> PageStackState<D, P>
where
    D: PageDefinition,
    P: ?Sized + Send + Sync + 'static,
{
    pub fn new(initial: PageStack<D>, store: PageStateStore<D, P>) -> Self {
        store.notify_stack_changed(&initial);
        Self {
            stack: Mutex::new(initial),
            store,
            persistence: CancellingMutex::new(),
        }
    }

    pub fn stack(&self) -> PageStack<D> {
        self.locked().clone()
    }

    pub fn store(&self) -> &PageStateStore<D, P> {
        &self.store
    }

    /// Push `page` and return the new stack.
    pub fn push(&self, page: D) -> PageStack<D> {
        let mut stack = self.locked();
        *stack = stack.push(page);
        debug!(stack = %stack.id(), depth = stack.len(), "page pushed");
        stack.clone()
    }

    /// Pop the head page. Returns `None`, leaving the stack as it is, when
    /// only the root page remains.
    pub fn pop(&self) -> Option<PageStack<D>> {
        let mut stack = self.locked();
        let popped = stack.tail_or_none()?;
        *stack = popped.clone();
        self.store.notify_stack_changed(&popped);
        debug!(stack = %popped.id(), depth = popped.len(), "page popped");
        Some(popped)
    }

    /// Swap in a whole new stack. Returns the pages whose state retired.
    pub fn replace(&self, next: PageStack<D>) -> Vec<PageId> {
        let mut stack = self.locked();
        let retired = self.store.notify_stack_changed(&next);
        debug!(from = %stack.id(), to = %next.id(), depth = next.len(), "stack replaced");
        *stack = next;
        retired
    }

    /// State of a page in the current stack.
    ///
    /// The stack stays locked while the state is built, so a concurrent
    /// `pop` or `replace` retires the page only after its entry exists.
    pub fn get(&self, page_id: PageId) -> Result<Arc<P>, LifecycleError> {
        let stack = self.locked();
        let saved = stack
            .get(page_id)
            .ok_or(LookupError::PageNotInStack { page_id })?;
        self.store.get(saved)
    }

    pub fn head_state(&self) -> Result<Arc<P>, LifecycleError> {
        let stack = self.locked();
        self.store.get(stack.head())
    }

    /// Save the current stack through `repository`.
    ///
    /// A persist started while another is in flight cancels the earlier
    /// one, which then resolves to [`PersistOutcome::Superseded`].
    pub async fn persist<R>(&self, repository: &R) -> Result<PersistOutcome, RepositoryError>
    where
        R: StackRepository<D> + ?Sized,
    {
        let stack = self.stack();
        let save = repository.save(&stack);
        match self
            .persistence
            .run_cancelling(|_token| save.run(&()))
            .await
        {
            Ok(result) => {
                result?;
                info!(stack = %stack.id(), depth = stack.len(), "stack persisted");
                Ok(PersistOutcome::Saved)
            }
            Err(Cancelled) => {
                debug!(stack = %stack.id(), "persist superseded");
                Ok(PersistOutcome::Superseded)
            }
        }
    }

    /// Abandon an in-flight persist, if any.
    pub fn cancel_persist(&self) {
        self.persistence.cancel();
    }

    pub fn is_persisting(&self) -> bool {
        self.persistence.is_running()
    }

    fn locked(&self) -> MutexGuard<'_, PageStack<D>> {
        self.stack.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuntimeConfig;
    use crate::lifecycle::{PageScope, PageStateFactories};
    use crate::persistence::{InMemoryStackRepository, SnapshotFormat};
    use serde::{Deserialize, Serialize};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Barrier;
    use std::time::Duration;
    use stillwater::effect::BoxedEffect;
    use tokio_util::sync::CancellationToken;

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum TestPage {
        Root,
        Child(u8),
    }

    impl PageDefinition for TestPage {
        fn kind(&self) -> &str {
            match self {
                Self::Root => "Root",
                Self::Child(_) => "Child",
            }
        }
    }

    struct Model {
        scope: PageScope,
    }

    fn state() -> PageStackState<TestPage, Model> {
        let factories = PageStateFactories::builder()
            .register_sync("Root", |_page: &TestPage, scope: &PageScope| {
                Arc::new(Model {
                    scope: scope.clone(),
                })
            })
            .register_sync("Child", |_page: &TestPage, scope: &PageScope| {
                Arc::new(Model {
                    scope: scope.clone(),
                })
            })
            .build()
            .unwrap();
        let store = PageStateStore::new(factories, CancellationToken::new(), &RuntimeConfig::default());
        PageStackState::new(PageStack::with_page(TestPage::Root), store)
    }

    #[test]
    fn push_then_pop_retires_popped_page() {
        let state = state();
        let pushed = state.push(TestPage::Child(1));
        let child = state.head_state().unwrap();
        let root_id = pushed.iter().next().unwrap().id();
        let root = state.get(root_id).unwrap();

        let popped = state.pop().unwrap();

        assert_eq!(popped.len(), 1);
        assert!(!child.scope.is_active());
        assert!(root.scope.is_active());
    }

    #[test]
    fn root_cannot_be_popped() {
        let state = state();
        let before = state.stack();

        assert!(state.pop().is_none());
        assert_eq!(state.stack(), before);
    }

    #[test]
    fn page_outside_stack_is_a_lookup_failure() {
        let state = state();
        let pushed = state.push(TestPage::Child(2));
        let child_id = pushed.head().id();
        state.pop();

        assert_eq!(
            state.get(child_id).err(),
            Some(LifecycleError::Lookup(LookupError::PageNotInStack {
                page_id: child_id
            }))
        );
    }

    #[test]
    fn pop_during_build_retires_the_built_page() {
        let building = Arc::new(Barrier::new(2));
        let gate = Arc::clone(&building);
        let factories = PageStateFactories::builder()
            .register_sync("Root", |_page: &TestPage, scope: &PageScope| {
                Arc::new(Model {
                    scope: scope.clone(),
                })
            })
            .register_sync("Child", move |_page: &TestPage, scope: &PageScope| {
                gate.wait();
                std::thread::sleep(Duration::from_millis(50));
                Arc::new(Model {
                    scope: scope.clone(),
                })
            })
            .build()
            .unwrap();
        let store = PageStateStore::new(factories, CancellationToken::new(), &RuntimeConfig::default());
        let state = PageStackState::new(PageStack::with_page(TestPage::Root), store);
        let child_id = state.push(TestPage::Child(3)).head().id();

        let child = std::thread::scope(|threads| {
            let build = threads.spawn(|| state.head_state().unwrap());
            building.wait();
            state.pop().unwrap();
            build.join().unwrap()
        });

        assert!(!state.stack().contains(child_id));
        assert!(state.store().is_retired(child_id));
        assert!(!child.scope.is_active());
    }

    #[test]
    fn replace_reports_retired_pages() {
        let state = state();
        state.push(TestPage::Child(1));
        let child_id = state.stack().head().id();
        state.head_state().unwrap();

        let retired = state.replace(PageStack::with_page(TestPage::Root));

        assert_eq!(retired, vec![child_id]);
        assert_eq!(state.stack().len(), 1);
    }

    #[tokio::test]
    async fn persist_saves_current_stack() {
        let state = state();
        state.push(TestPage::Child(5));
        let repository = InMemoryStackRepository::new(SnapshotFormat::Json);

        let outcome = state.persist(&repository).await.unwrap();
        let loaded = repository.load(state.stack().id()).run(&()).await.unwrap();

        assert_eq!(outcome, PersistOutcome::Saved);
        assert_eq!(loaded, Some(state.stack()));
        assert!(!state.is_persisting());
    }

    /// Saves made while `stalled` is set never complete.
    struct StallingRepository {
        inner: InMemoryStackRepository<TestPage>,
        stalled: AtomicBool,
    }

    impl StackRepository<TestPage> for StallingRepository {
        fn load(&self, id: crate::core::StackId) -> BoxedEffect<Option<PageStack<TestPage>>, RepositoryError, ()> {
            self.inner.load(id)
        }

        fn save(&self, stack: &PageStack<TestPage>) -> BoxedEffect<(), RepositoryError, ()> {
            let save = self.inner.save(stack);
            let stalled = self.stalled.load(Ordering::SeqCst);
            from_async(move |_: &()| async move {
                if stalled {
                    std::future::pending::<()>().await;
                }
                save.run(&()).await
            })
            .boxed()
        }
    }

    #[tokio::test]
    async fn newer_persist_supersedes_stalled_one() {
        let state = Arc::new(state());
        let repository = Arc::new(StallingRepository {
            inner: InMemoryStackRepository::new(SnapshotFormat::Json),
            stalled: AtomicBool::new(true),
        });

        let first = tokio::spawn({
            let state = Arc::clone(&state);
            let repository = Arc::clone(&repository);
            async move { state.persist(repository.as_ref()).await }
        });
        while !state.is_persisting() {
            tokio::task::yield_now().await;
        }

        repository.stalled.store(false, Ordering::SeqCst);
        state.push(TestPage::Child(8));
        let second = state.persist(repository.as_ref()).await.unwrap();

        assert_eq!(first.await.unwrap().unwrap(), PersistOutcome::Superseded);
        assert_eq!(second, PersistOutcome::Saved);
        let saved = repository.inner.load(state.stack().id()).run(&()).await.unwrap();
        assert_eq!(saved.map(|stack| stack.len()), Some(2));
    }
}
