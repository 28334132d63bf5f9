//! Cache of page states keyed by page identity.

use super::error::{LifecycleError, LookupError};
use super::factory::PageStateFactories;
use super::scope::PageScope;
use crate::config::RuntimeConfig;
use crate::core::{PageDefinition, PageId, PageStack, SavedPageState};
use futures::FutureExt;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use stillwater::prelude::*;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

struct CachedPage<P: ?Sized> {
    state: Arc<P>,
    scope: PageScope,
    kind: String,
    retired: bool,
}

/// Creates, caches and retires the state object of every page.
///
/// State is built on first request for a [`PageId`] and handed out as the
/// same `Arc` afterwards. When a page leaves the stack its entry is
/// retired: the page's scope is cancelled, the parent scope is not.
///
/// # Example
///
/// ```rust
/// use pageflow::config::RuntimeConfig;
/// use pageflow::core::{PageDefinition, PageStack};
/// use pageflow::lifecycle::{PageStateFactories, PageStateStore};
/// use serde::{Deserialize, Serialize};
/// use std::sync::Arc;
/// use tokio_util::sync::CancellationToken;
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// struct Profile(String);
///
/// impl PageDefinition for Profile {
///     fn kind(&self) -> &str {
///         "Profile"
///     }
/// }
///
/// let factories = PageStateFactories::builder()
///     .register_sync("Profile", |page: &Profile, _scope| Arc::new(page.0.to_uppercase()))
///     .build()
///     .unwrap();
/// let store = PageStateStore::new(factories, CancellationToken::new(), &RuntimeConfig::default());
///
/// let stack = PageStack::with_page(Profile("ada".into()));
/// let state = store.get(stack.head()).unwrap();
/// assert_eq!(state.as_str(), "ADA");
/// assert!(Arc::ptr_eq(&state, &store.get(stack.head()).unwrap()));
/// ```
pub struct PageStateStore<D, P: ?Sized> {
    factories: PageStateFactories<D, P>,
    parent: CancellationToken,
    rebuild_retired: bool,
    cache: Mutex<HashMap<PageId, CachedPage<P>>>,
}

impl<D, P> PageStateStore<D, P>
where
    D: PageDefinition,
    P: ?Sized + Send + Sync + 'static,
{
    pub fn new(
        factories: PageStateFactories<D, P>,
        parent: CancellationToken,
        config: &RuntimeConfig,
    ) -> Self {
        Self {
            factories,
            parent,
            rebuild_retired: config.rebuild_retired_pages,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// State for `saved`, built on first request.
    ///
    /// The factory runs on the calling thread, under the cache lock, and is
    /// polled once. Concurrent callers for the same page wait for the first
    /// build and share its result. If the factory suspends, the attempt
    /// fails with [`LifecycleError::ConstructionThreadingViolation`] and
    /// nothing is cached. Factories must not call back into the store or
    /// the [`PageStackState`](super::PageStackState) that owns it.
    pub fn get(&self, saved: &SavedPageState<D>) -> Result<Arc<P>, LifecycleError> {
        let page_id = saved.id();
        let mut cache = self.cache();
        if let Some(entry) = cache.get(&page_id) {
            if !(entry.retired && self.rebuild_retired) {
                return Ok(Arc::clone(&entry.state));
            }
            debug!(page = %page_id, kind = %entry.kind, "rebuilding retired page state");
        }

        let (state, scope) = self.build(saved)?;
        cache.insert(
            page_id,
            CachedPage {
                state: Arc::clone(&state),
                scope,
                kind: saved.kind().to_string(),
                retired: false,
            },
        );
        Ok(state)
    }

    fn build(&self, saved: &SavedPageState<D>) -> Result<(Arc<P>, PageScope), LifecycleError> {
        let page_id = saved.id();
        let kind = saved.kind();
        let factory = self.factories.get(kind).ok_or_else(|| LookupError::NoFactory {
            kind: kind.to_string(),
        })?;

        let scope = PageScope::child_of(&self.parent, page_id);
        let outcome = factory(saved.page()).run(&scope).now_or_never();
        match outcome {
            Some(Ok(state)) => {
                info!(page = %page_id, kind, "page state created");
                Ok((state, scope))
            }
            Some(Err(error)) => {
                scope.cancel();
                warn!(page = %page_id, kind, %error, "page state factory failed");
                Err(error)
            }
            None => {
                scope.cancel();
                warn!(page = %page_id, kind, "page state factory suspended");
                Err(LifecycleError::ConstructionThreadingViolation {
                    page_id,
                    kind: kind.to_string(),
                })
            }
        }
    }

    /// Retire every cached page that is not in `stack`.
    ///
    /// Returns the pages retired by this call, in id order.
    pub fn notify_stack_changed(&self, stack: &PageStack<D>) -> Vec<PageId> {
        let present: HashSet<PageId> = stack.page_ids().into_iter().collect();
        let mut retired: Vec<PageId> = Vec::new();
        let mut cache = self.cache();
        for (page_id, entry) in cache.iter_mut() {
            if entry.retired || present.contains(page_id) {
                continue;
            }
            entry.retired = true;
            entry.scope.cancel();
            retired.push(*page_id);
        }
        retired.sort_unstable();
        if !retired.is_empty() {
            debug!(stack = %stack.id(), retired = ?retired, "page states retired");
        }
        retired
    }

    /// Drop retired entries. Returns how many were dropped.
    pub fn purge_retired(&self) -> usize {
        let mut cache = self.cache();
        let before = cache.len();
        cache.retain(|_, entry| !entry.retired);
        before - cache.len()
    }

    pub fn scope(&self, page_id: PageId) -> Option<PageScope> {
        self.cache().get(&page_id).map(|entry| entry.scope.clone())
    }

    pub fn is_retired(&self, page_id: PageId) -> bool {
        self.cache().get(&page_id).is_some_and(|entry| entry.retired)
    }

    pub fn contains(&self, page_id: PageId) -> bool {
        self.cache().contains_key(&page_id)
    }

    pub fn len(&self) -> usize {
        self.cache().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache().is_empty()
    }

    pub fn factories(&self) -> &PageStateFactories<D, P> {
        &self.factories
    }
}

impl<D, P: ?Sized> PageStateStore<D, P> {
    fn cache(&self) -> MutexGuard<'_, HashMap<PageId, CachedPage<P>>> {
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<D, P: ?Sized> Drop for PageStateStore<D, P> {
    fn drop(&mut self) {
        for entry in self.cache().values() {
            entry.scope.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::BuildError;
    use serde::{Deserialize, Serialize};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;
    use std::time::Duration;
    use tracing_test::traced_test;

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum TestPage {
        List,
        Detail(u32),
        Settings,
    }

    impl PageDefinition for TestPage {
        fn kind(&self) -> &str {
            match self {
                Self::List => "List",
                Self::Detail(_) => "Detail",
                Self::Settings => "Settings",
            }
        }
    }

    #[derive(Debug)]
    struct ViewModel {
        title: String,
        scope: PageScope,
    }

    fn factories(builds: Arc<AtomicUsize>) -> Result<PageStateFactories<TestPage, ViewModel>, BuildError> {
        let counted = move |page: &TestPage, scope: &PageScope| {
            builds.fetch_add(1, Ordering::SeqCst);
            Arc::new(ViewModel {
                title: format!("{page:?}"),
                scope: scope.clone(),
            })
        };
        PageStateFactories::builder()
            .register_sync("List", counted.clone())
            .register_sync("Detail", counted)
            .build()
    }

    fn store_with(config: &RuntimeConfig) -> (PageStateStore<TestPage, ViewModel>, Arc<AtomicUsize>) {
        let builds = Arc::new(AtomicUsize::new(0));
        let factories = factories(Arc::clone(&builds)).unwrap();
        (
            PageStateStore::new(factories, CancellationToken::new(), config),
            builds,
        )
    }

    fn store() -> (PageStateStore<TestPage, ViewModel>, Arc<AtomicUsize>) {
        store_with(&RuntimeConfig::default())
    }

    #[test]
    fn same_page_yields_identical_instance() {
        let (store, builds) = store();
        let saved = SavedPageState::new(TestPage::List);

        let first = store.get(&saved).unwrap();
        let second = store.get(&saved).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert_eq!(first.title, "List");
    }

    #[test]
    fn distinct_pages_of_one_kind_get_distinct_instances() {
        let (store, _) = store();
        let a = store.get(&SavedPageState::new(TestPage::Detail(1))).unwrap();
        let b = store.get(&SavedPageState::new(TestPage::Detail(1))).unwrap();

        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn unregistered_kind_fails_and_caches_nothing() {
        let (store, _) = store();
        let saved = SavedPageState::new(TestPage::Settings);

        for _ in 0..2 {
            let result = store.get(&saved);
            assert_eq!(
                result.unwrap_err(),
                LifecycleError::Lookup(LookupError::NoFactory {
                    kind: "Settings".to_string()
                })
            );
        }
        assert!(store.is_empty());
    }

    #[test]
    fn departed_page_scope_is_cancelled_parent_survives() {
        let parent = CancellationToken::new();
        let builds = Arc::new(AtomicUsize::new(0));
        let store = PageStateStore::new(factories(builds).unwrap(), parent.clone(), &RuntimeConfig::default());

        let stack = PageStack::with_page(TestPage::List);
        let deeper = stack.push(TestPage::Detail(4));
        let list = store.get(stack.head()).unwrap();
        let detail = store.get(deeper.head()).unwrap();

        let retired = store.notify_stack_changed(&stack);

        assert_eq!(retired, vec![deeper.head().id()]);
        assert!(!detail.scope.is_active());
        assert!(list.scope.is_active());
        assert!(!parent.is_cancelled());
        assert!(store.is_retired(deeper.head().id()));
    }

    #[test]
    fn new_page_of_retired_kind_gets_fresh_scope() {
        let (store, _) = store();
        let stack = PageStack::with_page(TestPage::List);
        let first = stack.push(TestPage::Detail(1));
        store.get(first.head()).unwrap();
        store.notify_stack_changed(&stack);

        let second = stack.push(TestPage::Detail(1));
        let state = store.get(second.head()).unwrap();

        assert!(state.scope.is_active());
        assert_eq!(state.scope.page_id(), second.head().id());
    }

    #[test]
    fn retired_page_is_rebuilt_when_requested_again() {
        let (store, builds) = store();
        let stack = PageStack::with_page(TestPage::List);
        let deeper = stack.push(TestPage::Detail(2));
        let old = store.get(deeper.head()).unwrap();
        store.notify_stack_changed(&stack);

        let rebuilt = store.get(deeper.head()).unwrap();

        assert!(!Arc::ptr_eq(&old, &rebuilt));
        assert!(rebuilt.scope.is_active());
        assert!(!store.is_retired(deeper.head().id()));
        assert_eq!(builds.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn retired_page_is_kept_when_rebuild_disabled() {
        let config = RuntimeConfig {
            rebuild_retired_pages: false,
            ..RuntimeConfig::default()
        };
        let (store, _) = store_with(&config);
        let stack = PageStack::with_page(TestPage::List);
        let deeper = stack.push(TestPage::Detail(2));
        let old = store.get(deeper.head()).unwrap();
        store.notify_stack_changed(&stack);

        let again = store.get(deeper.head()).unwrap();

        assert!(Arc::ptr_eq(&old, &again));
        assert!(!again.scope.is_active());
    }

    #[test]
    fn purge_drops_only_retired_entries() {
        let (store, _) = store();
        let stack = PageStack::with_page(TestPage::List);
        let deeper = stack.push(TestPage::Detail(9));
        store.get(stack.head()).unwrap();
        store.get(deeper.head()).unwrap();
        store.notify_stack_changed(&stack);

        assert_eq!(store.purge_retired(), 1);
        assert!(store.contains(stack.head().id()));
        assert!(!store.contains(deeper.head().id()));
    }

    #[test]
    fn dropping_store_cancels_page_scopes() {
        let (store, _) = store();
        let state = store.get(&SavedPageState::new(TestPage::List)).unwrap();

        drop(store);

        assert!(!state.scope.is_active());
    }

    #[test]
    #[traced_test]
    fn suspending_factory_is_a_threading_violation() {
        let factories: PageStateFactories<TestPage, ViewModel> = PageStateFactories::builder()
            .register("List", |_page: &TestPage| {
                from_async(|_scope: &PageScope| async {
                    futures::future::pending::<Result<Arc<ViewModel>, LifecycleError>>().await
                })
                .boxed()
            })
            .build()
            .unwrap();
        let store = PageStateStore::new(factories, CancellationToken::new(), &RuntimeConfig::default());
        let saved = SavedPageState::new(TestPage::List);

        let result = store.get(&saved);

        assert_eq!(
            result.unwrap_err(),
            LifecycleError::ConstructionThreadingViolation {
                page_id: saved.id(),
                kind: "List".to_string()
            }
        );
        assert!(store.is_empty());
        assert!(logs_contain("page state factory suspended"));
    }

    #[test]
    fn failing_factory_error_is_surfaced() {
        let factories: PageStateFactories<TestPage, ViewModel> = PageStateFactories::builder()
            .register("List", |page: &TestPage| {
                fail(LifecycleError::factory_failed(page.kind(), "offline")).boxed()
            })
            .build()
            .unwrap();
        let store = PageStateStore::new(factories, CancellationToken::new(), &RuntimeConfig::default());

        let result = store.get(&SavedPageState::new(TestPage::List));

        assert!(matches!(
            result,
            Err(LifecycleError::FactoryFailed { ref reason, .. }) if reason == "offline"
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn trait_object_states_are_supported() {
        trait Titled: Send + Sync {
            fn title(&self) -> String;
        }
        struct Plain(&'static str);
        impl Titled for Plain {
            fn title(&self) -> String {
                self.0.to_string()
            }
        }

        let factories: PageStateFactories<TestPage, dyn Titled> = PageStateFactories::builder()
            .register_sync("List", |_page: &TestPage, _scope: &PageScope| {
                Arc::new(Plain("list")) as Arc<dyn Titled>
            })
            .build()
            .unwrap();
        let store = PageStateStore::new(factories, CancellationToken::new(), &RuntimeConfig::default());

        let state = store.get(&SavedPageState::new(TestPage::List)).unwrap();
        assert_eq!(state.title(), "list");
    }

    #[test]
    fn concurrent_requests_build_once() {
        let builds = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&builds);
        let factories: PageStateFactories<TestPage, ViewModel> = PageStateFactories::builder()
            .register_sync("List", move |page: &TestPage, scope: &PageScope| {
                counter.fetch_add(1, Ordering::SeqCst);
                std::thread::sleep(Duration::from_millis(50));
                Arc::new(ViewModel {
                    title: format!("{page:?}"),
                    scope: scope.clone(),
                })
            })
            .build()
            .unwrap();
        let store = PageStateStore::new(factories, CancellationToken::new(), &RuntimeConfig::default());
        let saved = SavedPageState::new(TestPage::List);
        let start = Barrier::new(2);

        let (a, b) = std::thread::scope(|threads| {
            let request = || {
                start.wait();
                store.get(&saved).unwrap()
            };
            let a = threads.spawn(request);
            let b = threads.spawn(request);
            (a.join().unwrap(), b.join().unwrap())
        });

        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(store.len(), 1);
        assert!(a.scope.is_active());
    }
}
