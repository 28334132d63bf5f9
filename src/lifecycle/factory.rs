//! Page-state factories, dispatched by page kind.

use super::error::LifecycleError;
use super::scope::PageScope;
use crate::builder::PageStateFactoriesBuilder;
use std::collections::HashMap;
use std::sync::Arc;
use stillwater::effect::BoxedEffect;

/// Builds the state of one page from its definition.
///
/// The returned effect runs with the new page's [`PageScope`] as its
/// environment and must complete without suspending.
pub type PageStateFactory<D, P> =
    Arc<dyn Fn(&D) -> BoxedEffect<Arc<P>, LifecycleError, PageScope> + Send + Sync>;

/// Registered factories, one per page kind.
pub struct PageStateFactories<D, P: ?Sized> {
    factories: HashMap<String, PageStateFactory<D, P>>,
}

impl<D, P: ?Sized> Clone for PageStateFactories<D, P> {
    fn clone(&self) -> Self {
        Self {
            factories: self.factories.clone(),
        }
    }
}

impl<D, P: ?Sized> std::fmt::Debug for PageStateFactories<D, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<&str> = self.kinds().collect();
        kinds.sort_unstable();
        f.debug_struct("PageStateFactories")
            .field("kinds", &kinds)
            .finish()
    }
}

impl<D, P: ?Sized> PageStateFactories<D, P> {
    pub fn builder() -> PageStateFactoriesBuilder<D, P> {
        PageStateFactoriesBuilder::new()
    }

    pub(crate) fn from_map(factories: HashMap<String, PageStateFactory<D, P>>) -> Self {
        Self { factories }
    }

    pub fn get(&self, kind: &str) -> Option<&PageStateFactory<D, P>> {
        self.factories.get(kind)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
