//! Builder for page-state factory sets.

use super::error::BuildError;
use crate::lifecycle::{LifecycleError, PageScope, PageStateFactories, PageStateFactory};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use stillwater::effect::BoxedEffect;
use stillwater::prelude::*;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Fluent builder for [`PageStateFactories`].
///
/// Every page kind may be registered once; `build` reports every kind
/// registered more than once.
///
/// # Example
///
/// ```rust
/// use pageflow::builder::BuildError;
/// use pageflow::lifecycle::PageStateFactories;
/// use std::sync::Arc;
///
/// let result = PageStateFactories::<String, u32>::builder()
///     .register_sync("Home", |_page: &String, _scope| Arc::new(1))
///     .register_sync("Home", |_page: &String, _scope| Arc::new(2))
///     .build();
///
/// assert_eq!(
///     result.unwrap_err(),
///     BuildError::DuplicateFactoryKinds(vec!["Home".to_string()])
/// );
/// ```
pub struct PageStateFactoriesBuilder<D, P: ?Sized> {
    entries: Vec<(String, PageStateFactory<D, P>)>,
}

impl<D, P: ?Sized> Default for PageStateFactoriesBuilder<D, P> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<D, P: ?Sized> PageStateFactoriesBuilder<D, P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an effectful factory for `kind`.
    pub fn register<F>(mut self, kind: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&D) -> BoxedEffect<Arc<P>, LifecycleError, PageScope> + Send + Sync + 'static,
    {
        self.entries.push((kind.into(), Arc::new(factory)));
        self
    }

    /// Register a plain constructor for `kind`.
    pub fn register_sync<F>(self, kind: impl Into<String>, build: F) -> Self
    where
        F: Fn(&D, &PageScope) -> Arc<P> + Send + Sync + 'static,
        D: Clone + Send + 'static,
        P: Send + Sync + 'static,
    {
        let build = Arc::new(build);
        self.register(kind, move |page: &D| {
            let page = page.clone();
            let build = Arc::clone(&build);
            from_fn(move |scope: &PageScope| Ok::<_, LifecycleError>(build(&page, scope))).boxed()
        })
    }

    pub fn build(self) -> Result<PageStateFactories<D, P>, BuildError> {
        if self.entries.is_empty() {
            return Err(BuildError::NoFactories);
        }

        let mut seen: HashSet<&str> = HashSet::new();
        let checks: Vec<Validation<(), NonEmptyVec<String>>> = self
            .entries
            .iter()
            .map(|(kind, _)| {
                if seen.insert(kind.as_str()) {
                    Validation::success(())
                } else {
                    Validation::fail(kind.clone())
                }
            })
            .collect();

        if let Validation::Failure(duplicates) = Validation::all_vec(checks) {
            let mut kinds = duplicates.into_vec();
            kinds.sort();
            kinds.dedup();
            return Err(BuildError::DuplicateFactoryKinds(kinds));
        }

        let factories: HashMap<String, PageStateFactory<D, P>> = self.entries.into_iter().collect();
        Ok(PageStateFactories::from_map(factories))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(value: u32) -> impl Fn(&String, &PageScope) -> Arc<u32> + Send + Sync + 'static {
        move |_page, _scope| Arc::new(value)
    }

    #[test]
    fn builds_one_factory_per_kind() {
        let factories = PageStateFactoriesBuilder::new()
            .register_sync("Home", constant(1))
            .register_sync("Search", constant(2))
            .build()
            .unwrap();

        assert_eq!(factories.len(), 2);
        assert!(factories.contains("Home"));
        assert!(factories.contains("Search"));
        assert!(!factories.contains("Settings"));
    }

    #[test]
    fn empty_builder_is_rejected() {
        let result = PageStateFactoriesBuilder::<String, u32>::new().build();
        assert_eq!(result.unwrap_err(), BuildError::NoFactories);
    }

    #[test]
    fn every_duplicate_kind_is_reported() {
        let result = PageStateFactoriesBuilder::new()
            .register_sync("Search", constant(1))
            .register_sync("Home", constant(2))
            .register_sync("Search", constant(3))
            .register_sync("Home", constant(4))
            .register_sync("Home", constant(5))
            .register_sync("Profile", constant(6))
            .build();

        assert_eq!(
            result.unwrap_err(),
            BuildError::DuplicateFactoryKinds(vec!["Home".to_string(), "Search".to_string()])
        );
    }
}
