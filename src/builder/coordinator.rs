//! Builder for constructing transition coordinators.

use crate::animation::{uniform_spec, TransitionSpec, TransitionSpecProvider};
use crate::builder::error::BuildError;
use crate::config::RuntimeConfig;
use crate::core::DepthOrder;
use crate::transition::{TransitionCoordinator, TransitionState};
use std::sync::Arc;

/// Builder for constructing transition coordinators with a fluent API.
///
/// # Example
///
/// ```rust
/// use pageflow::animation::{scale_animation, TransitionRole, TransitionSpec};
/// use pageflow::builder::TransitionCoordinatorBuilder;
/// use pageflow::core::{DepthOrder, PageDefinition, PageStack};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// struct Screen;
///
/// impl PageDefinition for Screen {
///     fn kind(&self) -> &str {
///         "Screen"
///     }
/// }
///
/// let coordinator = TransitionCoordinatorBuilder::<PageStack<Screen>>::new()
///     .depth_order(PageStack::depth_order())
///     .spec(
///         TransitionSpec::builder()
///             .register_enter(TransitionRole::Target, "hero", scale_animation())
///             .build(),
///     )
///     .build()
///     .unwrap();
///
/// assert!(coordinator.phase().is_none());
/// ```
pub struct TransitionCoordinatorBuilder<S: TransitionState> {
    order: Option<DepthOrder<S>>,
    specs: Option<TransitionSpecProvider<S>>,
    config: RuntimeConfig,
}

impl<S: TransitionState> TransitionCoordinatorBuilder<S> {
    pub fn new() -> Self {
        Self {
            order: None,
            specs: None,
            config: RuntimeConfig::default(),
        }
    }

    /// Set the depth order (required).
    pub fn depth_order(mut self, order: DepthOrder<S>) -> Self {
        self.order = Some(order);
        self
    }

    /// Use one spec for every pair of states.
    pub fn spec(mut self, spec: TransitionSpec) -> Self {
        self.specs = Some(uniform_spec(spec));
        self
    }

    /// Look the spec up per (front, back) pair.
    pub fn spec_provider<F>(mut self, provider: F) -> Self
    where
        F: Fn(&S, &S) -> Arc<TransitionSpec> + Send + Sync + 'static,
    {
        self.specs = Some(Arc::new(provider));
        self
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the coordinator.
    /// Returns an error if the depth order is missing.
    pub fn build(self) -> Result<TransitionCoordinator<S>, BuildError> {
        let order = self.order.ok_or(BuildError::MissingDepthOrder)?;
        let specs = self.specs.unwrap_or_else(|| {
            let empty = TransitionSpec::empty();
            Arc::new(move |_front: &S, _back: &S| Arc::clone(&empty))
        });
        Ok(TransitionCoordinator::from_parts(order, specs, &self.config))
    }
}

impl<S: TransitionState> Default for TransitionCoordinatorBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}
