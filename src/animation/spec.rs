//! Transition specs: which element animations run on which side.

use super::scope::{AnimationScope, TransitionRole};
use super::value::AnimationValue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Identifier of an animated element inside a page.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An element animation: maps the transition's endpoints to a value.
///
/// Must be pure; it is called once per endpoint on every frame the
/// renderer asks for it.
pub type ElementAnimation = Arc<dyn Fn(&AnimationScope) -> AnimationValue + Send + Sync>;

/// Element animations for one role on one edge.
#[derive(Clone, Default)]
pub struct ElementAnimationMap {
    animations: HashMap<ElementId, ElementAnimation>,
}

impl ElementAnimationMap {
    pub fn get(&self, id: &ElementId) -> Option<&ElementAnimation> {
        self.animations.get(id)
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.animations.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &ElementId> {
        self.animations.keys()
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    fn insert(&mut self, id: ElementId, animation: ElementAnimation) {
        self.animations.insert(id, animation);
    }
}

impl fmt::Debug for ElementAnimationMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&ElementId> = self.animations.keys().collect();
        ids.sort();
        f.debug_struct("ElementAnimationMap")
            .field("ids", &ids)
            .finish()
    }
}

/// Which edge of a transition an animation belongs to.
///
/// `Enter` animations apply to the front page of the pair (the page that
/// enters on push and leaves on pop); `Exit` animations apply to the
/// back page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransitionEdge {
    Enter,
    Exit,
}

#[derive(Clone, Debug, Default)]
struct RoleMaps {
    current: ElementAnimationMap,
    target: ElementAnimationMap,
}

impl RoleMaps {
    fn for_role(&self, role: TransitionRole) -> &ElementAnimationMap {
        match role {
            TransitionRole::Current => &self.current,
            TransitionRole::Target => &self.target,
        }
    }

    fn for_role_mut(&mut self, role: TransitionRole) -> &mut ElementAnimationMap {
        match role {
            TransitionRole::Current => &mut self.current,
            TransitionRole::Target => &mut self.target,
        }
    }
}

/// Element animations for an ordered pair of (front, back) states.
///
/// Four maps: entering-current, entering-target, exiting-current and
/// exiting-target.
#[derive(Clone, Debug, Default)]
pub struct TransitionSpec {
    entering: RoleMaps,
    exiting: RoleMaps,
}

impl TransitionSpec {
    pub fn builder() -> TransitionSpecBuilder {
        TransitionSpecBuilder::new()
    }

    /// Shared spec with no animations.
    pub fn empty() -> Arc<TransitionSpec> {
        static EMPTY: OnceLock<Arc<TransitionSpec>> = OnceLock::new();
        Arc::clone(EMPTY.get_or_init(|| Arc::new(TransitionSpec::default())))
    }

    pub fn animations(&self, edge: TransitionEdge, role: TransitionRole) -> &ElementAnimationMap {
        match edge {
            TransitionEdge::Enter => self.entering.for_role(role),
            TransitionEdge::Exit => self.exiting.for_role(role),
        }
    }

    pub fn entering(&self, role: TransitionRole) -> &ElementAnimationMap {
        self.animations(TransitionEdge::Enter, role)
    }

    pub fn exiting(&self, role: TransitionRole) -> &ElementAnimationMap {
        self.animations(TransitionEdge::Exit, role)
    }

    pub fn is_empty(&self) -> bool {
        [TransitionEdge::Enter, TransitionEdge::Exit]
            .into_iter()
            .flat_map(|edge| {
                [TransitionRole::Current, TransitionRole::Target]
                    .into_iter()
                    .map(move |role| (edge, role))
            })
            .all(|(edge, role)| self.animations(edge, role).is_empty())
    }
}

/// Fluent builder for [`TransitionSpec`].
///
/// Registering the same element twice for the same edge and role keeps
/// the last registration.
///
/// # Example
///
/// ```rust
/// use pageflow::animation::{offset_animation, scale_animation, TransitionRole, TransitionSpec};
///
/// let spec = TransitionSpec::builder()
///     .register_enter(TransitionRole::Target, "avatar", scale_animation())
///     .register_exit(TransitionRole::Current, "avatar", offset_animation())
///     .build();
///
/// assert_eq!(spec.entering(TransitionRole::Target).len(), 1);
/// assert!(spec.entering(TransitionRole::Current).is_empty());
/// ```
#[derive(Default)]
pub struct TransitionSpecBuilder {
    spec: TransitionSpec,
}

impl TransitionSpecBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        mut self,
        edge: TransitionEdge,
        role: TransitionRole,
        id: impl Into<ElementId>,
        animation: ElementAnimation,
    ) -> Self {
        let maps = match edge {
            TransitionEdge::Enter => &mut self.spec.entering,
            TransitionEdge::Exit => &mut self.spec.exiting,
        };
        maps.for_role_mut(role).insert(id.into(), animation);
        self
    }

    pub fn register_enter(
        self,
        role: TransitionRole,
        id: impl Into<ElementId>,
        animation: ElementAnimation,
    ) -> Self {
        self.register(TransitionEdge::Enter, role, id, animation)
    }

    pub fn register_exit(
        self,
        role: TransitionRole,
        id: impl Into<ElementId>,
        animation: ElementAnimation,
    ) -> Self {
        self.register(TransitionEdge::Exit, role, id, animation)
    }

    /// Register a closure without wrapping it in an `Arc` first.
    pub fn register_fn<F>(
        self,
        edge: TransitionEdge,
        role: TransitionRole,
        id: impl Into<ElementId>,
        animation: F,
    ) -> Self
    where
        F: Fn(&AnimationScope) -> AnimationValue + Send + Sync + 'static,
    {
        self.register(edge, role, id, Arc::new(animation))
    }

    pub fn build(self) -> TransitionSpec {
        self.spec
    }
}

/// Looks up the spec for a (front, back) pair of states.
pub type TransitionSpecProvider<S> = Arc<dyn Fn(&S, &S) -> Arc<TransitionSpec> + Send + Sync>;

/// Provider that returns the same spec for every pair.
pub fn uniform_spec<S>(spec: TransitionSpec) -> TransitionSpecProvider<S> {
    let spec = Arc::new(spec);
    Arc::new(move |_front: &S, _back: &S| Arc::clone(&spec))
}
