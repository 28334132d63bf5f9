//! Element animations bound to the endpoints of one transition.

use super::scope::{AnimationScope, TransitionRole};
use super::spec::{ElementAnimationMap, ElementId};
use super::value::AnimationValue;
use crate::layout::LayoutHandle;

/// The element animations one visible page runs during a transition,
/// together with live handles to both endpoints' layouts.
///
/// This is what the renderer receives for each visible page; evaluating
/// an element reads the latest layouts, so values stay correct while the
/// pages are re-measured mid-transition.
#[derive(Clone, Debug)]
pub struct ElementAnimations {
    role: TransitionRole,
    map: ElementAnimationMap,
    current: LayoutHandle,
    target: LayoutHandle,
}

impl ElementAnimations {
    pub(crate) fn new(
        role: TransitionRole,
        map: ElementAnimationMap,
        current: LayoutHandle,
        target: LayoutHandle,
    ) -> Self {
        Self {
            role,
            map,
            current,
            target,
        }
    }

    /// No animations; used outside transitions and while measuring.
    pub(crate) fn none(role: TransitionRole, layout: LayoutHandle) -> Self {
        Self::new(role, ElementAnimationMap::default(), layout.clone(), layout)
    }

    /// Endpoint the owning page plays in the transition.
    pub fn role(&self) -> TransitionRole {
        self.role
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.map.contains(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &ElementId> {
        self.map.ids()
    }

    /// Scope an animation of this page would see at `active`.
    pub fn scope(&self, active: TransitionRole) -> AnimationScope {
        AnimationScope {
            role: self.role,
            active,
            current: self.current.get(),
            target: self.target.get(),
        }
    }

    /// Value of element `id` at endpoint `active`, if it is animated.
    pub fn value(&self, id: &ElementId, active: TransitionRole) -> Option<AnimationValue> {
        let animation = self.map.get(id)?;
        Some(animation(&self.scope(active)))
    }

    /// Value of element `id` at `fraction` of the way from the current
    /// endpoint (0.0) to the target endpoint (1.0).
    pub fn interpolate(&self, id: &ElementId, fraction: f32) -> Option<AnimationValue> {
        let start = self.value(id, TransitionRole::Current)?;
        let end = self.value(id, TransitionRole::Target)?;
        start.lerp(&end, fraction)
    }
}
