//! One visible state handed to the renderer.

use super::state::TransitionState;
use crate::animation::{ElementAnimations, TransitionRole};
use crate::layout::LayoutHandle;

/// A state the renderer must compose, with everything it needs passed
/// explicitly: the layout handle to report measurements against and the
/// element animations to apply.
#[derive(Clone, Debug)]
pub struct VisibleEntry<S: TransitionState> {
    state: S,
    key: S::Key,
    layout: LayoutHandle,
    animations: ElementAnimations,
}

impl<S: TransitionState> VisibleEntry<S> {
    pub(crate) fn new(state: S, layout: LayoutHandle, animations: ElementAnimations) -> Self {
        Self {
            key: state.transition_key(),
            state,
            layout,
            animations,
        }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn key(&self) -> &S::Key {
        &self.key
    }

    pub fn layout(&self) -> &LayoutHandle {
        &self.layout
    }

    pub fn animations(&self) -> &ElementAnimations {
        &self.animations
    }

    pub fn role(&self) -> TransitionRole {
        self.animations.role()
    }
}
