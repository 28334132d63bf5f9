//! Inputs handed to element animation functions.

use crate::layout::LayoutInfo;
use serde::{Deserialize, Serialize};

/// Endpoint of an in-progress transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransitionRole {
    /// The departing side.
    Current,
    /// The arriving side.
    Target,
}

impl TransitionRole {
    pub fn opposite(self) -> TransitionRole {
        match self {
            Self::Current => Self::Target,
            Self::Target => Self::Current,
        }
    }
}

/// What an element animation sees when it is evaluated.
///
/// `role` is the endpoint the element's own page plays in the transition.
/// `active` is the endpoint the value is being computed for: the
/// renderer evaluates every animation once per endpoint and interpolates
/// between the two results.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationScope {
    pub role: TransitionRole,
    pub active: TransitionRole,
    pub current: LayoutInfo,
    pub target: LayoutInfo,
}

impl AnimationScope {
    /// `true` when the value is requested for the element's own endpoint,
    /// where the element sits untransformed.
    pub fn is_at_own_page(&self) -> bool {
        self.role == self.active
    }

    /// Layout of the element's own page.
    pub fn own_layout(&self) -> LayoutInfo {
        self.layout_of(self.role)
    }

    /// Layout of the page at the other endpoint.
    pub fn other_layout(&self) -> LayoutInfo {
        self.layout_of(self.role.opposite())
    }

    pub fn layout_of(&self, role: TransitionRole) -> LayoutInfo {
        match role {
            TransitionRole::Current => self.current,
            TransitionRole::Target => self.target,
        }
    }
}
