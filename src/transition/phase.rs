//! Named states of the two-phase transition protocol.

use serde::{Deserialize, Serialize};

/// Direction of an animated transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Target is in front of current (push).
    Forward,
    /// Target is behind current (pop).
    Backward,
}

/// Where the coordinator stands after its last resolution.
///
/// Equality of two phases is exactly equality of
/// (current key, target key, target-first-composition), which is what
/// decides whether the visible list needs rebuilding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransitionPhase<K> {
    /// No transition; one state visible.
    Idle { key: K },

    /// The target has never been measured. It is composed without
    /// animations underneath the current state so the renderer can
    /// measure it; the driver keeps its previous target.
    Measuring { current: K, target: K },

    /// Both endpoints measured; element animations are running.
    Animating {
        current: K,
        target: K,
        direction: Direction,
    },
}

impl<K> TransitionPhase<K> {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle { .. } => "Idle",
            Self::Measuring { .. } => "Measuring",
            Self::Animating { .. } => "Animating",
        }
    }

    pub fn current_key(&self) -> &K {
        match self {
            Self::Idle { key } => key,
            Self::Measuring { current, .. } | Self::Animating { current, .. } => current,
        }
    }

    pub fn target_key(&self) -> &K {
        match self {
            Self::Idle { key } => key,
            Self::Measuring { target, .. } | Self::Animating { target, .. } => target,
        }
    }

    pub fn is_target_first_composition(&self) -> bool {
        matches!(self, Self::Measuring { .. })
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle { .. })
    }

    pub fn direction(&self) -> Option<Direction> {
        match self {
            Self::Animating { direction, .. } => Some(*direction),
            _ => None,
        }
    }
}
