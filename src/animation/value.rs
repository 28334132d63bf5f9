//! Values produced by element animations.

use crate::core::{lerp, Offset, Scale};
use serde::{Deserialize, Serialize};

/// A per-element animation value at one transition endpoint.
///
/// The renderer interpolates between the values an animation produces at
/// the current and at the target endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum AnimationValue {
    Scale(Scale),
    Offset(Offset),
    Alpha(f32),
    /// Rotation in degrees.
    Rotation(f32),
    /// Anything else, as a fixed-length float vector.
    Vector(Vec<f32>),
}

impl AnimationValue {
    /// Linear interpolation toward `other`.
    ///
    /// Returns `None` if the two values are of different kinds or are
    /// vectors of different lengths.
    pub fn lerp(&self, other: &AnimationValue, fraction: f32) -> Option<AnimationValue> {
        match (self, other) {
            (Self::Scale(a), Self::Scale(b)) => Some(Self::Scale(a.lerp(*b, fraction))),
            (Self::Offset(a), Self::Offset(b)) => Some(Self::Offset(a.lerp(*b, fraction))),
            (Self::Alpha(a), Self::Alpha(b)) => Some(Self::Alpha(lerp(*a, *b, fraction))),
            (Self::Rotation(a), Self::Rotation(b)) => {
                Some(Self::Rotation(lerp(*a, *b, fraction)))
            }
            (Self::Vector(a), Self::Vector(b)) if a.len() == b.len() => Some(Self::Vector(
                a.iter()
                    .zip(b)
                    .map(|(x, y)| lerp(*x, *y, fraction))
                    .collect(),
            )),
            _ => None,
        }
    }

    pub fn as_scale(&self) -> Option<Scale> {
        match self {
            Self::Scale(scale) => Some(*scale),
            _ => None,
        }
    }

    pub fn as_offset(&self) -> Option<Offset> {
        match self {
            Self::Offset(offset) => Some(*offset),
            _ => None,
        }
    }

    pub fn as_alpha(&self) -> Option<f32> {
        match self {
            Self::Alpha(alpha) => Some(*alpha),
            _ => None,
        }
    }
}
