//! Plain geometry values shared by layout and animation code.

use serde::{Deserialize, Serialize};
use std::ops::{Neg, Sub};

/// Measured size of a page's root content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Component-wise `self / other`, or `None` if `other` has a zero side.
    pub fn ratio_to(self, other: Size) -> Option<Scale> {
        if other.width == 0.0 || other.height == 0.0 {
            return None;
        }
        Some(Scale::new(self.width / other.width, self.height / other.height))
    }
}

/// Position relative to the root of the rendering surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    pub x: f32,
    pub y: f32,
}

impl Offset {
    pub const ZERO: Offset = Offset::new(0.0, 0.0);

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn lerp(self, other: Offset, fraction: f32) -> Offset {
        Offset::new(
            lerp(self.x, other.x, fraction),
            lerp(self.y, other.y, fraction),
        )
    }
}

impl Sub for Offset {
    type Output = Offset;

    fn sub(self, rhs: Offset) -> Offset {
        Offset::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Offset {
    type Output = Offset;

    fn neg(self) -> Offset {
        Offset::new(-self.x, -self.y)
    }
}

/// Per-axis scale factor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    pub x: f32,
    pub y: f32,
}

impl Scale {
    pub const IDENTITY: Scale = Scale::new(1.0, 1.0);

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Reciprocal scale, or `None` if either axis is zero.
    pub fn inverse(self) -> Option<Scale> {
        if self.x == 0.0 || self.y == 0.0 {
            return None;
        }
        Some(Scale::new(1.0 / self.x, 1.0 / self.y))
    }

    pub fn lerp(self, other: Scale, fraction: f32) -> Scale {
        Scale::new(
            lerp(self.x, other.x, fraction),
            lerp(self.y, other.y, fraction),
        )
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::IDENTITY
    }
}

pub(crate) fn lerp(start: f32, stop: f32, fraction: f32) -> f32 {
    start + (stop - start) * fraction
}
