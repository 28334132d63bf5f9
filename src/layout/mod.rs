//! Layout bookkeeping for transition math.
//!
//! The renderer measures each visible page and reports the result here.
//! Transition code reads the geometry of both endpoints to derive scale
//! and offset animations.

mod info;
mod registry;

pub use info::{LayoutHandle, LayoutInfo};
pub use registry::LayoutInfoRegistry;
