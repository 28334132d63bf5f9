//! Core navigation values.
//!
//! This module contains the pure value types the rest of the crate is
//! built on:
//! - Page and stack identifiers
//! - Page definitions and their saved snapshots
//! - The immutable page stack
//! - Geometry shared by layout and animation code
//! - Caller-supplied depth ordering
//!
//! Nothing in this module has side effects.

mod geometry;
mod id;
mod order;
mod page;
mod stack;

pub use geometry::{Offset, Scale, Size};
pub(crate) use geometry::lerp;
pub use id::{PageId, StackId};
pub use order::{validate_depth_order, DepthOrder, OrderViolation};
pub use page::{PageDefinition, SavedPageState};
pub use stack::{EmptyStackError, PageStack};
