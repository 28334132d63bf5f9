//! Per-element transition animations.
//!
//! A [`TransitionSpec`] collects element animations per edge (enter or
//! exit) and per role (current or target). During a transition the
//! coordinator hands each visible page an [`ElementAnimations`] set,
//! which evaluates those animations against the live layouts of both
//! endpoints.
//!
//! # Example
//!
//! ```rust
//! use pageflow::animation::{AnimationScope, AnimationValue, TransitionRole, TransitionSpec};
//! use std::sync::Arc;
//!
//! let spec = TransitionSpec::builder()
//!     .register_enter(
//!         TransitionRole::Target,
//!         "title",
//!         Arc::new(|scope: &AnimationScope| {
//!             AnimationValue::Alpha(if scope.is_at_own_page() { 1.0 } else { 0.0 })
//!         }),
//!     )
//!     .build();
//!
//! assert!(!spec.is_empty());
//! ```

mod derived;
mod scope;
mod set;
mod spec;
mod value;

pub use derived::{fade_animation, offset_animation, offset_for, scale_animation, scale_for};
pub use scope::{AnimationScope, TransitionRole};
pub use set::ElementAnimations;
pub use spec::{
    uniform_spec, ElementAnimation, ElementAnimationMap, ElementId, TransitionEdge,
    TransitionSpec, TransitionSpecBuilder, TransitionSpecProvider,
};
pub use value::AnimationValue;
