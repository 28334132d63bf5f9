//! Ready-made element animations derived from endpoint layouts.

use super::scope::{AnimationScope, TransitionRole};
use super::spec::ElementAnimation;
use super::value::AnimationValue;
use crate::core::{Offset, Scale};
use std::sync::Arc;

/// Scale that morphs an element's page toward the other endpoint.
///
/// Identity at the element's own endpoint or while either layout is
/// unknown. Otherwise target size / current size for the current role
/// and its reciprocal for the target role.
///
/// The non-identity values are the far-endpoint values: a current-role
/// element reaches target/current when `active` is the target, and rests
/// at identity when `active` is the current endpoint.
pub fn scale_for(scope: &AnimationScope) -> Scale {
    if scope.is_at_own_page() {
        return Scale::IDENTITY;
    }
    let (Some(current), Some(target)) = (scope.current.size(), scope.target.size()) else {
        return Scale::IDENTITY;
    };
    let scale = match scope.role {
        TransitionRole::Current => target.ratio_to(current),
        TransitionRole::Target => current.ratio_to(target),
    };
    scale.unwrap_or(Scale::IDENTITY)
}

/// Offset that moves an element's page toward the other endpoint.
///
/// Zero in the same cases [`scale_for`] returns identity. Otherwise the
/// root-position delta target − current for the current role and its
/// negation for the target role.
pub fn offset_for(scope: &AnimationScope) -> Offset {
    if scope.is_at_own_page() {
        return Offset::ZERO;
    }
    let (Some(current), Some(target)) = (
        scope.current.root_position(),
        scope.target.root_position(),
    ) else {
        return Offset::ZERO;
    };
    match scope.role {
        TransitionRole::Current => target - current,
        TransitionRole::Target => -(target - current),
    }
}

pub fn scale_animation() -> ElementAnimation {
    Arc::new(|scope: &AnimationScope| AnimationValue::Scale(scale_for(scope)))
}

pub fn offset_animation() -> ElementAnimation {
    Arc::new(|scope: &AnimationScope| AnimationValue::Offset(offset_for(scope)))
}

/// Fully opaque at the element's own endpoint, transparent at the other.
pub fn fade_animation() -> ElementAnimation {
    Arc::new(|scope: &AnimationScope| {
        AnimationValue::Alpha(if scope.is_at_own_page() { 1.0 } else { 0.0 })
    })
}
