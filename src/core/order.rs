//! Caller-supplied depth ordering between navigational states.
//!
//! The transition coordinator needs to know whether a target state sits
//! in front of or behind the current one. That knowledge belongs to the
//! caller, who provides it as a comparator. The comparator must be a
//! strict total order; [`validate_depth_order`] checks that contract over
//! a set of sample states and reports every violation it finds.

use std::cmp::Ordering;
use std::fmt::Debug;
use std::sync::Arc;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// Front-to-back comparison over states.
///
/// `compare(a, b) == Greater` means `a` is in front of `b`.
///
/// # Example
///
/// ```rust
/// use pageflow::core::DepthOrder;
/// use std::cmp::Ordering;
///
/// let by_depth = DepthOrder::new(|a: &u32, b: &u32| a.cmp(b));
///
/// assert!(by_depth.is_in_front(&3, &1));
/// assert_eq!(by_depth.compare(&2, &2), Ordering::Equal);
/// ```
pub struct DepthOrder<S> {
    compare: Arc<dyn Fn(&S, &S) -> Ordering + Send + Sync>,
}

impl<S> DepthOrder<S> {
    pub fn new<F>(compare: F) -> Self
    where
        F: Fn(&S, &S) -> Ordering + Send + Sync + 'static,
    {
        DepthOrder {
            compare: Arc::new(compare),
        }
    }

    pub fn compare(&self, a: &S, b: &S) -> Ordering {
        (self.compare)(a, b)
    }

    /// `true` if `a` is strictly in front of `b`.
    pub fn is_in_front(&self, a: &S, b: &S) -> bool {
        self.compare(a, b) == Ordering::Greater
    }
}

impl<S> Clone for DepthOrder<S> {
    fn clone(&self) -> Self {
        Self {
            compare: Arc::clone(&self.compare),
        }
    }
}

/// A broken depth-order contract, found by [`validate_depth_order`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderViolation {
    #[error("{state} does not compare equal to itself")]
    NotReflexive { state: String },

    #[error("{a} and {b} disagree: compare(a, b) = {forward:?}, compare(b, a) = {backward:?}")]
    NotAntisymmetric {
        a: String,
        b: String,
        forward: Ordering,
        backward: Ordering,
    },

    #[error("{a} > {b} and {b} > {c} but not {a} > {c}")]
    NotTransitive { a: String, b: String, c: String },
}

/// Check the comparator against every pair and triple of `samples`.
///
/// Accumulates all violations instead of stopping at the first one.
pub fn validate_depth_order<S: Debug>(
    samples: &[S],
    order: &DepthOrder<S>,
) -> Validation<(), NonEmptyVec<OrderViolation>> {
    let mut checks: Vec<Validation<(), NonEmptyVec<OrderViolation>>> = Vec::new();

    for a in samples {
        if order.compare(a, a) != Ordering::Equal {
            checks.push(Validation::fail(OrderViolation::NotReflexive {
                state: format!("{a:?}"),
            }));
        }
    }

    for (i, a) in samples.iter().enumerate() {
        for b in &samples[i + 1..] {
            let forward = order.compare(a, b);
            let backward = order.compare(b, a);
            if forward != backward.reverse() {
                checks.push(Validation::fail(OrderViolation::NotAntisymmetric {
                    a: format!("{a:?}"),
                    b: format!("{b:?}"),
                    forward,
                    backward,
                }));
            }
        }
    }

    for a in samples {
        for b in samples {
            if !order.is_in_front(a, b) {
                continue;
            }
            for c in samples {
                if order.is_in_front(b, c) && !order.is_in_front(a, c) {
                    checks.push(Validation::fail(OrderViolation::NotTransitive {
                        a: format!("{a:?}"),
                        b: format!("{b:?}"),
                        c: format!("{c:?}"),
                    }));
                }
            }
        }
    }

    Validation::all_vec(checks).map(|_| ())
}
