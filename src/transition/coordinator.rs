//! Resolution of the visible states for a navigation target.

use super::entry::VisibleEntry;
use super::phase::{Direction, TransitionPhase};
use super::state::TransitionState;
use crate::animation::{ElementAnimations, TransitionRole, TransitionSpec, TransitionSpecProvider};
use crate::builder::TransitionCoordinatorBuilder;
use crate::config::RuntimeConfig;
use crate::core::{DepthOrder, Offset, Size};
use crate::layout::{LayoutHandle, LayoutInfoRegistry};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Decides which states are visible and which element animations each
/// runs, given the state the UI wants to show.
///
/// A transition to a never-measured state happens in two phases. The new
/// state is first composed without animations beneath the current one
/// ([`TransitionPhase::Measuring`]) while the driver keeps its previous
/// target. Once the renderer has reported the new state's layout, the
/// next resolution starts the animation with both layouts known.
///
/// # Example
///
/// ```rust
/// use pageflow::core::{DepthOrder, Offset, Size};
/// use pageflow::transition::{TransitionCoordinator, TransitionPhase, TransitionState};
///
/// #[derive(Clone, Debug)]
/// struct Screen(u32);
///
/// impl TransitionState for Screen {
///     type Key = u32;
///     fn transition_key(&self) -> u32 {
///         self.0
///     }
/// }
///
/// let order = DepthOrder::new(|a: &Screen, b: &Screen| a.0.cmp(&b.0));
/// let mut coordinator = TransitionCoordinator::new(order);
///
/// coordinator.resolve(Screen(1));
/// coordinator.report_layout(&1, Size::new(100.0, 100.0), Offset::ZERO);
///
/// let visible = coordinator.resolve(Screen(2));
/// assert_eq!(visible.len(), 2);
/// assert!(matches!(coordinator.phase(), Some(TransitionPhase::Measuring { .. })));
/// ```
pub struct TransitionCoordinator<S: TransitionState> {
    order: DepthOrder<S>,
    specs: TransitionSpecProvider<S>,
    purge_stale_layouts: bool,
    layouts: LayoutInfoRegistry<S::Key>,
    current: Option<S>,
    driver_target: Option<S>,
    phase: Option<TransitionPhase<S::Key>>,
    visible: Arc<[VisibleEntry<S>]>,
}

impl<S: TransitionState> TransitionCoordinator<S> {
    /// Coordinator with no element animations and default configuration.
    pub fn new(order: DepthOrder<S>) -> Self {
        let empty = TransitionSpec::empty();
        Self::from_parts(
            order,
            Arc::new(move |_front: &S, _back: &S| Arc::clone(&empty)),
            &RuntimeConfig::default(),
        )
    }

    pub fn builder() -> TransitionCoordinatorBuilder<S> {
        TransitionCoordinatorBuilder::new()
    }

    pub(crate) fn from_parts(
        order: DepthOrder<S>,
        specs: TransitionSpecProvider<S>,
        config: &RuntimeConfig,
    ) -> Self {
        Self {
            order,
            specs,
            purge_stale_layouts: config.purge_stale_layouts,
            layouts: LayoutInfoRegistry::new(),
            current: None,
            driver_target: None,
            phase: None,
            visible: Arc::from(Vec::new()),
        }
    }

    /// Visible states for `target`, in paint order (first entry is the
    /// bottom layer).
    ///
    /// Returns the previously returned list, pointer-identical, when the
    /// phase has not changed.
    pub fn resolve(&mut self, target: S) -> Arc<[VisibleEntry<S>]> {
        let target_key = target.transition_key();
        let first_composition = self.layouts.is_unmeasured(&target_key);

        let driven = if first_composition {
            self.driver_target
                .clone()
                .unwrap_or_else(|| target.clone())
        } else {
            target.clone()
        };
        let current = self.current.get_or_insert_with(|| driven.clone()).clone();
        self.driver_target = Some(driven);

        let phase = self.phase_for(&current, &target_key, first_composition, &target);
        if self.phase.as_ref() == Some(&phase) {
            trace!(phase = phase.name(), "visible states unchanged");
            return Arc::clone(&self.visible);
        }

        debug!(
            from = self.phase.as_ref().map(TransitionPhase::name),
            to = phase.name(),
            current = ?phase.current_key(),
            target = ?phase.target_key(),
            "transition phase changed"
        );
        self.visible = self.build_visible(&phase, current, target);
        self.phase = Some(phase);

        if self.purge_stale_layouts {
            let keep: Vec<S::Key> = self.visible.iter().map(|e| e.key().clone()).collect();
            self.layouts.retain_keys(&keep);
        }
        Arc::clone(&self.visible)
    }

    fn phase_for(
        &self,
        current: &S,
        target_key: &S::Key,
        first_composition: bool,
        target: &S,
    ) -> TransitionPhase<S::Key> {
        let current_key = current.transition_key();
        if current_key == *target_key {
            return TransitionPhase::Idle {
                key: current_key,
            };
        }
        if first_composition {
            return TransitionPhase::Measuring {
                current: current_key,
                target: target_key.clone(),
            };
        }
        let direction = match self.order.compare(target, current) {
            Ordering::Greater => Direction::Forward,
            Ordering::Less => Direction::Backward,
            Ordering::Equal => {
                warn!(
                    current = ?current_key,
                    target = ?target_key,
                    "depth order ties distinct states, animating forward"
                );
                Direction::Forward
            }
        };
        TransitionPhase::Animating {
            current: current_key,
            target: target_key.clone(),
            direction,
        }
    }

    fn build_visible(
        &mut self,
        phase: &TransitionPhase<S::Key>,
        current: S,
        target: S,
    ) -> Arc<[VisibleEntry<S>]> {
        let entries = match phase {
            TransitionPhase::Idle { key } => {
                let layout = self.layouts.handle(key);
                let animations = ElementAnimations::none(TransitionRole::Current, layout.clone());
                vec![VisibleEntry::new(target, layout, animations)]
            }
            TransitionPhase::Measuring {
                current: current_key,
                target: target_key,
            } => {
                let current_layout = self.layouts.handle(current_key);
                let target_layout = self.layouts.handle(target_key);
                vec![
                    still(target, TransitionRole::Target, target_layout),
                    still(current, TransitionRole::Current, current_layout),
                ]
            }
            TransitionPhase::Animating {
                current: current_key,
                target: target_key,
                direction,
            } => {
                let current_layout = self.layouts.handle(current_key);
                let target_layout = self.layouts.handle(target_key);
                let animated = |role: TransitionRole, spec: &TransitionSpec, enter: bool| {
                    let map = if enter {
                        spec.entering(role)
                    } else {
                        spec.exiting(role)
                    };
                    ElementAnimations::new(
                        role,
                        map.clone(),
                        current_layout.clone(),
                        target_layout.clone(),
                    )
                };
                match direction {
                    Direction::Forward => {
                        let spec = (self.specs)(&target, &current);
                        let back = animated(TransitionRole::Current, &spec, false);
                        let front = animated(TransitionRole::Target, &spec, true);
                        vec![
                            VisibleEntry::new(current, current_layout.clone(), back),
                            VisibleEntry::new(target, target_layout.clone(), front),
                        ]
                    }
                    Direction::Backward => {
                        let spec = (self.specs)(&current, &target);
                        let back = animated(TransitionRole::Target, &spec, false);
                        let front = animated(TransitionRole::Current, &spec, true);
                        vec![
                            VisibleEntry::new(target, target_layout.clone(), back),
                            VisibleEntry::new(current, current_layout.clone(), front),
                        ]
                    }
                }
            }
        };
        Arc::from(entries)
    }

    /// Record a measurement for `key`. Returns `true` on its first
    /// measurement.
    pub fn report_layout(&mut self, key: &S::Key, size: Size, root_position: Offset) -> bool {
        self.layouts.report(key, size, root_position)
    }

    /// The driver reached its target; it becomes the current state.
    pub fn finish_animation(&mut self) {
        if let Some(target) = self.driver_target.clone() {
            debug!(key = ?target.transition_key(), "animation finished");
            self.current = Some(target);
        }
    }

    pub fn phase(&self) -> Option<&TransitionPhase<S::Key>> {
        self.phase.as_ref()
    }

    /// The list returned by the last resolution.
    pub fn visible(&self) -> Arc<[VisibleEntry<S>]> {
        Arc::clone(&self.visible)
    }

    pub fn layouts(&self) -> &LayoutInfoRegistry<S::Key> {
        &self.layouts
    }

    /// State the animation driver is heading to.
    pub fn driver_target(&self) -> Option<&S> {
        self.driver_target.as_ref()
    }

    pub fn current_state(&self) -> Option<&S> {
        self.current.as_ref()
    }

    pub fn is_transitioning(&self) -> bool {
        self.phase.as_ref().is_some_and(|phase| !phase.is_idle())
    }
}

fn still<S: TransitionState>(state: S, role: TransitionRole, layout: LayoutHandle) -> VisibleEntry<S> {
    let animations = ElementAnimations::none(role, layout.clone());
    VisibleEntry::new(state, layout, animations)
}
