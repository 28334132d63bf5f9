//! Two-phase transitions between navigational states.
//!
//! [`TransitionCoordinator::resolve`] turns the state the UI wants to show
//! into the list of states to compose right now, each with its layout
//! handle and element animations. The coordinator's progress is the
//! explicit [`TransitionPhase`].

mod coordinator;
mod entry;
mod phase;
mod state;

pub use coordinator::TransitionCoordinator;
pub use entry::VisibleEntry;
pub use phase::{Direction, TransitionPhase};
pub use state::TransitionState;
