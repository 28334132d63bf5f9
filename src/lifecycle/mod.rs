//! Page-state lifecycle.
//!
//! Every page in a stack can own a state object (a view model, a
//! controller) built by a factory registered for the page's kind. The
//! [`PageStateStore`] builds each state on first use, hands the same
//! instance out afterwards, and cancels the page's [`PageScope`] once the
//! page leaves the stack. [`PageStackState`] ties a live stack to its
//! store and persists it.

pub mod error;
mod factory;
mod scope;
mod stack_state;
mod store;

pub use error::{LifecycleError, LookupError};
pub use factory::{PageStateFactories, PageStateFactory};
pub use scope::PageScope;
pub use stack_state::{PageStackState, PersistOutcome};
pub use store::PageStateStore;
