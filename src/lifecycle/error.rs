//! Page-state lifecycle errors.

use crate::core::PageId;
use thiserror::Error;

/// A page or its factory could not be found.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("No factory registered for page kind '{kind}'")]
    NoFactory { kind: String },

    #[error("{page_id} is not in the current stack")]
    PageNotInStack { page_id: PageId },
}

/// Errors returned when obtaining a page's state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// The factory effect suspended instead of completing on the calling
    /// thread.
    #[error("State for {page_id} ('{kind}') did not finish constructing synchronously")]
    ConstructionThreadingViolation { page_id: PageId, kind: String },

    #[error("Factory for page kind '{kind}' failed: {reason}")]
    FactoryFailed { kind: String, reason: String },
}

impl LifecycleError {
    /// Convenience constructor for factories reporting their own failure.
    pub fn factory_failed(kind: impl Into<String>, reason: impl ToString) -> Self {
        Self::FactoryFailed {
            kind: kind.into(),
            reason: reason.to_string(),
        }
    }
}
