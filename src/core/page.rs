//! Page definitions and their saved snapshots.
//!
//! A page definition is the immutable parameter set of a page (which
//! screen, which item). A saved page state pairs one definition with the
//! id of the page instance it belongs to.

use super::id::PageId;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for the immutable parameters of a page.
///
/// # Required Traits
///
/// - `Clone`: definitions are copied into every stack that holds them
/// - `PartialEq`: definitions are compared when stacks are compared
/// - `Debug`: definitions show up in logs
/// - `Serialize` + `Deserialize`: stacks are persisted by an external repository
///
/// # Example
///
/// ```rust
/// use pageflow::core::PageDefinition;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Page {
///     Inbox,
///     Thread { id: u64 },
/// }
///
/// impl PageDefinition for Page {
///     fn kind(&self) -> &str {
///         match self {
///             Self::Inbox => "Inbox",
///             Self::Thread { .. } => "Thread",
///         }
///     }
/// }
///
/// assert_eq!(Page::Thread { id: 7 }.kind(), "Thread");
/// ```
pub trait PageDefinition:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// Stable tag naming the concrete page type.
    ///
    /// Page-state factories are registered and looked up by this tag, so
    /// every definition of the same kind must return the same string.
    fn kind(&self) -> &str;
}

/// A page definition bound to the page instance that shows it.
///
/// Created when a page is pushed and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct SavedPageState<D: PageDefinition> {
    id: PageId,
    page: D,
}

impl<D: PageDefinition> SavedPageState<D> {
    /// Snapshot `page` under a freshly allocated [`PageId`].
    pub fn new(page: D) -> Self {
        Self {
            id: PageId::next(),
            page,
        }
    }

    pub fn id(&self) -> PageId {
        self.id
    }

    pub fn page(&self) -> &D {
        &self.page
    }

    pub fn kind(&self) -> &str {
        self.page.kind()
    }
}
