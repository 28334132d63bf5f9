//! Immutable page stack.
//!
//! A stack is the navigational history of one navigation host: oldest
//! page at the bottom, most recent page on top. Every operation returns a
//! new stack and shares the untouched pages with the old one.

use super::id::{PageId, StackId};
use super::order::DepthOrder;
use super::page::{PageDefinition, SavedPageState};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// Raised when a serialized stack has no pages.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("stack {id} has no pages")]
pub struct EmptyStackError {
    pub id: StackId,
}

struct Node<D: PageDefinition> {
    page: SavedPageState<D>,
    below: Option<Arc<Node<D>>>,
    len: usize,
}

impl<D: PageDefinition> Drop for Node<D> {
    // Unlink iteratively so very deep stacks don't recurse on drop.
    fn drop(&mut self) {
        let mut below = self.below.take();
        while let Some(node) = below {
            match Arc::try_unwrap(node) {
                Ok(mut node) => below = node.below.take(),
                Err(_) => break,
            }
        }
    }
}

/// Ordered, never-empty history of saved pages.
///
/// The stack is immutable: [`added`](Self::added) and
/// [`tail_or_none`](Self::tail_or_none) return new stacks and leave the
/// receiver untouched. Both are O(1).
///
/// # Example
///
/// ```rust
/// use pageflow::core::{PageDefinition, PageStack, SavedPageState, StackId};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Page { Home, Settings }
///
/// impl PageDefinition for Page {
///     fn kind(&self) -> &str {
///         match self {
///             Self::Home => "Home",
///             Self::Settings => "Settings",
///         }
///     }
/// }
///
/// let stack = PageStack::new(StackId::next(), SavedPageState::new(Page::Home));
/// let deeper = stack.added(SavedPageState::new(Page::Settings));
///
/// assert_eq!(deeper.head().page(), &Page::Settings);
/// assert_eq!(stack.len(), 1); // original unchanged
///
/// let back = deeper.tail_or_none().unwrap();
/// assert_eq!(back.head().page(), &Page::Home);
/// assert!(back.tail_or_none().is_none());
/// ```
#[derive(Serialize, Deserialize)]
#[serde(
    bound = "",
    try_from = "StackRecord<D>",
    into = "StackRecord<D>"
)]
pub struct PageStack<D: PageDefinition> {
    id: StackId,
    top: Arc<Node<D>>,
}

impl<D: PageDefinition> Clone for PageStack<D> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            top: Arc::clone(&self.top),
        }
    }
}

#[allow(clippy::len_without_is_empty)]
impl<D: PageDefinition> PageStack<D> {
    /// Create a single-page stack.
    pub fn new(id: StackId, initial: SavedPageState<D>) -> Self {
        Self {
            id,
            top: Arc::new(Node {
                page: initial,
                below: None,
                len: 1,
            }),
        }
    }

    /// Create a single-page stack with fresh stack and page ids.
    pub fn with_page(page: D) -> Self {
        Self::new(StackId::next(), SavedPageState::new(page))
    }

    /// Rebuild a stack from pages listed oldest first.
    pub fn from_pages(id: StackId, pages: NonEmptyVec<SavedPageState<D>>) -> Self {
        let mut pages = pages.into_iter();
        let mut stack = match pages.next() {
            Some(first) => Self::new(id, first),
            None => unreachable!("NonEmptyVec always yields a first element"),
        };
        for page in pages {
            stack = stack.added(page);
        }
        stack
    }

    pub fn id(&self) -> StackId {
        self.id
    }

    /// Top of the stack; always present.
    pub fn head(&self) -> &SavedPageState<D> {
        &self.top.page
    }

    /// Number of pages, at least one.
    pub fn len(&self) -> usize {
        self.top.len
    }

    /// Return a new stack with `page` on top.
    pub fn added(&self, page: SavedPageState<D>) -> Self {
        Self {
            id: self.id,
            top: Arc::new(Node {
                page,
                below: Some(Arc::clone(&self.top)),
                len: self.top.len + 1,
            }),
        }
    }

    /// Snapshot `page` under a fresh id and push it.
    pub fn push(&self, page: D) -> Self {
        self.added(SavedPageState::new(page))
    }

    /// Return the stack without its head, or `None` if only one page is left.
    pub fn tail_or_none(&self) -> Option<Self> {
        self.top.below.as_ref().map(|below| Self {
            id: self.id,
            top: Arc::clone(below),
        })
    }

    /// Pages from the top down.
    pub fn iter_from_top(&self) -> impl Iterator<Item = &SavedPageState<D>> {
        let mut next = Some(self.top.as_ref());
        std::iter::from_fn(move || {
            let node = next?;
            next = node.below.as_deref();
            Some(&node.page)
        })
    }

    /// Pages oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &SavedPageState<D>> {
        let mut pages: Vec<&SavedPageState<D>> = self.iter_from_top().collect();
        pages.reverse();
        pages.into_iter()
    }

    pub fn get(&self, id: PageId) -> Option<&SavedPageState<D>> {
        self.iter_from_top().find(|saved| saved.id() == id)
    }

    pub fn contains(&self, id: PageId) -> bool {
        self.get(id).is_some()
    }

    /// Page ids oldest first.
    pub fn page_ids(&self) -> Vec<PageId> {
        self.iter().map(SavedPageState::id).collect()
    }

    /// Pages oldest first, cloned out of the shared structure.
    pub fn to_pages(&self) -> NonEmptyVec<SavedPageState<D>> {
        let mut pages = self.iter().cloned();
        let head = match pages.next() {
            Some(first) => first,
            None => unreachable!("a page stack always holds at least one page"),
        };
        NonEmptyVec::new(head, pages.collect())
    }

    /// Depth ordering for stacks: the deeper stack is in front; at equal
    /// depth the stack whose head was created later is in front.
    pub fn depth_order() -> DepthOrder<PageStack<D>> {
        DepthOrder::new(|a: &PageStack<D>, b: &PageStack<D>| {
            a.len()
                .cmp(&b.len())
                .then_with(|| a.head().id().cmp(&b.head().id()))
        })
    }
}

impl<D: PageDefinition> PartialEq for PageStack<D> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.len() == other.len()
            && (Arc::ptr_eq(&self.top, &other.top)
                || self.iter_from_top().eq(other.iter_from_top()))
    }
}

impl<D: PageDefinition> fmt::Debug for PageStack<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageStack")
            .field("id", &self.id)
            .field("pages", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}

/// Flat serialized form of a stack.
#[derive(Clone, Serialize, Deserialize)]
#[serde(bound = "")]
struct StackRecord<D: PageDefinition> {
    id: StackId,
    pages: Vec<SavedPageState<D>>,
}

impl<D: PageDefinition> From<PageStack<D>> for StackRecord<D> {
    fn from(stack: PageStack<D>) -> Self {
        Self {
            id: stack.id,
            pages: stack.to_pages().into_vec(),
        }
    }
}

impl<D: PageDefinition> TryFrom<StackRecord<D>> for PageStack<D> {
    type Error = EmptyStackError;

    fn try_from(record: StackRecord<D>) -> Result<Self, Self::Error> {
        let pages =
            NonEmptyVec::from_vec(record.pages).ok_or(EmptyStackError { id: record.id })?;
        if let Some(max) = pages.iter().map(SavedPageState::id).max() {
            PageId::reserve_through(max);
        }
        Ok(Self::from_pages(record.id, pages))
    }
}
