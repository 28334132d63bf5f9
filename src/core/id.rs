//! Process-unique identifiers for pages and stacks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

static NEXT_PAGE_ID: AtomicU64 = AtomicU64::new(1);
static LAST_STACK_ID: AtomicI64 = AtomicI64::new(0);

/// Identifier assigned once per page instance.
///
/// Ids are handed out from a monotonic process-wide counter, so an id
/// created later always compares greater than one created earlier.
/// Page state is cached under this id.
///
/// # Example
///
/// ```rust
/// use pageflow::core::PageId;
///
/// let first = PageId::next();
/// let second = PageId::next();
/// assert!(second > first);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(u64);

impl PageId {
    /// Allocate a fresh id.
    pub fn next() -> Self {
        Self(NEXT_PAGE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw counter value.
    pub fn value(self) -> u64 {
        self.0
    }

    /// Make sure ids allocated from now on never collide with `id`.
    ///
    /// Called whenever pages are restored from a snapshot.
    pub(crate) fn reserve_through(id: PageId) {
        NEXT_PAGE_ID.fetch_max(id.0.saturating_add(1), Ordering::Relaxed);
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page#{}", self.0)
    }
}

/// Identifier of a page stack.
///
/// Derived from the creation time in microseconds and bumped when two
/// stacks are created within the same microsecond, so ids are strictly
/// increasing within a process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StackId(i64);

impl StackId {
    /// Allocate an id for a stack created now.
    pub fn next() -> Self {
        let now = Utc::now().timestamp_micros();
        let mut last = LAST_STACK_ID.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(last.saturating_add(1));
            match LAST_STACK_ID.compare_exchange_weak(
                last,
                candidate,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return Self(candidate),
                Err(actual) => last = actual,
            }
        }
    }

    pub fn value(self) -> i64 {
        self.0
    }

    /// Approximate creation time encoded in the id.
    pub fn created_at(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_micros(self.0)
    }
}

impl fmt::Display for StackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stack#{}", self.0)
    }
}
