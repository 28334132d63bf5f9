//! Registry of layout handles keyed by transition key.

use super::info::{LayoutHandle, LayoutInfo};
use crate::core::{Offset, Size};
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;
use tracing::{debug, trace};

/// Tracks the last-measured layout of every key that is, or recently
/// was, visible.
///
/// The registry is the only writer of layout data. Entries are created
/// on first request and dropped by [`retain_keys`](Self::retain_keys)
/// once their key is no longer visible.
///
/// # Example
///
/// ```rust
/// use pageflow::core::{Offset, Size};
/// use pageflow::layout::LayoutInfoRegistry;
///
/// let mut registry = LayoutInfoRegistry::new();
/// let handle = registry.handle(&"home");
/// assert!(registry.is_unmeasured(&"home"));
///
/// registry.report(&"home", Size::new(320.0, 640.0), Offset::ZERO);
/// assert!(!handle.is_empty());
/// ```
#[derive(Debug)]
pub struct LayoutInfoRegistry<K> {
    entries: HashMap<K, LayoutHandle>,
}

impl<K> Default for LayoutInfoRegistry<K> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K: Clone + Eq + Hash + Debug> LayoutInfoRegistry<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for `key`, created empty if the key is new.
    pub fn handle(&mut self, key: &K) -> LayoutHandle {
        self.entries
            .entry(key.clone())
            .or_insert_with(LayoutHandle::new)
            .clone()
    }

    /// Record a measurement, overwriting any previous geometry.
    ///
    /// Returns `true` if this was the key's first measurement.
    pub fn report(&mut self, key: &K, size: Size, root_position: Offset) -> bool {
        let handle = self.handle(key);
        let first = handle.is_empty();
        handle.set(LayoutInfo::measured(size, root_position));
        if first {
            debug!(?key, ?size, ?root_position, "first layout measurement");
        } else {
            trace!(?key, ?size, ?root_position, "layout updated");
        }
        first
    }

    pub fn get(&self, key: &K) -> Option<LayoutInfo> {
        self.entries.get(key).map(LayoutHandle::get)
    }

    /// `true` if `key` is untracked or tracked but never measured.
    pub fn is_unmeasured(&self, key: &K) -> bool {
        self.get(key).map_or(true, |info| info.is_empty())
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &K) -> Option<LayoutInfo> {
        self.entries.remove(key).map(|handle| handle.get())
    }

    /// Drop every entry whose key is not in `keep`. Returns how many went.
    pub fn retain_keys<'a, I>(&mut self, keep: I) -> usize
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        let keep: HashSet<&K> = keep.into_iter().collect();
        let before = self.entries.len();
        self.entries.retain(|key, _| keep.contains(key));
        let removed = before - self.entries.len();
        if removed > 0 {
            debug!(removed, remaining = self.entries.len(), "purged stale layouts");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_registry_is_empty() {
        let registry: LayoutInfoRegistry<u32> = LayoutInfoRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.is_unmeasured(&1));
        assert_eq!(registry.get(&1), None);
    }

    #[test]
    fn handle_is_stable_per_key() {
        let mut registry = LayoutInfoRegistry::new();
        let first = registry.handle(&1);
        let second = registry.handle(&1);
        let other = registry.handle(&2);

        assert!(first.ptr_eq(&second));
        assert!(!first.ptr_eq(&other));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn tracked_but_unmeasured_key_counts_as_unmeasured() {
        let mut registry = LayoutInfoRegistry::new();
        registry.handle(&7);

        assert!(registry.contains(&7));
        assert!(registry.is_unmeasured(&7));
    }

    #[test]
    fn report_overwrites_and_flags_first_measurement() {
        let mut registry = LayoutInfoRegistry::new();
        let handle = registry.handle(&"page");

        assert!(registry.report(&"page", Size::new(1.0, 1.0), Offset::ZERO));
        assert!(!registry.report(&"page", Size::new(2.0, 3.0), Offset::new(4.0, 5.0)));

        let info = handle.get();
        assert_eq!(info.size(), Some(Size::new(2.0, 3.0)));
        assert_eq!(info.root_position(), Some(Offset::new(4.0, 5.0)));
        assert!(!registry.is_unmeasured(&"page"));
    }

    #[test]
    fn retain_keys_purges_everything_else() {
        let mut registry = LayoutInfoRegistry::new();
        for key in 0..5 {
            registry.report(&key, Size::new(1.0, 1.0), Offset::ZERO);
        }

        let removed = registry.retain_keys(&[1, 3]);

        assert_eq!(removed, 3);
        assert_eq!(registry.len(), 2);
        assert!(registry.contains(&1));
        assert!(!registry.contains(&0));
        assert!(registry.is_unmeasured(&0));
    }

    #[test]
    fn remove_returns_last_layout() {
        let mut registry = LayoutInfoRegistry::new();
        registry.report(&1, Size::new(8.0, 8.0), Offset::ZERO);

        let removed = registry.remove(&1).unwrap();
        assert_eq!(removed.size(), Some(Size::new(8.0, 8.0)));
        assert!(!registry.contains(&1));
    }
}
