//! Last-measured geometry of a rendered page.

use crate::core::{Offset, Size};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

/// Size and root-relative position of a page's root content.
///
/// Empty until the renderer reports its first measurement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutInfo {
    size: Option<Size>,
    root_position: Option<Offset>,
}

impl LayoutInfo {
    pub const EMPTY: LayoutInfo = LayoutInfo {
        size: None,
        root_position: None,
    };

    pub fn measured(size: Size, root_position: Offset) -> Self {
        Self {
            size: Some(size),
            root_position: Some(root_position),
        }
    }

    /// `true` until the page has been measured at least once.
    pub fn is_empty(&self) -> bool {
        self.size.is_none()
    }

    pub fn size(&self) -> Option<Size> {
        self.size
    }

    pub fn root_position(&self) -> Option<Offset> {
        self.root_position
    }
}

/// Shared, read-only view of one key's layout.
///
/// A handle stays the same object for as long as its key is tracked by
/// the registry, so renderers can hold on to it across resolutions.
/// Only the registry writes through it.
#[derive(Clone, Debug, Default)]
pub struct LayoutHandle {
    inner: Arc<RwLock<LayoutInfo>>,
}

impl LayoutHandle {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Current snapshot of the layout.
    pub fn get(&self) -> LayoutInfo {
        *self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    pub fn is_empty(&self) -> bool {
        self.get().is_empty()
    }

    /// `true` if both handles observe the same layout cell.
    pub fn ptr_eq(&self, other: &LayoutHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn set(&self, info: LayoutInfo) {
        *self.inner.write().unwrap_or_else(|e| e.into_inner()) = info;
    }
}
