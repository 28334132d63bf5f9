//! Storage seam for page stacks.

use super::error::RepositoryError;
use super::snapshot::{SnapshotFormat, StackSnapshot};
use crate::config::RuntimeConfig;
use crate::core::{PageDefinition, PageStack, StackId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex};
use stillwater::effect::BoxedEffect;
use stillwater::prelude::*;
use tracing::debug;

/// Loads and saves stacks by id.
///
/// Both operations are described as effects; nothing touches storage
/// until the effect is run.
pub trait StackRepository<D: PageDefinition>: Send + Sync {
    fn load(&self, id: StackId) -> BoxedEffect<Option<PageStack<D>>, RepositoryError, ()>;

    fn save(&self, stack: &PageStack<D>) -> BoxedEffect<(), RepositoryError, ()>;
}

/// Repository keeping encoded snapshots in memory.
///
/// Clones share storage.
///
/// # Example
///
/// ```rust
/// use pageflow::core::{PageDefinition, PageStack};
/// use pageflow::persistence::{InMemoryStackRepository, SnapshotFormat, StackRepository};
/// use serde::{Deserialize, Serialize};
/// use stillwater::prelude::*;
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// struct Home;
///
/// impl PageDefinition for Home {
///     fn kind(&self) -> &str {
///         "Home"
///     }
/// }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let repository = InMemoryStackRepository::new(SnapshotFormat::Binary);
/// let stack = PageStack::with_page(Home);
///
/// repository.save(&stack).run(&()).await.unwrap();
/// let loaded = repository.load(stack.id()).run(&()).await.unwrap();
/// assert_eq!(loaded, Some(stack));
/// # }
/// ```
pub struct InMemoryStackRepository<D> {
    format: SnapshotFormat,
    entries: Arc<Mutex<HashMap<StackId, Vec<u8>>>>,
    _pages: PhantomData<fn() -> D>,
}

impl<D> Clone for InMemoryStackRepository<D> {
    fn clone(&self) -> Self {
        Self {
            format: self.format,
            entries: Arc::clone(&self.entries),
            _pages: PhantomData,
        }
    }
}

impl<D> Default for InMemoryStackRepository<D> {
    fn default() -> Self {
        Self::new(SnapshotFormat::default())
    }
}

impl<D> InMemoryStackRepository<D> {
    pub fn new(format: SnapshotFormat) -> Self {
        Self {
            format,
            entries: Arc::new(Mutex::new(HashMap::new())),
            _pages: PhantomData,
        }
    }

    /// Repository encoding snapshots in `config.snapshot_format`.
    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self::new(config.snapshot_format)
    }

    pub fn format(&self) -> SnapshotFormat {
        self.format
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: StackId) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(&id)
    }

    /// Encoded snapshot stored for `id`.
    pub fn raw(&self, id: StackId) -> Option<Vec<u8>> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&id)
            .cloned()
    }
}

impl<D: PageDefinition> StackRepository<D> for InMemoryStackRepository<D> {
    fn load(&self, id: StackId) -> BoxedEffect<Option<PageStack<D>>, RepositoryError, ()> {
        let format = self.format;
        let entries = Arc::clone(&self.entries);
        from_fn(move |_: &()| -> Result<Option<PageStack<D>>, RepositoryError> {
            let bytes = entries
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .get(&id)
                .cloned();
            let Some(bytes) = bytes else {
                debug!(stack = %id, "no snapshot stored");
                return Ok(None);
            };
            let snapshot = StackSnapshot::<D>::decode(&bytes, format)?;
            debug!(stack = %id, snapshot = %snapshot.id, pages = snapshot.stack.len(), "stack loaded");
            Ok(Some(snapshot.stack))
        })
        .boxed()
    }

    fn save(&self, stack: &PageStack<D>) -> BoxedEffect<(), RepositoryError, ()> {
        let format = self.format;
        let entries = Arc::clone(&self.entries);
        let stack = stack.clone();
        from_fn(move |_: &()| -> Result<(), RepositoryError> {
            let id = stack.id();
            let snapshot = StackSnapshot::new(stack);
            let bytes = snapshot.encode(format)?;
            debug!(stack = %id, snapshot = %snapshot.id, bytes = bytes.len(), "stack saved");
            entries
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .insert(id, bytes);
            Ok(())
        })
        .boxed()
    }
}
