//! Saving and restoring page stacks.
//!
//! Stacks are written as versioned [`StackSnapshot`]s in JSON or bincode.
//! Storage sits behind the [`StackRepository`] trait, whose operations
//! are stillwater effects.

pub mod error;
mod repository;
mod snapshot;

pub use error::{RepositoryError, SnapshotError};
pub use repository::{InMemoryStackRepository, StackRepository};
pub use snapshot::{SnapshotFormat, StackSnapshot, SNAPSHOT_VERSION};
