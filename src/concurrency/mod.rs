//! Concurrency primitives.

mod mutex;

pub use mutex::{CancellingMutex, Cancelled};
