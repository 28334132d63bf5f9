//! Builder API for ergonomic coordinator and factory construction.
//!
//! This module provides fluent builders and the `page_enum!` macro for
//! wiring up navigation with minimal boilerplate while validating the
//! result up front.

mod coordinator;
pub mod error;
mod factories;
pub mod macros;

pub use coordinator::TransitionCoordinatorBuilder;
pub use error::BuildError;
pub use factories::PageStateFactoriesBuilder;
