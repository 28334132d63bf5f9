//! Build errors for the coordinator and factory builders.

use thiserror::Error;

/// Errors that can occur when building coordinators and factory sets.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Depth order not specified. Call .depth_order(order) before .build()")]
    MissingDepthOrder,

    #[error("No factories registered. Register at least one page kind")]
    NoFactories,

    #[error("Page kinds registered more than once: {}", .0.join(", "))]
    DuplicateFactoryKinds(Vec<String>),
}
