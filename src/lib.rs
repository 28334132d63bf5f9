//! Pageflow: page stacks, two-phase transitions and page-state lifecycle
//!
//! Pageflow is the navigation runtime behind a multi-page UI. It keeps the
//! pure parts pure (immutable stacks, transition resolution as a value
//! computation) and isolates effects behind stillwater effects and
//! cancellation scopes.
//!
//! # Core Concepts
//!
//! - **PageStack**: Immutable, never-empty history of saved pages
//! - **TransitionCoordinator**: Resolves which pages are visible and which
//!   element animations run, measuring unseen pages before animating them
//! - **TransitionSpec**: Per-element animations keyed by edge and role
//! - **PageStateStore**: Builds, caches and retires per-page state
//! - **CancellingMutex**: Latest-wins exclusion for async work
//!
//! # Example
//!
//! ```rust
//! use pageflow::core::{Offset, PageStack, Size};
//! use pageflow::page_enum;
//! use pageflow::transition::{TransitionCoordinator, TransitionPhase, TransitionState};
//!
//! page_enum! {
//!     enum Page {
//!         Home,
//!         Detail(u32),
//!     }
//! }
//!
//! let mut coordinator = TransitionCoordinator::new(PageStack::depth_order());
//!
//! let home = PageStack::with_page(Page::Home);
//! coordinator.resolve(home.clone());
//! coordinator.report_layout(&home.transition_key(), Size::new(360.0, 640.0), Offset::ZERO);
//!
//! // The detail page has never been measured: it is composed underneath
//! // the home page first.
//! let detail = home.push(Page::Detail(7));
//! let visible = coordinator.resolve(detail.clone());
//! assert_eq!(visible[0].key(), &detail.transition_key());
//! assert!(matches!(coordinator.phase(), Some(TransitionPhase::Measuring { .. })));
//!
//! // Once measured, the push animates.
//! coordinator.report_layout(&detail.transition_key(), Size::new(360.0, 640.0), Offset::ZERO);
//! coordinator.resolve(detail);
//! assert!(matches!(coordinator.phase(), Some(TransitionPhase::Animating { .. })));
//! ```

pub mod animation;
pub mod builder;
pub mod concurrency;
pub mod config;
pub mod core;
pub mod layout;
pub mod lifecycle;
pub mod persistence;
pub mod transition;

// Re-export commonly used types
pub use animation::{TransitionRole, TransitionSpec};
pub use config::RuntimeConfig;
pub use crate::core::{PageDefinition, PageId, PageStack, SavedPageState, StackId};
pub use lifecycle::{PageStackState, PageStateStore};
pub use transition::{TransitionCoordinator, VisibleEntry};
