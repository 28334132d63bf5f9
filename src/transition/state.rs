//! States the coordinator can transition between.

use crate::core::{PageDefinition, PageId, PageStack};
use std::fmt::Debug;
use std::hash::Hash;

/// A navigational state the coordinator can show.
///
/// The key identifies the state for layout tracking and change
/// detection: two states with equal keys are the same page as far as
/// transitions are concerned.
pub trait TransitionState: Clone + Debug + Send + Sync + 'static {
    type Key: Clone + Eq + Hash + Debug + Send + Sync + 'static;

    fn transition_key(&self) -> Self::Key;
}

/// A stack is shown through its head page.
impl<D: PageDefinition> TransitionState for PageStack<D> {
    type Key = PageId;

    fn transition_key(&self) -> PageId {
        self.head().id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum TestPage {
        Home,
        Detail,
    }

    impl PageDefinition for TestPage {
        fn kind(&self) -> &str {
            match self {
                Self::Home => "Home",
                Self::Detail => "Detail",
            }
        }
    }

    #[test]
    fn stack_key_follows_head() {
        let stack = PageStack::with_page(TestPage::Home);
        let deeper = stack.push(TestPage::Detail);

        assert_eq!(stack.transition_key(), stack.head().id());
        assert_ne!(stack.transition_key(), deeper.transition_key());
        assert_eq!(
            deeper.tail_or_none().unwrap().transition_key(),
            stack.transition_key()
        );
    }
}
