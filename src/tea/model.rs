/// Navigation model following TEA pattern
///
/// Holds the only mutable navigation state: which view is shown and the
/// generation counter that identifies the current navigation.

use crate::catalog::{Catalog, EssayDescriptor};
use crate::navigation::Location;
use std::sync::Arc;

/// What the reader is showing
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    /// The essay list; initial state when no essay is addressed
    List,

    /// A single essay
    Detail {
        essay: EssayDescriptor,
        content: EssayContent,
    },
}

/// Body of the detail view
#[derive(Debug, Clone, PartialEq)]
pub enum EssayContent {
    Loading,
    Rendered { html: String },
    Failed { reason: String },
}

impl ViewState {
    pub fn is_list(&self) -> bool {
        matches!(self, ViewState::List)
    }

    pub fn essay(&self) -> Option<&EssayDescriptor> {
        match self {
            ViewState::List => None,
            ViewState::Detail { essay, .. } => Some(essay),
        }
    }

    pub fn identifier(&self) -> Option<&str> {
        self.essay().map(|essay| essay.identifier.as_str())
    }

    pub fn content(&self) -> Option<&EssayContent> {
        match self {
            ViewState::List => None,
            ViewState::Detail { content, .. } => Some(content),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.content(), Some(EssayContent::Loading))
    }

    /// The location this state corresponds to
    pub fn location(&self) -> Location {
        match self.identifier() {
            Some(identifier) => Location::essay(identifier),
            None => Location::root(),
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState::List
    }
}

#[derive(Debug, Clone)]
pub struct Model {
    pub catalog: Arc<Catalog>,

    pub view: ViewState,

    /// Bumped on every navigation; load results carrying an older value are stale
    pub generation: u64,
}

impl Model {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            view: ViewState::List,
            generation: 0,
        }
    }

    /// Start a new navigation and return its generation
    pub fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }
}
