//! Domain layer: entities and tree algorithms
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod display;
pub mod entities;
pub mod error;
pub mod markup;
pub mod prune;

pub use arena::{NavTree, TreeNode};
pub use builder::{TreeBuilder, TreeResult, DEFAULT_MAX_DEPTH};
pub use entities::*;
pub use error::{DomainError, LookupError};
pub use markup::{navigation_list, Element, Markup};
pub use prune::{collapse_decision, prune, CollapseDecision};
