//! Per-render state.

use crate::config::NavOptions;
use crate::domain::{prune, Item, NavTree};

/// Everything one render works on. Built once per call and dropped after
/// the markup is produced.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub current: Item,
    pub root: Item,
    /// Filtered flat collection, root first
    pub items: Vec<Item>,
    pub tree: NavTree,
    pub options: NavOptions,
}

impl RenderContext {
    /// Collapse off-path branches unless `full_tree` is set.
    pub fn pruned(mut self) -> Self {
        if !self.options.full_tree {
            self.tree = prune(&self.tree, self.current.id);
        }
        self
    }

    /// True if the current item survived filtering and pruning.
    pub fn shows_current(&self) -> bool {
        self.tree.contains(self.current.id)
    }
}
