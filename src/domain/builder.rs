//! Tree builder: nests a flat, parent-linked item collection under a root.

use std::collections::{HashMap, HashSet};

use generational_arena::Index;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::domain::arena::NavTree;
use crate::domain::error::DomainError;
use crate::domain::{Item, ItemId};

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, DomainError>;

/// Default nesting limit, far beyond any real navigation.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Constructs a navigation tree from a flat item collection.
///
/// Children are attached in the order they appear in the collection. Items
/// whose parent is not part of the collection are never attached.
/// Parent cycles are reported as errors instead of looping.
pub struct TreeBuilder {
    children_index: HashMap<ItemId, Vec<Item>>,
    visited: HashSet<ItemId>,
    max_depth: usize,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            children_index: HashMap::new(),
            visited: HashSet::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Build the tree rooted at `root` from `items`.
    ///
    /// `items` may or may not contain the root itself; the root's own parent
    /// pointer is ignored either way.
    #[instrument(level = "debug", skip(self, root, items), fields(root = root.id, items = items.len()))]
    pub fn build(&mut self, root: &Item, items: &[Item]) -> TreeResult<NavTree> {
        // Reset state for a fresh build
        self.visited.clear();
        self.children_index = items
            .iter()
            .filter(|item| item.id != root.id)
            .filter_map(|item| item.parent.map(|parent| (parent, item.clone())))
            .into_group_map();

        let mut tree = NavTree::new();
        self.attach(&mut tree, root.clone(), None, 1)?;

        let orphans = items
            .iter()
            .filter(|item| !tree.contains(item.id))
            .map(|item| item.id)
            .collect_vec();
        if !orphans.is_empty() {
            debug!("dropped {} unattached items: {:?}", orphans.len(), orphans);
        }

        Ok(tree)
    }

    fn attach(
        &mut self,
        tree: &mut NavTree,
        item: Item,
        parent: Option<Index>,
        depth: usize,
    ) -> TreeResult<()> {
        if depth > self.max_depth {
            return Err(DomainError::DepthExceeded {
                id: item.id,
                max_depth: self.max_depth,
            });
        }
        // Cycle detection
        if !self.visited.insert(item.id) {
            return Err(DomainError::CycleDetected(item.id));
        }

        let id = item.id;
        let idx = tree.insert_node(item, parent);

        // Each parent's children are consumed exactly once
        let children = self.children_index.remove(&id).unwrap_or_default();
        for child in children {
            self.attach(tree, child, Some(idx), depth + 1)?;
        }
        Ok(())
    }
}
