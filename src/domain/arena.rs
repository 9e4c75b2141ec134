use std::collections::HashMap;
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::{Item, ItemId};

/// Tree node in the arena-based navigation tree.
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Content item shown by this node
    pub item: Item,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in discovery order
    pub children: Vec<Index>,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Arena-based navigation tree.
///
/// Uses generational arena for memory-safe node references and O(1) lookups.
/// Item ids are unique within one tree.
#[derive(Debug, Clone)]
pub struct NavTree {
    /// Arena storage for all tree nodes
    arena: Arena<TreeNode>,
    /// Index of the root node, None for empty trees
    root: Option<Index>,
    /// Item id to arena index
    positions: HashMap<ItemId, Index>,
}

impl Default for NavTree {
    fn default() -> Self {
        Self::new()
    }
}

impl NavTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
            positions: HashMap::new(),
        }
    }

    #[instrument(level = "trace", skip(self, item), fields(id = item.id))]
    pub fn insert_node(&mut self, item: Item, parent: Option<Index>) -> Index {
        let id = item.id;
        let node = TreeNode {
            item,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);
        self.positions.insert(id, node_idx);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.root = Some(node_idx);
        }

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn root_item(&self) -> Option<&Item> {
        self.root.and_then(|idx| self.get_node(idx)).map(|n| &n.item)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Arena index of the node holding `id`.
    pub fn find(&self, id: ItemId) -> Option<Index> {
        self.positions.get(&id).copied()
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.positions.contains_key(&id)
    }

    /// True if `id` lies strictly below `ancestor` in this tree.
    ///
    /// Walks the parent links upwards from `id`, so the cost is the depth of
    /// `id`, not the size of the subtree.
    #[instrument(level = "trace", skip(self))]
    pub fn is_descendant(&self, ancestor: Index, id: ItemId) -> bool {
        let mut cursor = self
            .find(id)
            .and_then(|idx| self.get_node(idx))
            .and_then(|node| node.parent);
        while let Some(idx) = cursor {
            if idx == ancestor {
                return true;
            }
            cursor = self.get_node(idx).and_then(|node| node.parent);
        }
        false
    }

    /// Pre-order iterator (node before its children, children left to right).
    pub fn iter(&self) -> TreeIterator {
        TreeIterator::new(self)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        if let Some(root) = self.root {
            self.calculate_depth(root)
        } else {
            0
        }
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Items of the direct children of `id`, in order. Empty if `id` is unknown.
    pub fn children_of(&self, id: ItemId) -> Vec<&Item> {
        self.find(id)
            .and_then(|idx| self.get_node(idx))
            .map(|node| {
                node.children
                    .iter()
                    .filter_map(|&c| self.get_node(c))
                    .map(|c| &c.item)
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl fmt::Display for NavTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use crate::domain::display::TreeNodeConvert;
        write!(f, "{}", self.to_tree_string())
    }
}

pub struct TreeIterator<'a> {
    tree: &'a NavTree,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a NavTree) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root() {
            stack.push(root);
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}
