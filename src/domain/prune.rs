//! Collapsing of branches that are off the path to the current item.
//!
//! A branch keeps its children only if it is the current item or one of its
//! ancestors. Every other branch stays visible but loses its subtree, so the
//! result shows the ancestor chain of the current item, all siblings along
//! that chain, and the current item's direct children.

use generational_arena::Index;
use tracing::instrument;

use crate::domain::arena::NavTree;
use crate::domain::ItemId;

/// What to do with the children of one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollapseDecision {
    /// Keep the node and prune its children recursively
    Expand,
    /// Keep the node, drop its children
    Collapse,
}

/// Decide whether `node` collapses, relative to the `current` item.
///
/// Collapses iff the node is not the current item and the current item is
/// not among its descendants.
pub fn collapse_decision(tree: &NavTree, node: Index, current: ItemId) -> CollapseDecision {
    let is_current = tree
        .get_node(node)
        .map(|n| n.item.id == current)
        .unwrap_or(false);
    if is_current || tree.is_descendant(node, current) {
        CollapseDecision::Expand
    } else {
        CollapseDecision::Collapse
    }
}

/// Return a pruned copy of `tree`. The input is left untouched.
#[instrument(level = "debug", skip(tree), fields(nodes = tree.len()))]
pub fn prune(tree: &NavTree, current: ItemId) -> NavTree {
    let mut pruned = NavTree::new();
    if let Some(root) = tree.root() {
        copy_pruned(tree, root, current, &mut pruned, None);
    }
    pruned
}

fn copy_pruned(
    source: &NavTree,
    idx: Index,
    current: ItemId,
    target: &mut NavTree,
    parent: Option<Index>,
) {
    let Some(node) = source.get_node(idx) else {
        return;
    };
    let copied = target.insert_node(node.item.clone(), parent);

    // leaf: nothing to prune
    if node.is_leaf() {
        return;
    }
    match collapse_decision(source, idx, current) {
        CollapseDecision::Collapse => {}
        CollapseDecision::Expand => {
            for &child in &node.children {
                copy_pruned(source, child, current, target, Some(copied));
            }
        }
    }
}
