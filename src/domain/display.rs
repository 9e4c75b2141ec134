//! Plain-text outline of a navigation tree (`termtree`).

use generational_arena::Index;
use termtree::Tree;

use crate::domain::arena::NavTree;

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for NavTree {
    fn to_tree_string(&self) -> Tree<String> {
        fn build_tree(nav: &NavTree, node_idx: Index) -> Tree<String> {
            match nav.get_node(node_idx) {
                Some(node) => {
                    let leaves: Vec<_> = node
                        .children
                        .iter()
                        .map(|&child| build_tree(nav, child))
                        .collect();
                    Tree::new(node.item.to_string()).with_leaves(leaves)
                }
                None => Tree::new(String::new()),
            }
        }

        match self.root() {
            Some(root_idx) => build_tree(self, root_idx),
            None => Tree::new("Empty tree".to_string()),
        }
    }
}
