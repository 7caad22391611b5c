use generational_arena::Index;
use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::ColumnForest;

/// Root label of the rendered forest.
pub const FOREST_ROOT_LABEL: &str = "columns";

pub trait TreeDisplay {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeDisplay for ColumnForest {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        fn build_tree(forest: &ColumnForest, node_idx: Index) -> Option<Tree<String>> {
            let node = forest.get_node(node_idx)?;
            let leaves: Vec<_> = node
                .children
                .iter()
                .filter_map(|&child| build_tree(forest, child))
                .collect();
            Some(Tree::new(node.data.to_string()).with_leaves(leaves))
        }

        let roots: Vec<_> = self
            .roots()
            .iter()
            .filter_map(|&root| build_tree(self, root))
            .collect();
        Tree::new(FOREST_ROOT_LABEL.to_string()).with_leaves(roots)
    }
}
