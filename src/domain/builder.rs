//! Folds flat leaf columns into a forest of column groups.

use generational_arena::Index;
use tracing::{debug, instrument, trace};

use crate::domain::arena::{ColumnForest, NodeData};
use crate::domain::column::{HeaderPosition, LeafColumn};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::path::{join_group_id, PathDeriver, ScopePathDeriver};

/// Build grouped column headers using the scope-based path deriver.
pub fn build_pivot_groups(
    leaves: &[LeafColumn],
    is_transposed: bool,
    header_position: HeaderPosition,
) -> DomainResult<ColumnForest> {
    PivotGroupBuilder::new(ScopePathDeriver).build(leaves, is_transposed, header_position)
}

/// Constructs a column forest from leaf columns and their header paths.
///
/// Each leaf's path is walked from the root: every segment but the last
/// resolves to a group (created on first sight, shared afterwards) and the
/// last segment places the leaf. A leaf whose key already exists at its level
/// is absorbed. Groups and conflicts are resolved among the current level's
/// siblings only, so labels containing the group id separator cannot reach
/// into another branch.
pub struct PivotGroupBuilder<D = ScopePathDeriver> {
    deriver: D,
}

impl Default for PivotGroupBuilder<ScopePathDeriver> {
    fn default() -> Self {
        Self::new(ScopePathDeriver)
    }
}

impl<D: PathDeriver> PivotGroupBuilder<D> {
    pub fn new(deriver: D) -> Self {
        Self { deriver }
    }

    #[instrument(level = "debug", skip(self, leaves), fields(leaves = leaves.len()))]
    pub fn build(
        &self,
        leaves: &[LeafColumn],
        is_transposed: bool,
        header_position: HeaderPosition,
    ) -> DomainResult<ColumnForest> {
        let mut forest = ColumnForest::new();

        for leaf in leaves {
            let path = self
                .deriver
                .derive_path(leaf, is_transposed, header_position)?;
            trace!("col_id={} path={:?}", leaf.col_id, path);
            self.insert_leaf(&mut forest, leaf, &path)?;
        }

        debug!(
            "built {} groups, {} leaves, depth {}",
            forest.group_count(),
            forest.leaf_count(),
            forest.depth()
        );
        Ok(forest)
    }

    fn insert_leaf(
        &self,
        forest: &mut ColumnForest,
        leaf: &LeafColumn,
        path: &[String],
    ) -> DomainResult<()> {
        let (label, ancestors) = path.split_last().ok_or_else(|| DomainError::EmptyPath {
            col_id: leaf.col_id.clone(),
        })?;

        let mut parent: Option<Index> = None;
        for (depth, segment) in ancestors.iter().enumerate() {
            let group_id = join_group_id(&path[..=depth]);
            parent = Some(match forest.child_group(parent, &group_id) {
                Some(idx) => idx,
                None => {
                    if let Some(col_id) = forest.leaf_labelled(parent, segment) {
                        return Err(DomainError::PathConflict {
                            group_id,
                            col_id: col_id.to_string(),
                        });
                    }
                    trace!("new group {}", group_id);
                    forest.insert_node(
                        NodeData::Group {
                            group_id,
                            header_name: segment.clone(),
                            depth,
                        },
                        parent,
                    )
                }
            });
        }

        let path_id = join_group_id(path);
        if forest.child_group(parent, &path_id).is_some() {
            return Err(DomainError::PathConflict {
                group_id: path_id,
                col_id: leaf.col_id.clone(),
            });
        }

        if forest.leaf_index(parent, leaf.key()).is_some() {
            trace!("duplicate column {} absorbed", leaf.col_id);
            return Ok(());
        }

        forest.insert_node(
            NodeData::Leaf {
                column: leaf.clone(),
                label: label.clone(),
            },
            parent,
        );
        Ok(())
    }
}
