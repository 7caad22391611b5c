use std::collections::HashMap;
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::column::LeafColumn;

/// Payload of a node in the column forest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    /// Synthetic header spanning one or more columns
    Group {
        /// Path prefix joined with the group id separator
        group_id: String,
        /// Last segment of the prefix
        header_name: String,
        /// Zero for root-level groups
        depth: usize,
    },
    /// Original column definition, unmodified
    Leaf {
        column: LeafColumn,
        /// Last segment of the column's header path
        label: String,
    },
}

impl NodeData {
    pub fn label(&self) -> &str {
        match self {
            NodeData::Group { header_name, .. } => header_name,
            NodeData::Leaf { label, .. } => label,
        }
    }

    pub fn as_leaf(&self) -> Option<&LeafColumn> {
        match self {
            NodeData::Leaf { column, .. } => Some(column),
            NodeData::Group { .. } => None,
        }
    }
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeData::Group { header_name, .. } => write!(f, "{}", header_name),
            NodeData::Leaf { column, label } => write!(f, "{} ({})", label, column.col_id),
        }
    }
}

/// Node in the arena-based column forest.
#[derive(Debug)]
pub struct ColumnNode {
    pub data: NodeData,
    /// Index of the parent group, None for root-level nodes
    pub parent: Option<Index>,
    /// Child indices in first-seen order
    pub children: Vec<Index>,
}

/// Arena-based forest of column groups and leaf columns.
///
/// Every lookup used while folding columns in is scoped to one level: groups
/// by (parent, group id), leaves by (parent, key) and by (parent, label). Two
/// different paths may join to the same group id when labels contain the
/// separator, so a forest-wide id is only a convenience for callers.
#[derive(Debug)]
pub struct ColumnForest {
    arena: Arena<ColumnNode>,
    roots: Vec<Index>,
    groups: HashMap<(Option<Index>, String), Index>,
    /// First group seen for each id
    group_ids: HashMap<String, Index>,
    leaves: HashMap<(Option<Index>, String), Index>,
    /// Key of the first leaf carrying each label
    leaf_labels: HashMap<(Option<Index>, String), String>,
}

impl Default for ColumnForest {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnForest {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            roots: Vec::new(),
            groups: HashMap::new(),
            group_ids: HashMap::new(),
            leaves: HashMap::new(),
            leaf_labels: HashMap::new(),
        }
    }

    /// Appends a node as the last child of `parent`, or as the last root.
    #[instrument(level = "trace", skip(self))]
    pub(crate) fn insert_node(&mut self, data: NodeData, parent: Option<Index>) -> Index {
        let key = match &data {
            NodeData::Group { group_id, .. } => NodeKey::Group(group_id.clone()),
            NodeData::Leaf { column, label } => {
                NodeKey::Leaf(column.key().to_string(), label.clone())
            }
        };
        let node_idx = self.arena.insert(ColumnNode {
            data,
            parent,
            children: Vec::new(),
        });

        match parent.and_then(|p| self.arena.get_mut(p)) {
            Some(parent_node) => parent_node.children.push(node_idx),
            None => self.roots.push(node_idx),
        }

        match key {
            NodeKey::Group(group_id) => {
                self.group_ids.entry(group_id.clone()).or_insert(node_idx);
                self.groups.insert((parent, group_id), node_idx);
            }
            NodeKey::Leaf(col_id, label) => {
                self.leaf_labels
                    .entry((parent, label))
                    .or_insert_with(|| col_id.clone());
                self.leaves.insert((parent, col_id), node_idx);
            }
        }

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&ColumnNode> {
        self.arena.get(idx)
    }

    /// Root-level nodes in first-seen order.
    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    /// First group created with this id anywhere in the forest.
    pub fn group_index(&self, group_id: &str) -> Option<Index> {
        self.group_ids.get(group_id).copied()
    }

    /// Group with this id directly beneath `parent` (None for root level).
    pub fn child_group(&self, parent: Option<Index>, group_id: &str) -> Option<Index> {
        self.groups.get(&(parent, group_id.to_string())).copied()
    }

    /// Key of a leaf directly beneath `parent` whose label is `label`.
    pub fn leaf_labelled(&self, parent: Option<Index>, label: &str) -> Option<&str> {
        self.leaf_labels
            .get(&(parent, label.to_string()))
            .map(String::as_str)
    }

    pub fn leaf_index(&self, parent: Option<Index>, col_id: &str) -> Option<Index> {
        self.leaves.get(&(parent, col_id.to_string())).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    pub fn iter(&self) -> ForestIterator<'_> {
        ForestIterator::new(self)
    }

    /// Number of header levels, zero for an empty forest.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.roots
            .iter()
            .map(|&root| self.calculate_depth(root))
            .max()
            .unwrap_or(0)
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

    /// All leaf columns in display order.
    pub fn leaves(&self) -> Vec<&LeafColumn> {
        self.iter().filter_map(|(_, node)| node.data.as_leaf()).collect()
    }

    /// Leaf columns beneath a node in display order; a leaf yields itself.
    #[instrument(level = "debug", skip(self))]
    pub fn leaves_under(&self, node_idx: Index) -> Vec<&LeafColumn> {
        let mut leaves = Vec::new();
        self.collect_leaves(node_idx, &mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, node_idx: Index, leaves: &mut Vec<&'a LeafColumn>) {
        if let Some(node) = self.get_node(node_idx) {
            match &node.data {
                NodeData::Leaf { column, .. } => leaves.push(column),
                NodeData::Group { .. } => {
                    for &child in &node.children {
                        self.collect_leaves(child, leaves);
                    }
                }
            }
        }
    }

    /// Labels from the outermost group down to the node itself.
    pub fn path_of(&self, node_idx: Index) -> Vec<String> {
        let mut path = Vec::new();
        let mut current = Some(node_idx);
        while let Some(idx) = current {
            match self.get_node(idx) {
                Some(node) => {
                    path.push(node.data.label().to_string());
                    current = node.parent;
                }
                None => break,
            }
        }
        path.reverse();
        path
    }
}

enum NodeKey {
    Group(String),
    /// Key and label
    Leaf(String, String),
}

/// Pre-order traversal over all roots, left to right.
pub struct ForestIterator<'a> {
    forest: &'a ColumnForest,
    stack: Vec<Index>,
}

impl<'a> ForestIterator<'a> {
    fn new(forest: &'a ColumnForest) -> Self {
        let stack = forest.roots().iter().rev().copied().collect();
        Self { forest, stack }
    }
}

impl<'a> Iterator for ForestIterator<'a> {
    type Item = (Index, &'a ColumnNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.forest.get_node(current_idx) {
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
