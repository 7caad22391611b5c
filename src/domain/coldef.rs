//! Export of the column forest in the data grid's column-definition schema.

use generational_arena::Index;
use serde::Serialize;

use crate::domain::arena::{ColumnForest, NodeData};
use crate::domain::column::LeafColumn;

/// Column definition consumed by the grid: a leaf column or a column group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ColDef {
    Group(ColGroupDef),
    Leaf(LeafColDef),
}

/// Leaf entry; `field` falls back to `colId` as the grid expects and
/// `headerName` to the label the column was placed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeafColDef {
    pub field: String,
    #[serde(flatten)]
    pub column: LeafColumn,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColGroupDef {
    pub group_id: String,
    pub header_name: String,
    pub children: Vec<ColDef>,
    pub header_group_component_params: HeaderGroupComponentParams,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderGroupComponentParams {
    pub pivot_group_depth: usize,
}

impl ColumnForest {
    /// Nested column definitions in display order.
    pub fn to_col_defs(&self) -> Vec<ColDef> {
        self.roots()
            .iter()
            .filter_map(|&idx| self.col_def(idx))
            .collect()
    }

    fn col_def(&self, idx: Index) -> Option<ColDef> {
        let node = self.get_node(idx)?;
        let def = match &node.data {
            NodeData::Leaf { column, label } => {
                let mut column = column.clone();
                let field = column.field.take().unwrap_or_else(|| column.col_id.clone());
                column.header_name.get_or_insert_with(|| label.clone());
                ColDef::Leaf(LeafColDef { field, column })
            }
            NodeData::Group {
                group_id,
                header_name,
                depth,
            } => ColDef::Group(ColGroupDef {
                group_id: group_id.clone(),
                header_name: header_name.clone(),
                children: node
                    .children
                    .iter()
                    .filter_map(|&child| self.col_def(child))
                    .collect(),
                header_group_component_params: HeaderGroupComponentParams {
                    pivot_group_depth: *depth,
                },
            }),
        };
        Some(def)
    }

    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        let defs = self.to_col_defs();
        if pretty {
            serde_json::to_string_pretty(&defs)
        } else {
            serde_json::to_string(&defs)
        }
    }
}
