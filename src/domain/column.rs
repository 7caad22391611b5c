//! Column entities: leaf column definitions and their display context

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Where column attribute headers are rendered in the pivot table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HeaderPosition {
    #[default]
    Top,
    Left,
}

impl fmt::Display for HeaderPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderPosition::Top => write!(f, "top"),
            HeaderPosition::Left => write!(f, "left"),
        }
    }
}

impl FromStr for HeaderPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(HeaderPosition::Top),
            "left" => Ok(HeaderPosition::Left),
            other => Err(format!("unknown header position: {}", other)),
        }
    }
}

/// One renderable data column, independent of grouping.
///
/// Serialises with the grid's column-definition field names, so a leaf placed
/// in the output forest is exactly the definition the caller supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeafColumn {
    /// Identifying key, unique among siblings
    pub col_id: String,
    /// Row-data field; the grid falls back to `colId` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Display label of the column header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_name: Option<String>,
    /// Context consulted by the path deriver only
    #[serde(default)]
    pub context: ColumnContext,
}

impl LeafColumn {
    pub fn new(col_id: impl Into<String>, context: ColumnContext) -> Self {
        Self {
            col_id: col_id.into(),
            field: None,
            header_name: None,
            context,
        }
    }

    /// Column with a precomputed header path.
    pub fn with_path<I, S>(col_id: impl Into<String>, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            col_id,
            ColumnContext::Explicit {
                path: path.into_iter().map(Into::into).collect(),
            },
        )
    }

    pub fn header_name(mut self, header_name: impl Into<String>) -> Self {
        self.header_name = Some(header_name.into());
        self
    }

    /// The discriminator used for de-duplication among siblings.
    pub fn key(&self) -> &str {
        &self.col_id
    }

    /// Label shown for this column when no header path segment names it.
    pub fn label(&self) -> &str {
        self.header_name.as_deref().unwrap_or(&self.col_id)
    }
}

/// What a column represents in the pivoted result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ColumnContext {
    /// Row attribute header column
    #[serde(rename_all = "camelCase")]
    Attribute { attribute_name: String },
    /// Data column scoped by column attribute elements, totals and measures
    #[serde(rename_all = "camelCase")]
    Value { column_scope: Vec<HeaderScope> },
    /// Column listing measure names when measures are laid out in rows
    MeasureGroupHeader,
    /// Header path computed elsewhere
    Explicit { path: Vec<String> },
}

impl Default for ColumnContext {
    fn default() -> Self {
        ColumnContext::Explicit { path: Vec::new() }
    }
}

/// One level of a data column's scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HeaderScope {
    #[serde(rename_all = "camelCase")]
    Attribute {
        attribute_name: String,
        #[serde(default)]
        element: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    AttributeTotal {
        attribute_name: String,
        total_type: String,
    },
    #[serde(rename_all = "camelCase")]
    Measure { measure_name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_position_from_str() {
        assert_eq!("top".parse::<HeaderPosition>(), Ok(HeaderPosition::Top));
        assert_eq!(" Left ".parse::<HeaderPosition>(), Ok(HeaderPosition::Left));
        assert!("bottom".parse::<HeaderPosition>().is_err());
    }

    #[test]
    fn test_leaf_column_deserializes_grid_names() {
        let json = r#"{
            "colId": "c_0",
            "headerName": "Revenue",
            "context": {
                "type": "value",
                "columnScope": [
                    { "type": "attribute", "attributeName": "Year", "element": "2024" },
                    { "type": "measure", "measureName": "Revenue" }
                ]
            }
        }"#;
        let column: LeafColumn = serde_json::from_str(json).unwrap();
        assert_eq!(column.key(), "c_0");
        assert_eq!(column.label(), "Revenue");
        match column.context {
            ColumnContext::Value { column_scope } => assert_eq!(column_scope.len(), 2),
            other => panic!("unexpected context: {:?}", other),
        }
    }
}
