//! Header paths: group identifiers and path derivation for leaf columns.

use itertools::Itertools;
use tracing::instrument;

use crate::domain::column::{ColumnContext, HeaderPosition, HeaderScope, LeafColumn};
use crate::domain::error::{DomainError, DomainResult};

/// Separator between path segments in synthetic group identifiers.
pub const GROUP_ID_SEPARATOR: &str = "/";

/// Label used for an attribute scope without an element value.
pub const EMPTY_ELEMENT_LABEL: &str = "(empty value)";

/// Label of the measure-name column in transposed layouts.
pub const MEASURE_GROUP_LABEL: &str = "Measures";

/// Join path segments into a group identifier.
pub fn join_group_id<S: AsRef<str>>(segments: &[S]) -> String {
    segments.iter().map(AsRef::as_ref).join(GROUP_ID_SEPARATOR)
}

/// Decompose a group identifier back into its path segments.
pub fn split_group_id(group_id: &str) -> Vec<&str> {
    if group_id.is_empty() {
        return Vec::new();
    }
    group_id.split(GROUP_ID_SEPARATOR).collect()
}

/// Computes the header path of a leaf column.
///
/// The returned path runs from the outermost group label to the leaf's own
/// label. `is_transposed` and `header_position` are passed through unchanged
/// for every leaf of one build.
pub trait PathDeriver {
    fn derive_path(
        &self,
        column: &LeafColumn,
        is_transposed: bool,
        header_position: HeaderPosition,
    ) -> DomainResult<Vec<String>>;
}

impl<F> PathDeriver for F
where
    F: Fn(&LeafColumn, bool, HeaderPosition) -> DomainResult<Vec<String>>,
{
    fn derive_path(
        &self,
        column: &LeafColumn,
        is_transposed: bool,
        header_position: HeaderPosition,
    ) -> DomainResult<Vec<String>> {
        self(column, is_transposed, header_position)
    }
}

/// Derives paths from a column's scope.
///
/// - attribute columns: `[attribute name]`
/// - value columns: element labels, total types and measure names in scope
///   order; measures are dropped when transposed and moved to the front when
///   headers sit on the left
/// - measure group header: `[header name]`, or "Measures"
/// - explicit paths are returned as given
#[derive(Debug, Clone, Copy, Default)]
pub struct ScopePathDeriver;

impl PathDeriver for ScopePathDeriver {
    #[instrument(level = "trace", skip(self, column), fields(col_id = %column.col_id))]
    fn derive_path(
        &self,
        column: &LeafColumn,
        is_transposed: bool,
        header_position: HeaderPosition,
    ) -> DomainResult<Vec<String>> {
        let path = match &column.context {
            ColumnContext::Attribute { attribute_name } => vec![attribute_name.clone()],
            ColumnContext::MeasureGroupHeader => vec![column
                .header_name
                .clone()
                .unwrap_or_else(|| MEASURE_GROUP_LABEL.to_string())],
            ColumnContext::Explicit { path } => path.clone(),
            ColumnContext::Value { column_scope } => {
                value_path(column, column_scope, is_transposed, header_position)?
            }
        };
        Ok(path)
    }
}

fn value_path(
    column: &LeafColumn,
    column_scope: &[HeaderScope],
    is_transposed: bool,
    header_position: HeaderPosition,
) -> DomainResult<Vec<String>> {
    let mut measures = Vec::new();
    let mut elements = Vec::new();

    for scope in column_scope {
        match scope {
            HeaderScope::Attribute { element, .. } => elements.push(
                element
                    .clone()
                    .unwrap_or_else(|| EMPTY_ELEMENT_LABEL.to_string()),
            ),
            HeaderScope::AttributeTotal {
                attribute_name,
                total_type,
            } => {
                if total_type.trim().is_empty() {
                    return Err(DomainError::PathDerivation {
                        col_id: column.col_id.clone(),
                        message: format!("total on '{}' has no type", attribute_name),
                    });
                }
                elements.push(total_type.to_uppercase())
            }
            HeaderScope::Measure { measure_name } => measures.push(measure_name.clone()),
        }
    }

    // measures live in rows when transposed
    if is_transposed {
        measures.clear();
    }

    let mut path = match header_position {
        HeaderPosition::Top => elements.into_iter().chain(measures).collect::<Vec<_>>(),
        HeaderPosition::Left => measures.into_iter().chain(elements).collect::<Vec<_>>(),
    };

    if path.is_empty() {
        path.push(column.label().to_string());
    }
    Ok(path)
}
