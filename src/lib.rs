//! Grouped multi-level column headers for pivoted data grids.
//!
//! Leaf column definitions carry a hierarchical header path; the
//! [`domain::PivotGroupBuilder`] folds them into a forest of column groups
//! whose shape matches the grid's column-definition schema.
//!
//! ```ignore
//! use pivot_groups::domain::{build_pivot_groups, HeaderPosition, LeafColumn};
//!
//! let leaves = vec![
//!     LeafColumn::with_path("a1", ["G", "A1"]),
//!     LeafColumn::with_path("a2", ["G", "A2"]),
//! ];
//! let forest = build_pivot_groups(&leaves, false, HeaderPosition::Top)?;
//! println!("{}", forest.to_json(true)?);
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use domain::{build_pivot_groups, ColumnForest, DomainError, HeaderPosition, LeafColumn};
