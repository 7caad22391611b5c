//! Domain layer: column entities and the grouping algorithm
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod coldef;
pub mod column;
pub mod error;
pub mod path;
pub mod tree_display;

pub use arena::{ColumnForest, ColumnNode, NodeData};
pub use builder::{build_pivot_groups, PivotGroupBuilder};
pub use coldef::{ColDef, ColGroupDef, HeaderGroupComponentParams, LeafColDef};
pub use column::{ColumnContext, HeaderPosition, HeaderScope, LeafColumn};
pub use error::{DomainError, DomainResult};
pub use path::{join_group_id, split_group_id, PathDeriver, ScopePathDeriver, GROUP_ID_SEPARATOR};
pub use tree_display::TreeDisplay;
