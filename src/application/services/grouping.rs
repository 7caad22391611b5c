//! Column grouping service
//!
//! Loads leaf column definitions from a JSON file, folds them into a column
//! forest and renders the result for the grid or the terminal.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoPathExt};
use crate::config::Settings;
use crate::domain::{build_pivot_groups, ColumnForest, HeaderPosition, LeafColumn, TreeDisplay};
use crate::infrastructure::traits::FileSystem;

/// How a built forest is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Grid column definitions
    #[default]
    Json,
    /// Indented header tree
    Tree,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Tree => write!(f, "tree"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "tree" => Ok(OutputFormat::Tree),
            other => Err(format!("unknown output format: {}", other)),
        }
    }
}

/// Display-mode flags and rendering options for one build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildOptions {
    pub is_transposed: bool,
    pub header_position: HeaderPosition,
    pub format: OutputFormat,
    pub pretty: bool,
}

impl From<&Settings> for BuildOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            is_transposed: settings.transposed,
            header_position: settings.header_position,
            format: settings.format,
            pretty: settings.pretty,
        }
    }
}

/// Accepted column file layouts: a bare array or `{ "columns": [...] }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ColumnSet {
    Wrapped { columns: Vec<LeafColumn> },
    Bare(Vec<LeafColumn>),
}

impl ColumnSet {
    pub fn into_columns(self) -> Vec<LeafColumn> {
        match self {
            ColumnSet::Wrapped { columns } => columns,
            ColumnSet::Bare(columns) => columns,
        }
    }
}

/// Service for building grouped column headers from column files.
pub struct GroupingService {
    fs: Arc<dyn FileSystem>,
}

impl GroupingService {
    /// Create a new grouping service.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Read leaf column definitions in file order.
    #[instrument(level = "debug", skip(self))]
    pub fn load_columns(&self, path: &Path) -> ApplicationResult<Vec<LeafColumn>> {
        if !self.fs.exists(path) {
            return Err(ApplicationError::InputNotFound(path.to_path_buf()));
        }
        if !self.fs.is_file(path) {
            return Err(ApplicationError::InvalidInput {
                path: path.to_path_buf(),
                message: "not a file".to_string(),
            });
        }
        let content = self
            .fs
            .read_to_string(path)
            .reading_columns(path)?;

        let set: ColumnSet =
            serde_json::from_str(&content).map_err(|e| ApplicationError::InvalidInput {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        let columns = set.into_columns();
        debug!("load_columns: {} columns", columns.len());
        Ok(columns)
    }

    /// Build the column forest for a column file.
    pub fn build(&self, path: &Path, options: &BuildOptions) -> ApplicationResult<ColumnForest> {
        let columns = self.load_columns(path)?;
        let forest = build_pivot_groups(&columns, options.is_transposed, options.header_position)?;
        Ok(forest)
    }

    /// Render a forest in the requested format.
    pub fn render(&self, forest: &ColumnForest, options: &BuildOptions) -> ApplicationResult<String> {
        match options.format {
            OutputFormat::Json => forest
                .to_json(options.pretty)
                .map_err(ApplicationError::Serialize),
            OutputFormat::Tree => Ok(forest.to_tree_string().to_string()),
        }
    }

    /// Leaf columns beneath a group, in display order.
    pub fn leaves_of(
        &self,
        path: &Path,
        group_id: &str,
        options: &BuildOptions,
    ) -> ApplicationResult<Vec<LeafColumn>> {
        let forest = self.build(path, options)?;
        let idx = forest
            .group_index(group_id)
            .ok_or_else(|| ApplicationError::UnknownGroup(group_id.to_string()))?;
        Ok(forest.leaves_under(idx).into_iter().cloned().collect())
    }

    /// Write rendered output to a file.
    pub fn write_output(&self, path: &Path, content: &str) -> ApplicationResult<()> {
        self.fs
            .write(path, content)
            .writing_output(path)
    }
}
