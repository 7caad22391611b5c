//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::application::services::OutputFormat;
use crate::domain::HeaderPosition;

/// Fold pivoted column definitions into grouped multi-level column headers
#[derive(Parser, Debug)]
#[command(name = "pivot-groups")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output: -d info, -dd debug, -ddd trace
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub debug: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Display-mode flags forwarded to path derivation.
#[derive(Args, Debug, Clone, Default)]
pub struct LayoutArgs {
    /// Measures laid out in rows
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub transposed: Option<bool>,

    /// Placement of column attribute headers
    #[arg(long, value_enum)]
    pub header_position: Option<HeaderPosition>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build grid column definitions from a column file
    Build {
        /// JSON file with leaf column definitions
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,

        #[command(flatten)]
        layout: LayoutArgs,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Single-line JSON
        #[arg(long)]
        compact: bool,

        /// Write to file instead of stdout
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Show column groups as tree
    Tree {
        /// JSON file with leaf column definitions
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// List leaf columns beneath a group
    Leaves {
        /// JSON file with leaf column definitions
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,

        /// Group id, e.g. "2024/Q1"
        group_id: String,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Split a group id into its header path
    Split {
        /// Group id
        group_id: String,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show {
        /// Directory with a local .pivot-groups.toml
        #[arg(value_hint = ValueHint::DirPath)]
        dir: Option<PathBuf>,
    },
    /// Show config file locations
    Path,
    /// Print a config template
    Template,
}
