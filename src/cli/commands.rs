//! Command dispatch

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use tracing::{debug, instrument};

use crate::application::services::{BuildOptions, OutputFormat};
use crate::cli::args::{Cli, Commands, ConfigCommands, LayoutArgs};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::split_group_id;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Build {
            file,
            layout,
            format,
            compact,
            output,
        }) => _build(file, layout, *format, *compact, output.as_deref()),
        Some(Commands::Tree { file, layout }) => {
            _build(file, layout, Some(OutputFormat::Tree), false, None)
        }
        Some(Commands::Leaves {
            file,
            group_id,
            layout,
        }) => _leaves(file, group_id, layout),
        Some(Commands::Split { group_id }) => _split(group_id),
        Some(Commands::Config { command }) => _config(command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see --help".to_string(),
        )),
    }
}

/// Settings for a column file: config layers from its directory, then flags.
fn container_for(file: &Path, layout: &LayoutArgs) -> CliResult<(ServiceContainer, BuildOptions)> {
    let dir = file.parent().filter(|p| !p.as_os_str().is_empty());
    let container = ServiceContainer::new(Settings::load(dir)?);
    let mut options = BuildOptions::from(container.settings.as_ref());
    if let Some(transposed) = layout.transposed {
        options.is_transposed = transposed;
    }
    if let Some(position) = layout.header_position {
        options.header_position = position;
    }
    debug!("options: {:?}", options);
    Ok((container, options))
}

fn write_stdout(content: &str) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", content)
        .and_then(|_| stdout.flush())
        .map_err(InfraError::Stdout)?;
    Ok(())
}

#[instrument]
fn _build(
    file: &Path,
    layout: &LayoutArgs,
    format: Option<OutputFormat>,
    compact: bool,
    output: Option<&Path>,
) -> CliResult<()> {
    let (container, mut options) = container_for(file, layout)?;
    if let Some(format) = format {
        options.format = format;
    }
    if compact {
        options.pretty = false;
    }

    let forest = container.grouping.build(file, &options)?;
    let rendered = container.grouping.render(&forest, &options)?;

    match output {
        Some(path) => {
            container.grouping.write_output(path, &rendered)?;
            output::action(
                "Written",
                &format!(
                    "{} ({} groups, {} columns)",
                    path.display(),
                    forest.group_count(),
                    forest.leaf_count()
                ),
            );
            Ok(())
        }
        None => write_stdout(&rendered),
    }
}

#[instrument]
fn _leaves(file: &Path, group_id: &str, layout: &LayoutArgs) -> CliResult<()> {
    let (container, options) = container_for(file, layout)?;
    let leaves = container.grouping.leaves_of(file, group_id, &options)?;
    if leaves.is_empty() {
        output::warning(&format!("group '{}' has no columns", group_id));
    }
    let ids: Vec<&str> = leaves.iter().map(|c| c.col_id.as_str()).collect();
    write_stdout(&ids.join("\n"))
}

#[instrument]
fn _split(group_id: &str) -> CliResult<()> {
    let segments = split_group_id(group_id);
    if segments.is_empty() {
        return Err(CliError::InvalidArgs("empty group id".to_string()));
    }
    write_stdout(&segments.join("\n"))
}

#[instrument]
fn _config(command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show { dir } => {
            let settings = Settings::load(dir.as_deref())?;
            write_stdout(settings.to_toml()?.trim_end())
        }
        ConfigCommands::Path => {
            output::header("Config files");
            let global = global_config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(no config directory)".to_string());
            output::detail(&format!("global: {}", global));
            let local = std::env::current_dir()
                .map(|cwd| local_config_path(&cwd))
                .unwrap_or_else(|_| PathBuf::from(".pivot-groups.toml"));
            output::detail(&format!("local:  {}", local.display()));
            Ok(())
        }
        ConfigCommands::Template => write_stdout(Settings::template().trim_end()),
    }
}
