//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/pivot-groups/pivot-groups.toml`
//! 3. Local config: `<dir>/.pivot-groups.toml` (directory of the column file)
//! 4. Environment variables: `PIVOT_GROUPS_*` prefix
//!
//! Command line flags are applied on top by the CLI layer.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::services::OutputFormat;
use crate::application::ApplicationError;
use crate::domain::HeaderPosition;

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "PIVOT_GROUPS";

/// Unified configuration for pivot-groups.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Where column attribute headers are placed (default: top)
    pub header_position: HeaderPosition,
    /// Measures laid out in rows (default: false)
    pub transposed: bool,
    /// Output format of `build` (default: json)
    pub format: OutputFormat,
    /// Pretty-print JSON output (default: true)
    pub pretty: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            header_position: HeaderPosition::Top,
            transposed: false,
            format: OutputFormat::Json,
            pretty: true,
        }
    }
}

/// Raw settings for intermediate parsing (Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub header_position: Option<HeaderPosition>,
    pub transposed: Option<bool>,
    pub format: Option<OutputFormat>,
    pub pretty: Option<bool>,
}

/// Get the XDG config directory for pivot-groups.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "pivot-groups").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("pivot-groups.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".pivot-groups.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Merge overlay config onto self (base): overlay wins if Some.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            header_position: overlay.header_position.unwrap_or(self.header_position),
            transposed: overlay.transposed.unwrap_or(self.transposed),
            format: overlay.format.unwrap_or(self.format),
            pretty: overlay.pretty.unwrap_or(self.pretty),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.pivot-groups.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        Self::apply_env_overrides(current)
    }

    /// Apply PIVOT_GROUPS_* environment variables as explicit overrides.
    fn apply_env_overrides(settings: Self) -> Result<Self, ApplicationError> {
        Self::apply_overrides(settings, Environment::with_prefix(ENV_PREFIX).separator("__"))
    }

    /// Apply overrides from an environment source.
    ///
    /// A variable that is set but cannot be parsed is an error.
    fn apply_overrides(mut settings: Self, env: Environment) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(env)
            .build()
            .map_err(config_err)?;

        if let Some(val) = optional(config.get_string("header_position"))? {
            settings.header_position = val
                .parse()
                .map_err(|message| ApplicationError::Config { message })?;
        }
        if let Some(val) = optional(config.get_bool("transposed"))? {
            settings.transposed = val;
        }
        if let Some(val) = optional(config.get_string("format"))? {
            settings.format = val
                .parse()
                .map_err(|message| ApplicationError::Config { message })?;
        }
        if let Some(val) = optional(config.get_bool("pretty"))? {
            settings.pretty = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# pivot-groups configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/pivot-groups/pivot-groups.toml
#   Local:  <column file dir>/.pivot-groups.toml
#   Env:    PIVOT_GROUPS_* environment variables

# Where column attribute headers are placed: "top" or "left"
# header_position = "top"

# Measures laid out in rows
# transposed = false

# Output format: "json" (grid column definitions) or "tree"
# format = "json"

# Pretty-print JSON output
# pretty = true
"#
        .to_string()
    }
}

/// Missing keys are None; malformed values are errors.
fn optional<T>(value: Result<T, ConfigError>) -> Result<Option<T>, ApplicationError> {
    match value {
        Ok(v) => Ok(Some(v)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
