//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("column file not found: {0}")]
    InputNotFound(PathBuf),

    #[error("invalid column file {path}: {message}")]
    InvalidInput { path: PathBuf, message: String },

    #[error("unknown column group: {0}")]
    UnknownGroup(String),

    #[error("config error: {message}")]
    Config { message: String },

    #[error("cannot read column file {}", .path.display())]
    ColumnFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {}", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialize column definitions")]
    Serialize(#[source] serde_json::Error),
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
