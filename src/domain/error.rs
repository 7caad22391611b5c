//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the column grouping rules.
/// These are independent of I/O and configuration concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("column '{col_id}' has an empty header path")]
    EmptyPath { col_id: String },

    #[error("column '{col_id}' conflicts with column group '{group_id}'")]
    PathConflict { group_id: String, col_id: String },

    #[error("cannot derive header path for column '{col_id}': {message}")]
    PathDerivation { col_id: String, message: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
