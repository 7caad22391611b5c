//! Infrastructure-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;

#[derive(Error, Debug)]
pub enum InfraError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    /// Rendered output could not be written, typically a closed pipe.
    #[error("cannot write to stdout")]
    Stdout(#[source] std::io::Error),
}
