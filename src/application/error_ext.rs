//! Attaches the column file or output path to I/O failures.

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// Names which file an `io::Result` was touching.
pub trait IoPathExt<T> {
    fn reading_columns(self, path: &Path) -> ApplicationResult<T>;
    fn writing_output(self, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoPathExt<T> for io::Result<T> {
    fn reading_columns(self, path: &Path) -> ApplicationResult<T> {
        self.map_err(|source| ApplicationError::ColumnFileRead {
            path: path.to_path_buf(),
            source,
        })
    }

    fn writing_output(self, path: &Path) -> ApplicationResult<T> {
        self.map_err(|source| ApplicationError::OutputWrite {
            path: path.to_path_buf(),
            source,
        })
    }
}
