use crate::{file::csv::error::FileError, sql::sqlite::error::DbError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdapterError {
    /// File-related error.
    #[error("File error: {0}")]
    FileError(#[from] FileError),

    /// Database-related error.
    #[error("Database error: {0}")]
    Database(#[from] DbError),
}
