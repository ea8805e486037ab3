use connectors::{file::csv::error::FileError, sql::sqlite::error::DbError};
use engine_config::SettingsError;
use thiserror::Error;

/// Errors raised while opening a corpus handle. Query-time failures are
/// reported through [`crate::QueryOutcome`] instead.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("File error: {0}")]
    File(#[from] FileError),

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("Invalid corpus: {0}")]
    InvalidCorpus(String),
}
