use expression_engine::ExpressionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FileError {
    #[error("File not found: {0}")]
    NotFound(String),
    #[error("Invalid file format: {0}")]
    InvalidFormat(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Column not found: {0}")]
    ColumnNotFound(String),
    #[error("Filter evaluation error: {0}")]
    Filter(#[from] ExpressionError),
}
