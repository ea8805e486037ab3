use thiserror::Error;

/// Raised when a parsed query cannot be turned into an executable filter.
///
/// Apart from `EmptyQuery` these indicate a catalog that disagrees with the
/// corpus it was built from.
#[derive(Debug, Error, PartialEq)]
pub enum CompileError {
    #[error("No valid query string")]
    EmptyQuery,

    #[error("Field '{0}' is not in the catalog")]
    UnknownField(String),

    #[error("Field '{0}' has no backing table")]
    NoBackingTable(String),

    #[error("Table '{0}' is not in the corpus")]
    MissingTable(String),

    #[error("Cannot order by '{0}'")]
    UnknownOrderColumn(String),

    #[error("Operator '{operator}' not supported for '{field}'")]
    UnsupportedOperator { field: String, operator: String },

    #[error("Predicate on '{0}' has no value")]
    MissingValue(String),
}
