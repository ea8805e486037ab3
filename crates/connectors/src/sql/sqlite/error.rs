use lazy_static::lazy_static;
use thiserror::Error;

/// All errors coming from the SQLite layer.
#[derive(Debug, Error)]
pub enum DbError {
    /// Any SQL driver error.
    #[error("SQL error: {0}")]
    Sql(#[from] rusqlite::Error),

    /// The corpus database does not exist.
    #[error("Database not found: {0}")]
    NotFound(String),

    /// The database opened but lacks a table the corpus layout requires.
    #[error("Missing table: {0}")]
    MissingTable(String),
}

impl DbError {
    /// The driver message without engine and wrapper prefixes, suitable for
    /// showing to the person who wrote the query.
    pub fn user_message(&self) -> String {
        match self {
            DbError::Sql(err) => strip_engine_prefix(&err.to_string()),
            other => strip_engine_prefix(&other.to_string()),
        }
    }
}

lazy_static! {
    static ref ENGINE_PREFIXES: Vec<&'static str> = vec![
        "Database error: ",
        "SQL error: ",
        "sqlite3.OperationalError: ",
        "OperationalError: ",
        "SqliteFailure: ",
        "SQLite error: ",
    ];
}

/// Removes any number of leading engine prefixes from `message`.
pub fn strip_engine_prefix(message: &str) -> String {
    let mut rest = message.trim();
    loop {
        let stripped = ENGINE_PREFIXES
            .iter()
            .find_map(|prefix| rest.strip_prefix(prefix));
        match stripped {
            Some(next) => rest = next.trim_start(),
            None => return rest.to_string(),
        }
    }
}
