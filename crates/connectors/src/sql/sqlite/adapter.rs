use crate::sql::sqlite::{
    error::DbError,
    row::{from_sql, to_sql},
};
use model::{core::value::Value, records::table::ResultTable};
use rusqlite::{Connection, OpenFlags, params_from_iter};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Handle to a corpus database file.
///
/// Holds no connection: every call opens a fresh read-only connection, so
/// the adapter can be shared between threads freely.
#[derive(Debug, Clone)]
pub struct SqliteAdapter {
    path: PathBuf,
}

impl SqliteAdapter {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DbError> {
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            return Err(DbError::NotFound(path.display().to_string()));
        }
        let adapter = Self { path };
        // Fail early on files that are not databases.
        adapter.connect()?.query_row("SELECT count(*) FROM sqlite_master", [], |_| Ok(()))?;
        Ok(adapter)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn connect(&self) -> Result<Connection, DbError> {
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(conn)
    }

    /// Runs one statement and materializes every row.
    pub fn fetch(&self, sql: &str, params: &[Value]) -> Result<ResultTable, DbError> {
        let conn = self.connect()?;
        fetch_with(&conn, sql, params)
    }
}

pub fn fetch_with(conn: &Connection, sql: &str, params: &[Value]) -> Result<ResultTable, DbError> {
    debug!("Executing SQL: {} with params: {:?}", sql, params);

    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
    let num_cols = columns.len();

    let rows = stmt
        .query_map(params_from_iter(params.iter().map(to_sql)), |r| {
            (0..num_cols)
                .map(|idx| Ok(from_sql(r.get_ref(idx)?)))
                .collect::<Result<Vec<_>, rusqlite::Error>>()
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ResultTable::new(columns, rows))
}
