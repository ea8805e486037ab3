use crate::sql::sqlite::error::DbError;
use model::core::schema::RelationalSchema;
use rusqlite::Connection;
use tracing::debug;

/// Reads table, column and index names of an open corpus database.
pub fn probe_schema(conn: &Connection) -> Result<RelationalSchema, DbError> {
    let mut schema = RelationalSchema::new();

    let mut stmt = conn.prepare(
        "SELECT type, name FROM sqlite_master WHERE type IN ('table', 'view', 'index') AND name NOT LIKE 'sqlite_%'",
    )?;
    let entries = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;

    for (kind, name) in entries {
        if kind == "index" {
            schema.indexes.insert(name);
            continue;
        }
        let columns = table_columns(conn, &name)?;
        schema.tables.insert(name, columns);
    }

    debug!(
        "Probed schema: {} tables, {} indexes",
        schema.tables.len(),
        schema.indexes.len()
    );
    Ok(schema)
}

fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>, DbError> {
    let pragma = format!("PRAGMA table_info(\"{}\")", table.replace('"', "\"\""));
    let mut stmt = conn.prepare(&pragma)?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_collects_tables_columns_and_indexes() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE wordfreqs(lemma TEXT, form TEXT, frequency INTEGER);
             CREATE INDEX idx_wordfreqs_form_freq ON wordfreqs(form, frequency);
             CREATE TABLE metadata(key TEXT, value TEXT);",
        )
        .unwrap();

        let schema = probe_schema(&conn).unwrap();
        assert_eq!(schema.columns("wordfreqs"), ["lemma", "form", "frequency"]);
        assert!(schema.has_table("metadata"));
        assert!(schema.has_index("idx_wordfreqs_form_freq"));
        assert!(!schema.has_table("idx_wordfreqs_form_freq"));
    }
}
