use crate::sql::sqlite::{error::DbError, row::from_sql};
use model::core::{
    schema::RelationalSchema,
    totals::{AggregateTotals, TotalKind},
    value::Value,
};
use rusqlite::Connection;
use std::collections::HashMap;
use tracing::{debug, warn};
use wql_syntax::TableId;

const METADATA_TABLE: &str = "metadata";

/// Table and column whose sum is the total of `kind` when the metadata table
/// does not record it.
fn owner(kind: TotalKind) -> (TableId, &'static str) {
    match kind {
        TotalKind::Frequency => (TableId::Facts, "frequency"),
        TotalKind::LemmaFrequency => (TableId::Lemmas, "lemmafreq"),
        TotalKind::InitGram => (TableId::InitGrams, "frequency"),
        TotalKind::FinGram => (TableId::FinGrams, "frequency"),
        TotalKind::Bigram => (TableId::Bigrams, "frequency"),
    }
}

/// Loads the corpus-wide sums. Recorded metadata wins, anything missing is
/// summed from its owning table, and a total whose table is absent is zero.
pub fn load_totals(conn: &Connection, schema: &RelationalSchema) -> Result<AggregateTotals, DbError> {
    let recorded = if schema.has_table(METADATA_TABLE) {
        read_metadata(conn)?
    } else {
        HashMap::new()
    };

    let mut totals = AggregateTotals::default();
    for kind in TotalKind::ALL {
        let value = match recorded.get(kind.key()) {
            Some(v) => *v,
            None => sum_owner(conn, schema, kind)?,
        };
        totals.set(kind, value);
    }

    debug!("Loaded totals: {:?}", totals);
    Ok(totals)
}

fn read_metadata(conn: &Connection) -> Result<HashMap<String, f64>, DbError> {
    let mut stmt = conn.prepare("SELECT key, value FROM metadata")?;
    let pairs = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, from_sql(row.get_ref(1)?))))?
        .collect::<Result<Vec<_>, _>>()?;

    let mut out = HashMap::new();
    for (key, value) in pairs {
        let number = match &value {
            Value::String(s) => s.trim().parse::<f64>().ok(),
            other => other.as_f64(),
        };
        match number {
            Some(n) => {
                out.insert(key, n);
            }
            None => warn!("Ignoring non-numeric metadata value for '{}': {}", key, value),
        }
    }
    Ok(out)
}

fn sum_owner(conn: &Connection, schema: &RelationalSchema, kind: TotalKind) -> Result<f64, DbError> {
    let (table, column) = owner(kind);
    let name = table.table_name();
    if !schema.has_column(name, column) {
        debug!("No {} total: table '{}' has no column '{}'", kind, name, column);
        return Ok(0.0);
    }

    let sql = format!("SELECT TOTAL({column}) FROM {name}");
    let total: f64 = conn.query_row(&sql, [], |row| row.get(0))?;
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::sqlite::probe::probe_schema;

    #[test]
    fn test_metadata_wins_and_missing_totals_are_summed() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE wordfreqs(form TEXT, frequency INTEGER);
             INSERT INTO wordfreqs VALUES ('auto', 40), ('talli', 60);
             CREATE TABLE lemmas(lemma TEXT, lemmafreq INTEGER);
             INSERT INTO lemmas VALUES ('auto', 7);
             CREATE TABLE metadata(key TEXT, value TEXT);
             INSERT INTO metadata VALUES ('lemmafreq', '1000');",
        )
        .unwrap();

        let schema = probe_schema(&conn).unwrap();
        let totals = load_totals(&conn, &schema).unwrap();
        assert_eq!(totals.frequency, 100.0);
        assert_eq!(totals.lemma_frequency, 1000.0);
        assert_eq!(totals.bigram, 0.0);
    }
}
