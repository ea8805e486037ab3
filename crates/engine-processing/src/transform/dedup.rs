use super::pipeline::Transform;
use model::{core::value::Value, records::table::ResultTable};
use std::collections::HashSet;
use tracing::debug;

/// Columns identifying one corpus row.
pub const ROW_KEY: [&str; 4] = ["lemma", "form", "pos", "feats"];

/// Drops rows whose key repeats, keeping the last occurrence. Survivors keep
/// their relative order. Key columns missing from the table are ignored.
pub struct DedupLast {
    keys: Vec<String>,
}

impl DedupLast {
    pub fn new(keys: &[&str]) -> Self {
        Self {
            keys: keys.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl Default for DedupLast {
    fn default() -> Self {
        Self::new(&ROW_KEY)
    }
}

impl Transform for DedupLast {
    fn apply(&self, mut table: ResultTable) -> ResultTable {
        let indices: Vec<usize> = self
            .keys
            .iter()
            .filter_map(|k| table.column_index(k))
            .collect();
        if indices.is_empty() {
            return table;
        }

        let mut seen: HashSet<Vec<Value>> = HashSet::new();
        let mut keep = vec![false; table.len()];
        for (pos, row) in table.rows.iter().enumerate().rev() {
            let key: Vec<Value> = indices.iter().map(|&i| row[i].clone()).collect();
            keep[pos] = seen.insert(key);
        }

        let before = table.len();
        table.retain_positions(|pos| keep[pos]);
        if table.len() < before {
            debug!("Dropped {} duplicate rows", before - table.len());
        }
        table
    }
}

/// Keeps at most `limit` rows.
pub struct RowCap(pub usize);

impl Transform for RowCap {
    fn apply(&self, mut table: ResultTable) -> ResultTable {
        table.truncate(self.0);
        table
    }
}
