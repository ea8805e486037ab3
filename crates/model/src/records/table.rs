use crate::core::value::Value;
use serde::Serialize;
use std::cmp::Ordering;

/// A materialized query result: named columns and positional rows.
///
/// Every row holds exactly one value per column. Column names are unique
/// within a table.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ResultTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl ResultTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_columns(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }

    /// All values of one column, top to bottom.
    pub fn column_values(&self, column: &str) -> Option<Vec<&Value>> {
        let idx = self.column_index(column)?;
        Some(self.rows.iter().filter_map(|r| r.get(idx)).collect())
    }

    /// Stable sort on one column. Nulls and values that do not compare sort
    /// last regardless of direction.
    pub fn sort_by_column(&mut self, column: &str, ascending: bool) -> bool {
        let Some(idx) = self.column_index(column) else {
            return false;
        };
        self.rows.sort_by(|a, b| {
            let (a, b) = (&a[idx], &b[idx]);
            match (a.is_null(), b.is_null()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => {
                    let ord = a.compare(b).unwrap_or(Ordering::Equal);
                    if ascending { ord } else { ord.reverse() }
                }
            }
        });
        true
    }

    pub fn truncate(&mut self, len: usize) {
        self.rows.truncate(len);
    }

    /// Keeps the rows whose position satisfies `keep`.
    pub fn retain_positions(&mut self, keep: impl Fn(usize) -> bool) {
        let mut pos = 0;
        self.rows.retain(|_| {
            let kept = keep(pos);
            pos += 1;
            kept
        });
    }

    /// Reorders the columns to `order`. Names in `order` that the table does
    /// not have are ignored; columns missing from `order` keep their relative
    /// order after the listed ones.
    pub fn reorder_columns(&mut self, order: &[String]) {
        let mut indices: Vec<usize> = order
            .iter()
            .filter_map(|name| self.column_index(name))
            .collect();
        for idx in 0..self.columns.len() {
            if !indices.contains(&idx) {
                indices.push(idx);
            }
        }

        self.columns = indices.iter().map(|&i| self.columns[i].clone()).collect();
        for row in self.rows.iter_mut() {
            let old = std::mem::take(row);
            *row = indices.iter().map(|&i| old[i].clone()).collect();
        }
    }

    /// Inserts a column at `position` (clamped to the column count). `values`
    /// must have one entry per row.
    pub fn insert_column(&mut self, position: usize, name: &str, values: Vec<Value>) {
        let position = position.min(self.columns.len());
        self.columns.insert(position, name.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.insert(position, value);
        }
    }

    pub fn to_json_records(&self) -> serde_json::Value {
        let records = self
            .rows
            .iter()
            .map(|row| {
                let obj = self
                    .columns
                    .iter()
                    .zip(row)
                    .map(|(c, v)| (c.clone(), v.to_json()))
                    .collect::<serde_json::Map<_, _>>();
                serde_json::Value::Object(obj)
            })
            .collect();
        serde_json::Value::Array(records)
    }
}

#[cfg(test)]
mod tests {
    use super::ResultTable;
    use crate::core::value::Value;

    fn table() -> ResultTable {
        ResultTable::new(
            vec!["form".into(), "frequency".into(), "lemma".into()],
            vec![
                vec!["talli".into(), Value::Int(5), "talli".into()],
                vec!["auto".into(), Value::Int(50), "auto".into()],
                vec!["autossa".into(), Value::Null, "auto".into()],
                vec!["tallissa".into(), Value::Int(5), "talli".into()],
            ],
        )
    }

    #[test]
    fn test_sort_is_stable_and_puts_nulls_last() {
        let mut t = table();
        assert!(t.sort_by_column("frequency", false));
        let forms: Vec<_> = t.column_values("form").unwrap();
        assert_eq!(
            forms,
            vec![
                &Value::from("auto"),
                &Value::from("talli"),
                &Value::from("tallissa"),
                &Value::from("autossa")
            ]
        );
        assert!(!t.sort_by_column("nope", true));
    }

    #[test]
    fn test_reorder_and_insert_columns() {
        let mut t = table();
        t.reorder_columns(&["lemma".to_string(), "missing".to_string()]);
        assert_eq!(t.columns, vec!["lemma", "form", "frequency"]);
        assert_eq!(t.rows[1][0], Value::from("auto"));

        t.insert_column(3, "relfrequency", vec![Value::Float(0.5); 4]);
        assert_eq!(t.columns.last().map(String::as_str), Some("relfrequency"));
        assert_eq!(t.rows[0].len(), 4);
    }

    #[test]
    fn test_json_records() {
        let t = table();
        let json = t.to_json_records();
        assert_eq!(json[1]["form"], "auto");
        assert_eq!(json[2]["frequency"], serde_json::Value::Null);
    }
}
