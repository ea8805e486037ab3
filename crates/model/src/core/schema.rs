use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Snapshot of the tables, columns and index names of an opened relational
/// corpus. Taken once when the corpus handle is opened.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct RelationalSchema {
    /// Table name to its columns, in declaration order.
    pub tables: BTreeMap<String, Vec<String>>,
    pub indexes: BTreeSet<String>,
}

impl RelationalSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, table: &str, columns: &[&str]) -> Self {
        self.tables.insert(
            table.to_string(),
            columns.iter().map(|c| c.to_string()).collect(),
        );
        self
    }

    pub fn with_index(mut self, index: &str) -> Self {
        self.indexes.insert(index.to_string());
        self
    }

    pub fn has_table(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }

    pub fn has_column(&self, table: &str, column: &str) -> bool {
        self.tables
            .get(table)
            .is_some_and(|cols| cols.iter().any(|c| c.eq_ignore_ascii_case(column)))
    }

    pub fn columns(&self, table: &str) -> &[String] {
        self.tables.get(table).map(|c| c.as_slice()).unwrap_or(&[])
    }

    pub fn has_index(&self, index: &str) -> bool {
        self.indexes.contains(index)
    }
}

#[cfg(test)]
mod tests {
    use super::RelationalSchema;

    #[test]
    fn test_column_lookup_is_case_insensitive() {
        let schema = RelationalSchema::new()
            .with_table("wordfreqs", &["lemma", "Form"])
            .with_index("idx_wordfreqs_form_freq");

        assert!(schema.has_column("wordfreqs", "form"));
        assert!(!schema.has_column("wordfreqs", "revform"));
        assert!(!schema.has_column("features", "featid"));
        assert!(schema.has_index("idx_wordfreqs_form_freq"));
        assert_eq!(schema.columns("missing").len(), 0);
    }
}
