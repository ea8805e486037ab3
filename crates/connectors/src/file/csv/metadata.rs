use model::core::{data_type::DataType, value::Value};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct CsvColumnMetadata {
    pub name: String,
    pub data_type: DataType,
    pub ordinal: usize,
}

impl CsvColumnMetadata {
    /// Typed value of one raw cell. Empty cells are missing values whatever
    /// the column type.
    pub fn value(&self, cell: &str) -> Value {
        if cell.is_empty() {
            Value::Null
        } else {
            self.data_type.get_value(cell)
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CsvMetadata {
    pub name: String,
    pub columns: Vec<CsvColumnMetadata>,
    pub delimiter: char,
}

impl CsvMetadata {
    pub fn column(&self, name: &str) -> Option<&CsvColumnMetadata> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }
}

pub fn normalize_col_name(name: &str) -> String {
    name.trim()
        .replace(' ', "_")
        .replace('-', "_")
        .replace('.', "_")
        .to_lowercase()
}
