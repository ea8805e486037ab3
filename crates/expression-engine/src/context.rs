use model::core::value::Value;
use std::collections::HashMap;

/// Read access to the cells of one row by column name.
pub trait RowView {
    fn get(&self, column: &str) -> Option<&Value>;
}

/// One row of a positional table, addressed through its column names.
pub struct EvalContext<'a> {
    columns: &'a [String],
    values: &'a [Value],
}

impl<'a> EvalContext<'a> {
    pub fn new(columns: &'a [String], values: &'a [Value]) -> Self {
        Self { columns, values }
    }
}

impl RowView for EvalContext<'_> {
    fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|idx| self.values.get(idx))
    }
}

impl RowView for HashMap<String, Value> {
    fn get(&self, column: &str) -> Option<&Value> {
        HashMap::get(self, column)
    }
}
