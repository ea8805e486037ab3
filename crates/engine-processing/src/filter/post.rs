use crate::{
    error::CompileError,
    filter::frame::{CompiledFrameFilter, FrameCompiler},
    transform::top_per_form,
};
use expression_engine::{EvalContext, ExpressionError};
use model::records::table::ResultTable;
use tracing::debug;
use wql_syntax::{FieldCatalog, Query};

/// Re-applies a parsed query to rows that are already in memory.
#[derive(Debug, Clone)]
pub struct PostMaterializationFilter {
    filter: CompiledFrameFilter,
    top: Option<u32>,
}

impl PostMaterializationFilter {
    /// `catalog` must describe the columns of the tables this filter will see.
    /// An empty query keeps every row.
    pub fn new(query: &Query, catalog: &FieldCatalog) -> Result<Self, CompileError> {
        let filter = FrameCompiler::new(catalog).compile_steps(query)?;
        Ok(Self {
            filter,
            top: query.top,
        })
    }

    pub fn apply(&self, mut table: ResultTable) -> Result<ResultTable, ExpressionError> {
        if !self.filter.is_empty() {
            let mut keep = Vec::with_capacity(table.len());
            for row in &table.rows {
                let ctx = EvalContext::new(&table.columns, row);
                keep.push(self.filter.matches(&ctx)?);
            }
            table.retain_positions(|pos| keep[pos]);
        }

        if let Some(n) = self.top {
            debug!("Keeping top {} rows per form", n);
            top_per_form(&mut table, n as usize);
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::core::{totals::AggregateTotals, value::Value};

    fn table() -> ResultTable {
        ResultTable::new(
            vec!["lemma".into(), "form".into(), "pos".into(), "frequency".into()],
            vec![
                vec!["olla".into(), "on".into(), "AUX".into(), Value::Int(40)],
                vec!["auto".into(), "auto".into(), "NOUN".into(), Value::Int(50)],
                vec!["olla".into(), "on".into(), "VERB".into(), Value::Int(90)],
                vec!["auto#talli".into(), "autotalli".into(), "NOUN".into(), Value::Int(7)],
            ],
        )
    }

    fn filter(input: &str) -> PostMaterializationFilter {
        let table = table();
        let catalog = FieldCatalog::columnar(&table.columns);
        let query = wql_syntax::parse(input, &catalog, &AggregateTotals::default()).unwrap();
        PostMaterializationFilter::new(&query, &catalog).unwrap()
    }

    #[test]
    fn test_filters_then_caps_per_form() {
        let result = filter("frequency > 10 and top 1").apply(table()).unwrap();
        let pos: Vec<_> = result.column_values("pos").unwrap();
        assert_eq!(pos, vec![&Value::from("NOUN"), &Value::from("VERB")]);
    }

    #[test]
    fn test_compound_on_materialized_rows() {
        let result = filter("compound").apply(table()).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.value(0, "form"), Some(&Value::from("autotalli")));

        let result = filter("not compound").apply(table()).unwrap();
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_empty_query_keeps_rows() {
        let catalog = FieldCatalog::columnar(&table().columns);
        let post = PostMaterializationFilter::new(&Query::default(), &catalog).unwrap();
        assert_eq!(post.apply(table()).unwrap(), table());
    }
}
