use crate::file::csv::{adapter::CsvAdapter, error::FileError};
use csv::StringRecord;
use expression_engine::{EvalContext, Evaluator};
use model::{core::value::Value, execution::expr::Expr, records::table::ResultTable};
use tracing::debug;

/// A deferred scan over a delimited export.
///
/// Filters, ordering and the row cap are recorded and only applied when
/// [`LazyFrame::collect`] reads the file.
#[derive(Debug, Clone)]
pub struct LazyFrame<'a> {
    adapter: &'a CsvAdapter,
    filters: Vec<Expr>,
    sort: Option<(String, bool)>,
    limit: Option<usize>,
}

impl<'a> LazyFrame<'a> {
    pub fn new(adapter: &'a CsvAdapter) -> Self {
        Self {
            adapter,
            filters: Vec::new(),
            sort: None,
            limit: None,
        }
    }

    pub fn filter(mut self, expr: Expr) -> Self {
        self.filters.push(expr);
        self
    }

    pub fn sort(mut self, column: &str, ascending: bool) -> Self {
        self.sort = Some((column.to_string(), ascending));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn filters(&self) -> &[Expr] {
        &self.filters
    }

    /// Scans the file once and returns the matching rows.
    pub fn collect(self) -> Result<ResultTable, FileError> {
        let columns = self.adapter.columns();
        self.check_columns(&columns)?;

        let metadata = &self.adapter.metadata.columns;
        let mut reader = self.adapter.reader()?;
        let mut record = StringRecord::new();
        let mut rows = Vec::new();
        let mut scanned = 0usize;

        while reader.read_record(&mut record)? {
            scanned += 1;
            let row: Vec<Value> = metadata
                .iter()
                .map(|col| col.value(record.get(col.ordinal).unwrap_or("")))
                .collect();

            let ctx = EvalContext::new(&columns, &row);
            let mut keep = true;
            for expr in &self.filters {
                if !expr.matches(&ctx)? {
                    keep = false;
                    break;
                }
            }
            if keep {
                rows.push(row);
            }
        }

        debug!(
            "Scanned {} rows of {}, {} matched",
            scanned,
            self.adapter.path.display(),
            rows.len()
        );

        let mut table = ResultTable::new(columns, rows);
        if let Some((column, ascending)) = &self.sort {
            table.sort_by_column(column, *ascending);
        }
        if let Some(limit) = self.limit {
            table.truncate(limit);
        }
        Ok(table)
    }

    fn check_columns(&self, columns: &[String]) -> Result<(), FileError> {
        let sort_column = self.sort.as_ref().map(|(c, _)| c.as_str());
        let referenced = self
            .filters
            .iter()
            .flat_map(|f| f.columns())
            .chain(sort_column);
        for name in referenced {
            if !columns.iter().any(|c| c == name) {
                return Err(FileError::ColumnNotFound(name.to_string()));
            }
        }
        Ok(())
    }
}
