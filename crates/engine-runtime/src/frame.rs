use crate::{
    error::RuntimeError,
    outcome::{QueryOutcome, timed},
};
use connectors::file::csv::{adapter::CsvAdapter, settings::CsvSettings, totals::scan_totals};
use engine_config::{CorpusSettings, QuerySettings};
use engine_processing::{
    CompileError, FilterCompiler, FrameCompiler,
    transform::{AnchorColumns, RelativeColumns, TransformPipeline, TransformPipelineExt, top_per_form},
};
use model::core::totals::AggregateTotals;
use std::path::Path;
use tracing::{debug, info, warn};
use wql_syntax::FieldCatalog;

/// A handle on a flat corpus export.
///
/// The file is rescanned on every query; only the column metadata, the
/// catalog and the totals are kept.
#[derive(Debug)]
pub struct FrameCorpus {
    adapter: CsvAdapter,
    catalog: FieldCatalog,
    totals: AggregateTotals,
}

impl FrameCorpus {
    /// Opens an export and derives the corpus totals from it.
    pub fn open(path: impl AsRef<Path>, settings: CsvSettings) -> Result<Self, RuntimeError> {
        let adapter = CsvAdapter::open(path, settings)?;
        let totals = scan_totals(&adapter)?;
        Self::build(adapter, totals)
    }

    /// Opens an export with totals known from elsewhere, typically the
    /// relational corpus it was exported from.
    pub fn with_totals(
        path: impl AsRef<Path>,
        settings: CsvSettings,
        totals: AggregateTotals,
    ) -> Result<Self, RuntimeError> {
        Self::build(CsvAdapter::open(path, settings)?, totals)
    }

    pub fn from_settings(settings: &CorpusSettings) -> Result<Self, RuntimeError> {
        let delimiter = u8::try_from(settings.delimiter).map_err(|_| {
            RuntimeError::InvalidCorpus(format!("delimiter '{}' is not ASCII", settings.delimiter))
        })?;
        Self::open(settings.export_path()?, CsvSettings::new(delimiter))
    }

    fn build(adapter: CsvAdapter, totals: AggregateTotals) -> Result<Self, RuntimeError> {
        let columns = adapter.columns();
        if !columns.iter().any(|c| c == "form") {
            return Err(RuntimeError::InvalidCorpus(format!(
                "{} has no 'form' column",
                adapter.path.display()
            )));
        }

        let catalog = FieldCatalog::columnar(&columns);
        info!(
            "Opened export {} ({} columns, {} fields)",
            adapter.path.display(),
            columns.len(),
            catalog.len()
        );
        debug!("Export totals: {:?}", totals);

        Ok(Self {
            adapter,
            catalog,
            totals,
        })
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    pub fn totals(&self) -> &AggregateTotals {
        &self.totals
    }

    pub fn query(&self, input: &str, settings: &QuerySettings) -> QueryOutcome {
        timed("Frame query", input, || self.run_query(input, settings))
    }

    fn run_query(&self, input: &str, settings: &QuerySettings) -> QueryOutcome {
        let query = match wql_syntax::parse(input, &self.catalog, &self.totals) {
            Ok(query) => query,
            Err(errors) => return QueryOutcome::rejected(errors.to_string()),
        };
        let filter = match FrameCompiler::new(&self.catalog).compile(&query) {
            Ok(filter) => filter,
            Err(err) => return QueryOutcome::rejected(err.to_string()),
        };

        let order_by = FieldCatalog::resolve_alias(&settings.order_by);
        if !self.adapter.columns().contains(&order_by) {
            return QueryOutcome::rejected(
                CompileError::UnknownOrderColumn(settings.order_by.clone()).to_string(),
            );
        }

        let frame = filter
            .apply(self.adapter.lazy())
            .sort(&order_by, settings.ascending)
            .limit(settings.row_limit as usize);

        let mut table = match frame.collect() {
            Ok(table) => table,
            Err(err) => {
                warn!("Frame query failed: {}", err);
                return QueryOutcome::failed(err.to_string());
            }
        };

        if let Some(n) = query.top {
            top_per_form(&mut table, n as usize);
        }

        let totals = self.totals;
        let table = TransformPipeline::new()
            .add_transform(AnchorColumns)
            .add_if(settings.relative, || RelativeColumns::new(totals))
            .apply(table);
        QueryOutcome::ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::core::value::Value;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn export() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "lemma;form;pos;feats;frequency;len").unwrap();
        writeln!(file, "auto;auto;NOUN;Case=Nom;50;4").unwrap();
        writeln!(file, "auto#talli;autotalli;NOUN;Case=Nom;7;9").unwrap();
        writeln!(file, "talli;talli;NOUN;Case=Nom;5;5").unwrap();
        file
    }

    #[test]
    fn test_query_sorts_and_limits() {
        let file = export();
        let corpus = FrameCorpus::open(file.path(), CsvSettings::new(b';')).unwrap();
        assert_eq!(corpus.totals().frequency, 62.0);

        let settings = QuerySettings {
            row_limit: 2,
            ascending: true,
            relative: true,
            ..Default::default()
        };
        let outcome = corpus.query("len >= 4", &settings);
        assert!(outcome.is_ok(), "{}", outcome.message);
        let forms: Vec<_> = outcome.table.column_values("form").unwrap();
        assert_eq!(forms, vec![&Value::from("talli"), &Value::from("autotalli")]);
        assert!(outcome.table.has_column("relfrequency"));
    }

    #[test]
    fn test_rejections() {
        let file = export();
        let corpus = FrameCorpus::open(file.path(), CsvSettings::new(b';')).unwrap();

        assert_eq!(
            corpus.query("", &QuerySettings::default()).message,
            "No valid query string"
        );
        let outcome = corpus.query(
            "len > 1",
            &QuerySettings {
                order_by: "lemmafreq".into(),
                ..Default::default()
            },
        );
        assert_eq!(outcome.code(), -1);
        assert_eq!(outcome.message, "Cannot order by 'lemmafreq'");
    }
}
