use crate::{
    error::RuntimeError,
    outcome::{QueryOutcome, timed},
};
use connectors::sql::sqlite::{
    adapter::SqliteAdapter, error::DbError, probe::probe_schema, totals::load_totals,
};
use engine_config::{CorpusSettings, QuerySettings};
use engine_processing::{
    CompiledSql, FilterCompiler, PostMaterializationFilter, RelationalCompiler,
    transform::{
        AnchorColumns, DedupLast, RelativeColumns, RowCap, TransformPipeline,
        TransformPipelineExt, top_per_form,
    },
};
use model::{
    core::{schema::RelationalSchema, totals::AggregateTotals},
    records::table::ResultTable,
};
use std::path::Path;
use tracing::{debug, info, warn};
use wql_syntax::{FieldCatalog, TableId};

/// A read-only handle on a relational corpus.
///
/// Schema, catalog and totals are read once at open time. Every query opens
/// its own connection, so one handle can serve several threads.
#[derive(Debug)]
pub struct Corpus {
    adapter: SqliteAdapter,
    schema: RelationalSchema,
    catalog: FieldCatalog,
    totals: AggregateTotals,
}

impl Corpus {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RuntimeError> {
        let adapter = SqliteAdapter::open(path)?;
        let conn = adapter.connect()?;

        let schema = probe_schema(&conn)?;
        let facts = TableId::Facts.table_name();
        if !schema.has_table(facts) {
            return Err(DbError::MissingTable(facts.to_string()).into());
        }

        let catalog = FieldCatalog::relational(&schema);
        let totals = load_totals(&conn, &schema)?;
        info!(
            "Opened corpus {} ({} fields, {} tables)",
            adapter.path().display(),
            catalog.len(),
            schema.tables.len()
        );
        debug!("Corpus totals: {:?}", totals);

        Ok(Self {
            adapter,
            schema,
            catalog,
            totals,
        })
    }

    /// Opens the database named by the corpus settings.
    pub fn from_settings(settings: &CorpusSettings) -> Result<Self, RuntimeError> {
        Self::open(settings.database_path()?)
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    pub fn schema(&self) -> &RelationalSchema {
        &self.schema
    }

    pub fn totals(&self) -> &AggregateTotals {
        &self.totals
    }

    /// Parses, compiles and runs one query string.
    pub fn query(&self, input: &str, settings: &QuerySettings) -> QueryOutcome {
        timed("Query", input, || self.run_query(input, settings))
    }

    /// Fetches every row whose form is in `words`, then narrows them with
    /// `filter`, which may also cap the rows per form with `top`.
    pub fn query_words(
        &self,
        words: &[String],
        filter: &str,
        settings: &QuerySettings,
    ) -> QueryOutcome {
        timed("Word list query", filter, || {
            self.run_words(words, filter, settings)
        })
    }

    fn run_query(&self, input: &str, settings: &QuerySettings) -> QueryOutcome {
        let query = match wql_syntax::parse(input, &self.catalog, &self.totals) {
            Ok(query) => query,
            Err(errors) => return QueryOutcome::rejected(errors.to_string()),
        };

        let compiler = RelationalCompiler::new(&self.catalog, &self.schema, settings);
        let compiled = match compiler.compile(&query) {
            Ok(compiled) => compiled,
            Err(err) => return QueryOutcome::rejected(err.to_string()),
        };

        match self.execute(&compiled, settings) {
            Ok(mut table) => {
                if let Some(n) = query.top {
                    top_per_form(&mut table, n as usize);
                }
                QueryOutcome::ok(table)
            }
            Err(outcome) => outcome,
        }
    }

    fn run_words(&self, words: &[String], filter: &str, settings: &QuerySettings) -> QueryOutcome {
        let compiler = RelationalCompiler::new(&self.catalog, &self.schema, settings);
        let compiled = match compiler.compile_words(words) {
            Ok(compiled) => compiled,
            Err(err) => return QueryOutcome::rejected(err.to_string()),
        };

        let table = match self.execute(&compiled, settings) {
            Ok(table) => table,
            Err(outcome) => return outcome,
        };

        let catalog = FieldCatalog::columnar(&table.columns);
        let post = match wql_syntax::parse(filter, &catalog, &self.totals) {
            Ok(query) => match PostMaterializationFilter::new(&query, &catalog) {
                Ok(post) => post,
                Err(err) => return QueryOutcome::rejected(err.to_string()),
            },
            Err(errors) => return QueryOutcome::rejected(errors.to_string()),
        };

        match post.apply(table) {
            Ok(table) => QueryOutcome::ok(table),
            Err(err) => {
                warn!("Word list filter failed: {}", err);
                QueryOutcome::failed(err.to_string())
            }
        }
    }

    /// Runs a compiled statement and post-processes its rows. A driver failure
    /// comes back as a finished outcome.
    fn execute(
        &self,
        compiled: &CompiledSql,
        settings: &QuerySettings,
    ) -> Result<ResultTable, QueryOutcome> {
        let table = self.adapter.fetch(&compiled.sql, &compiled.args).map_err(|err| {
            let message = err.user_message();
            warn!("Query execution failed: {}", message);
            QueryOutcome::failed(message)
        })?;
        debug!("Fetched {} rows", table.len());

        Ok(self.pipeline(compiled, settings).apply(table))
    }

    fn pipeline(&self, compiled: &CompiledSql, settings: &QuerySettings) -> TransformPipeline {
        let totals = self.totals;
        TransformPipeline::new()
            .add_if(compiled.posx, DedupLast::default)
            .add_if(compiled.posx, || RowCap(settings.row_limit as usize))
            .add_transform(AnchorColumns)
            .add_if(settings.relative, || RelativeColumns::new(totals))
    }
}
