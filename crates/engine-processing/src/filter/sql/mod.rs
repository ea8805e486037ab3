use crate::{error::CompileError, filter::compiler::FilterCompiler};
use engine_config::QuerySettings;
use index::{INDEX_PRIORITY, IndexUsage};
use model::core::{schema::RelationalSchema, value::Value};
use planner::{
    query::{
        aliased_ident, and_all,
        ast::{
            common::{JoinKind, OrderDir},
            expr::{BinaryOperator, Expr},
            select::{JoinClause, Select, SelectItem},
        },
        binary,
        builder::select::{SelectBuilder, select_item},
        dialect::Sqlite,
        or_all,
        renderer::{
            Renderer, render_to_sql,
            select::{render_from, render_order_by},
        },
        value,
    },
    table_ref,
};
use std::collections::BTreeSet;
use tracing::debug;
use wql_syntax::{FieldCatalog, FieldDescriptor, FieldKind, Operator, Predicate, Query, TableId};

pub mod glob;
pub mod index;

/// Facts columns that never appear in the output.
const HIDDEN_FACT_COLUMNS: [&str; 5] = ["featid", "revform", "lemmac", "posx", "frequencyx"];

/// Features table columns that duplicate facts columns.
const FEATURE_KEYS: [&str; 3] = ["featid", "feats", "pos"];

const LEMMA_AGGREGATES: [&str; 4] = ["lemmafreq", "lemmalen", "amblemma", "comparts"];

const GRAM_OUTPUTS: [(TableId, &str); 3] = [
    (TableId::InitGrams, "initgramfreq"),
    (TableId::FinGrams, "fingramfreq"),
    (TableId::Bigrams, "bigramfreq"),
];

/// A relational statement ready to run. The rendered parts are kept next to
/// the full statement for logging and inspection.
#[derive(Debug, Clone)]
pub struct CompiledSql {
    pub select: Select,
    pub sql: String,
    pub args: Vec<Value>,
    pub where_clause: String,
    pub from_clause: String,
    pub index_hint: Option<String>,
    pub order_by: String,
    pub limit: u64,
    pub distinct: bool,
    /// Fetched rows still need deduplication and the row cap.
    pub posx: bool,
}

/// Tables, conditions and hints collected while compiling predicates.
#[derive(Debug, Default)]
struct Assembly {
    tables: BTreeSet<TableId>,
    satellites: Vec<(TableId, String)>,
    conditions: Vec<Expr>,
    distinct: bool,
    index: IndexUsage,
}

impl Assembly {
    fn require(&mut self, table: TableId) {
        if table != TableId::Facts {
            self.tables.insert(table);
        }
    }

    /// A fresh alias for one more join of `table`: `d`, `d2`, `d3`...
    fn satellite_alias(&mut self, table: TableId) -> String {
        let seen = self.satellites.iter().filter(|(t, _)| *t == table).count();
        let alias = match seen {
            0 => table.alias().to_string(),
            n => format!("{}{}", table.alias(), n + 1),
        };
        self.satellites.push((table, alias.clone()));
        alias
    }
}

/// Compiles queries into parameterized SQLite statements over the corpus
/// table layout.
pub struct RelationalCompiler<'a> {
    catalog: &'a FieldCatalog,
    schema: &'a RelationalSchema,
    settings: &'a QuerySettings,
}

impl FilterCompiler for RelationalCompiler<'_> {
    type Filter = CompiledSql;

    fn compile(&self, query: &Query) -> Result<CompiledSql, CompileError> {
        if query.is_empty() {
            return Err(CompileError::EmptyQuery);
        }

        let mut asm = Assembly::default();
        for predicate in &query.predicates {
            let condition = self.compile_predicate(predicate, &mut asm)?;
            asm.conditions.push(condition);
        }
        self.assemble(asm)
    }
}

impl<'a> RelationalCompiler<'a> {
    pub fn new(
        catalog: &'a FieldCatalog,
        schema: &'a RelationalSchema,
        settings: &'a QuerySettings,
    ) -> Self {
        Self {
            catalog,
            schema,
            settings,
        }
    }

    /// Part-of-speech aware mode is on only when the corpus carries the
    /// `posx` and `frequencyx` columns.
    pub fn posx(&self) -> bool {
        let facts = TableId::Facts.table_name();
        self.settings.posx
            && self.schema.has_column(facts, "posx")
            && self.schema.has_column(facts, "frequencyx")
    }

    /// Every row whose form is one of `words`.
    pub fn compile_words(&self, words: &[String]) -> Result<CompiledSql, CompileError> {
        if words.is_empty() {
            return Err(CompileError::EmptyQuery);
        }

        let mut asm = Assembly::default();
        asm.index.touch("form");
        asm.conditions.push(Expr::InList {
            expr: Box::new(aliased_ident(TableId::Facts.alias(), "form")),
            list: words.iter().map(|w| value(Value::from(w.as_str()))).collect(),
            negated: false,
        });
        self.assemble(asm)
    }

    fn compile_predicate(&self, p: &Predicate, asm: &mut Assembly) -> Result<Expr, CompileError> {
        let descriptor = self
            .catalog
            .get(&p.field)
            .ok_or_else(|| CompileError::UnknownField(p.field.clone()))?;
        let table = descriptor
            .backing_table
            .ok_or_else(|| CompileError::NoBackingTable(p.field.clone()))?;
        if !self.schema.has_table(table.table_name()) {
            return Err(CompileError::MissingTable(table.table_name().to_string()));
        }

        if p.is_unanchored_like() {
            asm.index.unanchored();
        }

        if p.operator.is_positional() {
            return self.positional(p, asm);
        }

        // Satellites hold only real values, one row per value.
        if let Some(satellite) = descriptor.satellite {
            let positive = !p.negate && matches!(p.operator, Operator::Equal | Operator::In);
            if positive && !p.value.has_placeholder() {
                return self.satellite(p, descriptor, satellite, asm);
            }
        }

        asm.require(table);
        let column = self.column_expr(descriptor, table);
        let values = p.value.values();

        let expr = match p.operator {
            Operator::In => Expr::InList {
                expr: Box::new(column),
                list: values.into_iter().map(value).collect(),
                negated: false,
            },
            op => {
                let sql_op = comparison(op).ok_or_else(|| CompileError::UnsupportedOperator {
                    field: p.field.clone(),
                    operator: op.to_string(),
                })?;
                let operand = values
                    .into_iter()
                    .next()
                    .ok_or_else(|| CompileError::MissingValue(p.field.clone()))?;
                binary(column, sql_op, value(operand))
            }
        };

        let anchored = p.operator != Operator::Like || !p.is_unanchored_like();
        if table == TableId::Facts && descriptor.strip.is_none() && !p.negate && anchored {
            asm.index.touch(&descriptor.backing_column);
        }

        Ok(if p.negate { expr.negate() } else { expr })
    }

    /// `start`, `middle` and `end` over the word form. Sets are ORed.
    fn positional(&self, p: &Predicate, asm: &mut Assembly) -> Result<Expr, CompileError> {
        let has_revform = self.schema.has_column(TableId::Facts.table_name(), "revform");
        let form = || aliased_ident(TableId::Facts.alias(), "form");
        let glob_on = |column: Expr, pattern: String| {
            binary(column, BinaryOperator::Glob, value(Value::String(pattern)))
        };
        let starts = |text: &str| glob_on(form(), glob::prefix(text));
        let ends = |text: &str| {
            if has_revform {
                let revform = aliased_ident(TableId::Facts.alias(), "revform");
                glob_on(revform, glob::prefix(&glob::reversed(text)))
            } else {
                glob_on(form(), glob::suffix(text))
            }
        };

        let parts: Vec<Expr> = p
            .value
            .texts()
            .iter()
            .map(|text| match p.operator {
                Operator::StartsWith => starts(text),
                Operator::EndsWith => ends(text),
                _ => {
                    let contains = glob_on(form(), glob::infix(text));
                    let inner = binary(contains, BinaryOperator::And, starts(text).negate());
                    binary(inner, BinaryOperator::And, ends(text).negate())
                }
            })
            .collect();

        match p.operator {
            Operator::StartsWith if !p.negate => asm.index.touch("form"),
            Operator::EndsWith if !p.negate && has_revform => asm.index.touch("revform"),
            Operator::Middle => asm.index.unanchored(),
            _ => {}
        }

        let expr = or_all(parts).ok_or_else(|| CompileError::MissingValue(p.field.clone()))?;
        Ok(if p.negate { expr.negate() } else { expr })
    }

    fn satellite(
        &self,
        p: &Predicate,
        descriptor: &FieldDescriptor,
        satellite: TableId,
        asm: &mut Assembly,
    ) -> Result<Expr, CompileError> {
        let alias = asm.satellite_alias(satellite);
        let column = aliased_ident(&alias, &descriptor.backing_column);
        let mut values = p.value.values();

        // One facts row matches several satellite rows.
        if values.len() > 1 {
            asm.distinct = true;
            return Ok(Expr::InList {
                expr: Box::new(column),
                list: values.into_iter().map(value).collect(),
                negated: false,
            });
        }

        let operand = values
            .pop()
            .ok_or_else(|| CompileError::MissingValue(p.field.clone()))?;
        Ok(binary(column, BinaryOperator::Eq, value(operand)))
    }

    fn physical_column<'c>(&self, table: TableId, column: &'c str) -> &'c str {
        if table != TableId::Facts || !self.posx() {
            return column;
        }
        match column {
            "pos" => "posx",
            "frequency" => "frequencyx",
            other => other,
        }
    }

    fn column_expr(&self, descriptor: &FieldDescriptor, table: TableId) -> Expr {
        let column = aliased_ident(
            table.alias(),
            self.physical_column(table, &descriptor.backing_column),
        );
        match descriptor.strip {
            Some(ch) => Expr::FunctionCall {
                name: "replace".to_string(),
                args: vec![
                    column,
                    value(Value::String(ch.to_string())),
                    value(Value::String(String::new())),
                ],
            },
            None => column,
        }
    }

    /// The ORDER BY expression and, for facts columns, the column name an
    /// index could serve.
    fn order_column(&self, asm: &mut Assembly) -> Result<(Expr, Option<String>), CompileError> {
        let name = FieldCatalog::resolve_alias(&self.settings.order_by);
        let unknown = || CompileError::UnknownOrderColumn(self.settings.order_by.clone());

        let descriptor = self
            .catalog
            .get(&name)
            .filter(|d| {
                matches!(d.kind, FieldKind::Numeric | FieldKind::Text | FieldKind::Feature(_))
                    && d.relative.is_none()
            })
            .ok_or_else(unknown)?;
        let table = descriptor.backing_table.ok_or_else(unknown)?;
        if !self.schema.has_table(table.table_name()) {
            return Err(CompileError::MissingTable(table.table_name().to_string()));
        }

        asm.require(table);
        let index_column = (table == TableId::Facts && descriptor.strip.is_none())
            .then(|| descriptor.backing_column.clone())
            .filter(|c| INDEX_PRIORITY.contains(&c.as_str()));
        Ok((self.column_expr(descriptor, table), index_column))
    }

    /// Joins the tables that only contribute output columns.
    fn add_output_tables(&self, asm: &mut Assembly) {
        let present = |t: TableId| self.schema.has_table(t.table_name());

        if present(TableId::Features) && self.schema.has_column(TableId::Features.table_name(), "featid") {
            asm.require(TableId::Features);
        }
        if self.settings.lemmas && present(TableId::Lemmas) {
            asm.require(TableId::Lemmas);
        }
        if self.settings.grams {
            for (table, _) in GRAM_OUTPUTS {
                if present(table) {
                    asm.require(table);
                }
            }
        }
    }

    fn select_items(&self, asm: &Assembly, posx: bool) -> Vec<SelectItem> {
        let mut names: Vec<String> = Vec::new();
        let mut items = Vec::new();
        let mut add = |expr: Expr, name: &str, aliased: bool| {
            if names.iter().any(|n| n == name) {
                return;
            }
            names.push(name.to_string());
            items.push(select_item(expr, aliased.then_some(name)));
        };

        let facts = TableId::Facts;
        for column in self.schema.columns(facts.table_name()) {
            if HIDDEN_FACT_COLUMNS.contains(&column.as_str()) {
                continue;
            }
            let physical = if posx {
                self.physical_column(facts, column)
            } else {
                column.as_str()
            };
            add(aliased_ident(facts.alias(), physical), column, physical != column.as_str());
        }

        if asm.tables.contains(&TableId::Features) {
            let features = TableId::Features;
            for column in self.schema.columns(features.table_name()) {
                if !FEATURE_KEYS.contains(&column.as_str()) {
                    add(aliased_ident(features.alias(), column), column, false);
                }
            }
        }

        if self.settings.lemmas && asm.tables.contains(&TableId::Lemmas) {
            let lemmas = TableId::Lemmas;
            for column in LEMMA_AGGREGATES {
                if self.schema.has_column(lemmas.table_name(), column) {
                    add(aliased_ident(lemmas.alias(), column), column, false);
                }
            }
        }

        if self.settings.grams {
            for (table, name) in GRAM_OUTPUTS {
                if asm.tables.contains(&table) {
                    add(aliased_ident(table.alias(), "frequency"), name, true);
                }
            }
        }

        items
    }

    fn joins(&self, asm: &Assembly, posx: bool) -> Vec<JoinClause> {
        let w = TableId::Facts.alias();
        let on_featid = |alias: &str| {
            binary(
                aliased_ident(alias, "featid"),
                BinaryOperator::Eq,
                aliased_ident(w, "featid"),
            )
        };
        let join = |kind: JoinKind, table: TableId, alias: &str, on: Expr| JoinClause {
            kind,
            table: table_ref!(table.table_name()),
            alias: Some(alias.to_string()),
            on,
        };

        let mut joins = Vec::new();
        if asm.tables.contains(&TableId::Features) {
            let ft = TableId::Features.alias();
            joins.push(join(JoinKind::Inner, TableId::Features, ft, on_featid(ft)));
        }

        if asm.tables.contains(&TableId::Lemmas) {
            let l = TableId::Lemmas.alias();
            let pos = if posx { "posx" } else { "pos" };
            let on = binary(
                binary(aliased_ident(l, "lemma"), BinaryOperator::Eq, aliased_ident(w, "lemma")),
                BinaryOperator::And,
                binary(aliased_ident(l, "pos"), BinaryOperator::Eq, aliased_ident(w, pos)),
            );
            joins.push(join(JoinKind::Left, TableId::Lemmas, l, on));
        }

        for (table, alias) in &asm.satellites {
            joins.push(join(JoinKind::Inner, *table, alias, on_featid(alias)));
        }

        for table in TableId::NGRAMS {
            if !asm.tables.contains(&table) {
                continue;
            }
            let form = aliased_ident(w, "form");
            let key = match table {
                TableId::InitGrams => substr(form, 1),
                TableId::FinGrams => substr(form, -3),
                _ => form,
            };
            let on = binary(aliased_ident(table.alias(), "form"), BinaryOperator::Eq, key);
            joins.push(join(JoinKind::Left, table, table.alias(), on));
        }

        joins
    }

    fn assemble(&self, mut asm: Assembly) -> Result<CompiledSql, CompileError> {
        let posx = self.posx();
        let (order_expr, order_column) = self.order_column(&mut asm)?;
        self.add_output_tables(&mut asm);

        let index_hint = asm.index.choose(
            self.settings.index_hint,
            order_column.as_deref(),
            posx,
            self.schema,
        );
        let limit = if posx {
            self.settings.row_limit.saturating_mul(2)
        } else {
            self.settings.row_limit
        };
        let direction = if self.settings.ascending {
            OrderDir::Asc
        } else {
            OrderDir::Desc
        };
        let where_expr = and_all(asm.conditions.clone());

        let mut builder = SelectBuilder::new()
            .select(self.select_items(&asm, posx))
            .distinct(asm.distinct)
            .from(table_ref!(TableId::Facts.table_name()), Some(TableId::Facts.alias()))
            .indexed_by(index_hint.as_deref());
        for join in self.joins(&asm, posx) {
            builder = builder.join(join.kind, join.table, join.alias.as_deref(), join.on);
        }
        let select = builder
            .where_clause(where_expr.clone())
            .order_by(order_expr, Some(direction))
            .limit(limit)
            .build();

        let (sql, args) = render_to_sql(&select, &Sqlite);
        let where_clause = where_expr
            .map(|e| render_to_sql(&e, &Sqlite).0)
            .unwrap_or_default();
        let mut from = Renderer::new(&Sqlite);
        render_from(&select.from, &select.joins, &mut from);
        let mut order = Renderer::new(&Sqlite);
        render_order_by(&select.order_by, &mut order);

        debug!("Compiled SQL: {}", sql);
        debug!("Arguments: {:?}", args);

        Ok(CompiledSql {
            sql,
            args,
            where_clause,
            from_clause: from.finish().0,
            index_hint,
            order_by: order.finish().0,
            limit,
            distinct: asm.distinct,
            posx,
            select,
        })
    }
}

fn comparison(op: Operator) -> Option<BinaryOperator> {
    let sql_op = match op {
        Operator::Equal => BinaryOperator::Eq,
        Operator::LessThan => BinaryOperator::Lt,
        Operator::GreaterThan => BinaryOperator::Gt,
        Operator::LessOrEqual => BinaryOperator::LtEq,
        Operator::GreaterOrEqual => BinaryOperator::GtEq,
        Operator::Like => BinaryOperator::Like,
        _ => return None,
    };
    Some(sql_op)
}

/// `substr(expr, start, 3)`: the leading or trailing trigram.
fn substr(expr: Expr, start: i64) -> Expr {
    Expr::FunctionCall {
        name: "substr".to_string(),
        args: vec![expr, value(Value::Int(start)), value(Value::Int(3))],
    }
}
