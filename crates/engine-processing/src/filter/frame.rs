use crate::{error::CompileError, filter::compiler::FilterCompiler};
use connectors::file::csv::frame::LazyFrame;
use expression_engine::{Evaluator, ExpressionError, RowView};
use model::execution::expr::{CompareOp, Expr};
use tracing::debug;
use wql_syntax::{FeatureMatch, FieldCatalog, FieldKind, Operator, Predicate, Query};

/// One filter over a single flat column.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterStep {
    pub column: String,
    pub expr: Expr,
}

/// Filter steps applied left to right to a flat table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledFrameFilter {
    pub steps: Vec<FilterStep>,
}

impl CompiledFrameFilter {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Adds every step to a lazy scan.
    pub fn apply<'a>(&self, frame: LazyFrame<'a>) -> LazyFrame<'a> {
        self.steps
            .iter()
            .fold(frame, |frame, step| frame.filter(step.expr.clone()))
    }

    /// Whether one materialized row passes every step.
    pub fn matches(&self, row: &dyn RowView) -> Result<bool, ExpressionError> {
        for step in &self.steps {
            if !step.expr.matches(row)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Compiles queries into filters over the columns of a flat export.
pub struct FrameCompiler<'a> {
    catalog: &'a FieldCatalog,
}

impl FilterCompiler for FrameCompiler<'_> {
    type Filter = CompiledFrameFilter;

    fn compile(&self, query: &Query) -> Result<CompiledFrameFilter, CompileError> {
        if query.is_empty() {
            return Err(CompileError::EmptyQuery);
        }
        self.compile_steps(query)
    }
}

impl<'a> FrameCompiler<'a> {
    pub fn new(catalog: &'a FieldCatalog) -> Self {
        Self { catalog }
    }

    /// Like [`FilterCompiler::compile`], but an empty query yields an empty
    /// filter.
    pub fn compile_steps(&self, query: &Query) -> Result<CompiledFrameFilter, CompileError> {
        let steps = query
            .predicates
            .iter()
            .map(|p| self.compile_predicate(p))
            .collect::<Result<Vec<_>, _>>()?;

        for step in &steps {
            debug!("Frame filter on '{}': {}", step.column, step.expr);
        }
        Ok(CompiledFrameFilter { steps })
    }

    fn compile_predicate(&self, p: &Predicate) -> Result<FilterStep, CompileError> {
        let descriptor = self
            .catalog
            .get(&p.field)
            .ok_or_else(|| CompileError::UnknownField(p.field.clone()))?;
        let column = descriptor.backing_column.clone();

        let mut target = Expr::col(&column);
        if let Some(ch) = descriptor.strip {
            target = target.strip_char(ch);
        }

        let texts = p.value.texts();
        let missing = || CompileError::MissingValue(p.field.clone());

        let expr = match p.operator {
            Operator::StartsWith => {
                Expr::any(texts.iter().map(|t| target.clone().starts_with(t)).collect())
                    .ok_or_else(missing)?
            }
            Operator::EndsWith => {
                Expr::any(texts.iter().map(|t| target.clone().ends_with(t)).collect())
                    .ok_or_else(missing)?
            }
            Operator::Middle => Expr::any(
                texts
                    .iter()
                    .map(|t| {
                        target
                            .clone()
                            .contains(t)
                            .and(target.clone().starts_with(t).not())
                            .and(target.clone().ends_with(t).not())
                    })
                    .collect(),
            )
            .ok_or_else(missing)?,
            Operator::Like => {
                let pattern = texts.first().ok_or_else(missing)?;
                target.like(pattern)
            }
            Operator::Equal | Operator::In
                if descriptor.kind == FieldKind::Feature(FeatureMatch::MultiChoice) =>
            {
                Expr::any(texts.iter().map(|t| target.clone().contains(t)).collect())
                    .ok_or_else(missing)?
            }
            Operator::In => target.is_in(p.value.values()),
            op => {
                let compare = compare_op(op).ok_or_else(|| CompileError::UnsupportedOperator {
                    field: p.field.clone(),
                    operator: op.to_string(),
                })?;
                let operand = p.value.values().into_iter().next().ok_or_else(missing)?;
                target.compare(compare, Expr::Literal(operand))
            }
        };

        Ok(FilterStep {
            column,
            expr: if p.negate { expr.not() } else { expr },
        })
    }
}

fn compare_op(op: Operator) -> Option<CompareOp> {
    let compare = match op {
        Operator::Equal => CompareOp::Equal,
        Operator::LessThan => CompareOp::LessThan,
        Operator::GreaterThan => CompareOp::GreaterThan,
        Operator::LessOrEqual => CompareOp::LessOrEqual,
        Operator::GreaterOrEqual => CompareOp::GreaterOrEqual,
        _ => return None,
    };
    Some(compare)
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::core::{totals::AggregateTotals, value::Value};
    use std::collections::HashMap;

    fn catalog() -> FieldCatalog {
        let columns: Vec<String> = [
            "lemma", "form", "pos", "feats", "frequency", "len", "case", "number", "clitic",
        ]
        .iter()
        .map(|c| c.to_string())
        .collect();
        FieldCatalog::columnar(&columns)
    }

    fn compile(input: &str) -> CompiledFrameFilter {
        let catalog = catalog();
        let query = wql_syntax::parse(input, &catalog, &AggregateTotals::default()).unwrap();
        FrameCompiler::new(&catalog).compile(&query).unwrap()
    }

    fn text(value: &str) -> Value {
        Value::String(value.to_string())
    }

    fn row(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_steps_follow_predicate_order() {
        let filter = compile("pos = noun and case = ill and len > 3");
        let columns: Vec<_> = filter.steps.iter().map(|s| s.column.as_str()).collect();
        assert_eq!(columns, vec!["pos", "case", "len"]);
        assert_eq!(
            filter.steps[1].expr,
            Expr::col("case").compare(CompareOp::Equal, Expr::lit("Ill"))
        );
    }

    #[test]
    fn test_lemma_equality_strips_compound_marker() {
        let filter = compile("lemma = autotalli");
        let hit = row(&[("lemma", text("auto#talli"))]);
        let miss = row(&[("lemma", text("auto"))]);
        assert!(filter.matches(&hit).unwrap());
        assert!(!filter.matches(&miss).unwrap());
    }

    #[test]
    fn test_middle_excludes_edges() {
        let filter = compile("middle = ta");
        let matches = |form: &str| filter.matches(&row(&[("form", text(form))])).unwrap();
        assert!(matches("autotalli"));
        assert!(!matches("talli"));
        assert!(!matches("pata"));
    }

    #[test]
    fn test_multi_choice_features_use_contains() {
        let filter = compile("clitic = kin");
        let hit = row(&[("clitic", text("Han,Kin"))]);
        assert!(filter.matches(&hit).unwrap());

        let negated = compile("clitic != kin");
        assert!(!negated.matches(&hit).unwrap());
        // A missing value fails both a predicate and its negation.
        let empty = row(&[("clitic", Value::Null)]);
        assert!(!filter.matches(&empty).unwrap());
        assert!(!negated.matches(&empty).unwrap());
    }

    #[test]
    fn test_empty_query() {
        let catalog = catalog();
        let compiler = FrameCompiler::new(&catalog);
        assert_eq!(
            compiler.compile(&Query::default()).unwrap_err(),
            CompileError::EmptyQuery
        );
        assert!(compiler.compile_steps(&Query::default()).unwrap().is_empty());
    }
}
