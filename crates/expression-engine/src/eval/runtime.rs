use crate::{
    context::RowView,
    error::{ExpressionError, Result},
    eval::binary::{compare, is_member},
    functions::string::{like_match, strip_char},
};
use model::{core::value::Value, execution::expr::Expr};

/// Evaluates frame expressions against a single row.
pub trait Evaluator {
    /// The value of the expression. Predicates evaluate to `Int(1)`/`Int(0)`
    /// or `Null` when unknown.
    fn evaluate(&self, row: &dyn RowView) -> Result<Value>;

    /// Three-valued truth of a predicate: `None` is unknown.
    fn truth(&self, row: &dyn RowView) -> Result<Option<bool>>;

    /// Whether a filter on this expression keeps the row.
    fn matches(&self, row: &dyn RowView) -> Result<bool> {
        Ok(self.truth(row)? == Some(true))
    }
}

impl Evaluator for Expr {
    fn evaluate(&self, row: &dyn RowView) -> Result<Value> {
        match self {
            Expr::Column(name) => row
                .get(name)
                .cloned()
                .ok_or_else(|| ExpressionError::ColumnNotFound(name.clone())),

            Expr::Literal(value) => Ok(value.clone()),

            Expr::StripChar { expr, ch } => {
                let value = expr.evaluate(row)?;
                Ok(match value.as_string() {
                    Some(text) => Value::String(strip_char(&text, *ch)),
                    None => Value::Null,
                })
            }

            _ => Ok(match self.truth(row)? {
                Some(true) => Value::Int(1),
                Some(false) => Value::Int(0),
                None => Value::Null,
            }),
        }
    }

    fn truth(&self, row: &dyn RowView) -> Result<Option<bool>> {
        match self {
            Expr::Column(_) | Expr::Literal(_) | Expr::StripChar { .. } => {
                let value = self.evaluate(row)?;
                match value {
                    Value::Null => Ok(None),
                    Value::Int(i) => Ok(Some(i != 0)),
                    other => Err(ExpressionError::TypeMismatch {
                        expected: "boolean".to_string(),
                        actual: format!("{:?}", other.data_type()),
                    }),
                }
            }

            Expr::Compare { left, op, right } => {
                let l = left.evaluate(row)?;
                let r = right.evaluate(row)?;
                Ok(compare(&l, *op, &r))
            }

            Expr::StartsWith { expr, pattern } => {
                text_test(expr.as_ref(), row, |t| t.starts_with(pattern.as_str()))
            }
            Expr::EndsWith { expr, pattern } => {
                text_test(expr.as_ref(), row, |t| t.ends_with(pattern.as_str()))
            }
            Expr::Contains { expr, pattern } => {
                text_test(expr.as_ref(), row, |t| t.contains(pattern.as_str()))
            }
            Expr::Like { expr, pattern } => text_test(expr.as_ref(), row, |t| like_match(t, pattern)),

            Expr::IsIn { expr, values } => {
                let value = expr.evaluate(row)?;
                Ok(is_member(&value, values))
            }

            Expr::And(l, r) => {
                let left = l.truth(row)?;
                if left == Some(false) {
                    return Ok(Some(false));
                }
                let right = r.truth(row)?;
                Ok(match (left, right) {
                    (_, Some(false)) => Some(false),
                    (Some(true), Some(true)) => Some(true),
                    _ => None,
                })
            }

            Expr::Or(l, r) => {
                let left = l.truth(row)?;
                if left == Some(true) {
                    return Ok(Some(true));
                }
                let right = r.truth(row)?;
                Ok(match (left, right) {
                    (_, Some(true)) => Some(true),
                    (Some(false), Some(false)) => Some(false),
                    _ => None,
                })
            }

            Expr::Not(inner) => Ok(inner.truth(row)?.map(|b| !b)),
        }
    }
}

fn text_test(expr: &Expr, row: &dyn RowView, test: impl Fn(&str) -> bool) -> Result<Option<bool>> {
    let value = expr.evaluate(row)?;
    Ok(value.as_string().map(|text| test(&text)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn row() -> HashMap<String, Value> {
        HashMap::from([
            ("form".to_string(), Value::from("autotallissa")),
            ("lemma".to_string(), Value::from("auto#talli")),
            ("frequency".to_string(), Value::Int(42)),
            ("clitic".to_string(), Value::Null),
        ])
    }

    #[test]
    fn test_string_predicates() {
        let row = row();
        assert!(Expr::col("form").starts_with("auto").matches(&row).unwrap());
        assert!(Expr::col("form").ends_with("ssa").matches(&row).unwrap());
        assert!(Expr::col("lemma").like("%#%").matches(&row).unwrap());
        assert!(Expr::col("lemma")
            .strip_char('#')
            .eq(Expr::lit("autotalli"))
            .matches(&row)
            .unwrap());
    }

    #[test]
    fn test_null_is_unknown_under_negation() {
        let row = row();
        let is_kin = Expr::col("clitic").is_in(vec![Value::from("Kin")]);
        assert_eq!(is_kin.truth(&row).unwrap(), None);
        assert!(!is_kin.clone().not().matches(&row).unwrap());
        assert!(!is_kin.matches(&row).unwrap());
    }

    #[test]
    fn test_three_valued_connectives() {
        let row = row();
        let unknown = Expr::col("clitic").contains("Kin");
        let yes = Expr::col("frequency").compare(
            model::execution::expr::CompareOp::GreaterThan,
            Expr::lit(Value::Int(10)),
        );
        assert_eq!(unknown.clone().or(yes.clone()).truth(&row).unwrap(), Some(true));
        assert_eq!(unknown.clone().and(yes.clone()).truth(&row).unwrap(), None);
        assert_eq!(
            unknown.and(yes.not()).truth(&row).unwrap(),
            Some(false)
        );
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let err = Expr::col("nope").starts_with("a").matches(&row()).unwrap_err();
        assert_eq!(err, ExpressionError::ColumnNotFound("nope".into()));
    }
}
