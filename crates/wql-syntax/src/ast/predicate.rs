use crate::ast::operator::Operator;
use model::core::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PredicateValue {
    Number(Value),
    Text(String),
    TextSet(Vec<String>),
}

impl PredicateValue {
    /// The value as a list of text items. Numbers render as their text.
    pub fn texts(&self) -> Vec<String> {
        match self {
            PredicateValue::Number(v) => v.as_string().into_iter().collect(),
            PredicateValue::Text(t) => vec![t.clone()],
            PredicateValue::TextSet(items) => items.clone(),
        }
    }

    /// The value as bound arguments, in order.
    pub fn values(&self) -> Vec<Value> {
        match self {
            PredicateValue::Number(v) => vec![v.clone()],
            PredicateValue::Text(t) => vec![Value::String(t.clone())],
            PredicateValue::TextSet(items) => {
                items.iter().map(|i| Value::String(i.clone())).collect()
            }
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            PredicateValue::Number(v) => v.as_f64(),
            _ => None,
        }
    }

    /// Whether any text item holds the `_` no-value placeholder.
    pub fn has_placeholder(&self) -> bool {
        match self {
            PredicateValue::Number(_) => false,
            PredicateValue::Text(t) => t.contains('_'),
            PredicateValue::TextSet(items) => items.iter().any(|i| i.contains('_')),
        }
    }
}

/// One validated condition of a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    /// Catalog field name after alias, positional and relative rewriting.
    pub field: String,
    pub operator: Operator,
    pub value: PredicateValue,
    pub negate: bool,
}

impl Predicate {
    pub fn new(field: &str, operator: Operator, value: PredicateValue, negate: bool) -> Self {
        Self {
            field: field.to_string(),
            operator,
            value,
            negate,
        }
    }

    /// A `LIKE` pattern without a literal prefix cannot use an index.
    pub fn is_unanchored_like(&self) -> bool {
        self.operator == Operator::Like
            && self
                .value
                .texts()
                .iter()
                .any(|p| p.starts_with('%') || p.starts_with('_'))
    }
}

impl fmt::Display for PredicateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredicateValue::Number(v) => write!(f, "{v}"),
            PredicateValue::Text(t) => write!(f, "{t}"),
            PredicateValue::TextSet(items) => write!(f, "{}", items.join(",")),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negate {
            write!(f, "not ")?;
        }
        write!(f, "{} {} {}", self.field, self.operator, self.value)
    }
}
