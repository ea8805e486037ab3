use crate::core::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Filter expression over the columns of a flat table.
///
/// Evaluation follows three-valued logic: a comparison against a missing or
/// null cell is unknown, `Not` of unknown stays unknown, and a filter keeps a
/// row only when its expression is known to be true.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Expr {
    Column(String),
    Literal(Value),
    /// The text of `expr` with every occurrence of `ch` removed.
    StripChar {
        expr: Box<Expr>,
        ch: char,
    },
    Compare {
        left: Box<Expr>,
        op: CompareOp,
        right: Box<Expr>,
    },
    StartsWith {
        expr: Box<Expr>,
        pattern: String,
    },
    EndsWith {
        expr: Box<Expr>,
        pattern: String,
    },
    Contains {
        expr: Box<Expr>,
        pattern: String,
    },
    /// SQL `LIKE` with `%` and `_` wildcards, ASCII case-insensitive.
    Like {
        expr: Box<Expr>,
        pattern: String,
    },
    IsIn {
        expr: Box<Expr>,
        values: Vec<Value>,
    },
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CompareOp {
    Equal,
    NotEqual,
    LessThan,
    GreaterThan,
    LessOrEqual,
    GreaterOrEqual,
}

impl Expr {
    pub fn col(name: &str) -> Self {
        Expr::Column(name.to_string())
    }

    pub fn lit(value: impl Into<Value>) -> Self {
        Expr::Literal(value.into())
    }

    pub fn strip_char(self, ch: char) -> Self {
        Expr::StripChar {
            expr: Box::new(self),
            ch,
        }
    }

    pub fn compare(self, op: CompareOp, right: Expr) -> Self {
        Expr::Compare {
            left: Box::new(self),
            op,
            right: Box::new(right),
        }
    }

    pub fn eq(self, right: Expr) -> Self {
        self.compare(CompareOp::Equal, right)
    }

    pub fn starts_with(self, pattern: &str) -> Self {
        Expr::StartsWith {
            expr: Box::new(self),
            pattern: pattern.to_string(),
        }
    }

    pub fn ends_with(self, pattern: &str) -> Self {
        Expr::EndsWith {
            expr: Box::new(self),
            pattern: pattern.to_string(),
        }
    }

    pub fn contains(self, pattern: &str) -> Self {
        Expr::Contains {
            expr: Box::new(self),
            pattern: pattern.to_string(),
        }
    }

    pub fn like(self, pattern: &str) -> Self {
        Expr::Like {
            expr: Box::new(self),
            pattern: pattern.to_string(),
        }
    }

    pub fn is_in(self, values: Vec<Value>) -> Self {
        Expr::IsIn {
            expr: Box::new(self),
            values,
        }
    }

    pub fn and(self, other: Expr) -> Self {
        Expr::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Expr) -> Self {
        Expr::Or(Box::new(self), Box::new(other))
    }

    pub fn not(self) -> Self {
        Expr::Not(Box::new(self))
    }

    /// Folds `exprs` into a left-deep chain of `Or`. Returns `None` for an
    /// empty list.
    pub fn any(exprs: Vec<Expr>) -> Option<Self> {
        exprs.into_iter().reduce(Expr::or)
    }

    /// Every column name the expression reads.
    pub fn columns(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expr::Column(name) => {
                if !out.contains(&name.as_str()) {
                    out.push(name);
                }
            }
            Expr::Literal(_) => {}
            Expr::StripChar { expr, .. }
            | Expr::StartsWith { expr, .. }
            | Expr::EndsWith { expr, .. }
            | Expr::Contains { expr, .. }
            | Expr::Like { expr, .. }
            | Expr::IsIn { expr, .. }
            | Expr::Not(expr) => expr.collect_columns(out),
            Expr::Compare { left, right, .. } | Expr::And(left, right) | Expr::Or(left, right) => {
                left.collect_columns(out);
                right.collect_columns(out);
            }
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CompareOp::Equal => "==",
            CompareOp::NotEqual => "!=",
            CompareOp::LessThan => "<",
            CompareOp::GreaterThan => ">",
            CompareOp::LessOrEqual => "<=",
            CompareOp::GreaterOrEqual => ">=",
        };
        write!(f, "{s}")
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Column(name) => write!(f, "col({name})"),
            Expr::Literal(v) => write!(f, "{v}"),
            Expr::StripChar { expr, ch } => write!(f, "{expr}.strip('{ch}')"),
            Expr::Compare { left, op, right } => write!(f, "({left} {op} {right})"),
            Expr::StartsWith { expr, pattern } => write!(f, "{expr}.starts_with('{pattern}')"),
            Expr::EndsWith { expr, pattern } => write!(f, "{expr}.ends_with('{pattern}')"),
            Expr::Contains { expr, pattern } => write!(f, "{expr}.contains('{pattern}')"),
            Expr::Like { expr, pattern } => write!(f, "{expr}.like('{pattern}')"),
            Expr::IsIn { expr, values } => {
                let values: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "{expr}.is_in([{}])", values.join(", "))
            }
            Expr::And(l, r) => write!(f, "({l} & {r})"),
            Expr::Or(l, r) => write!(f, "({l} | {r})"),
            Expr::Not(e) => write!(f, "~{e}"),
        }
    }
}
