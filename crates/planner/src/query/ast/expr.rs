//! Expression nodes of the SQL AST.

use model::core::value::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub qualifier: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    And,
    Or,
    Like,
    NotLike,
    Glob,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOp {
    pub left: Expr,
    pub op: BinaryOperator,
    pub right: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Identifier(Ident),
    /// Bound as a parameter when rendered.
    Value(Value),
    BinaryOp(Box<BinaryOp>),
    InList {
        expr: Box<Expr>,
        list: Vec<Expr>,
        negated: bool,
    },
    FunctionCall {
        name: String,
        args: Vec<Expr>,
    },
    Not(Box<Expr>),
    Grouped(Box<Expr>),
}

impl Expr {
    /// Logical negation. Equality, `IN` and `LIKE` flip their operator; any
    /// other expression is wrapped in `NOT (...)`.
    pub fn negate(self) -> Expr {
        match self {
            Expr::BinaryOp(b) if matches!(b.op, BinaryOperator::Eq | BinaryOperator::Like) => {
                let BinaryOp { left, op, right } = *b;
                let op = match op {
                    BinaryOperator::Eq => BinaryOperator::NotEq,
                    _ => BinaryOperator::NotLike,
                };
                Expr::BinaryOp(Box::new(BinaryOp { left, op, right }))
            }
            Expr::InList {
                expr,
                list,
                negated,
            } => Expr::InList {
                expr,
                list,
                negated: !negated,
            },
            other => Expr::Not(Box::new(other)),
        }
    }
}

impl BinaryOperator {
    pub fn as_sql(&self) -> &'static str {
        match self {
            BinaryOperator::Eq => "=",
            BinaryOperator::NotEq => "!=",
            BinaryOperator::Lt => "<",
            BinaryOperator::Gt => ">",
            BinaryOperator::LtEq => "<=",
            BinaryOperator::GtEq => ">=",
            BinaryOperator::And => "AND",
            BinaryOperator::Or => "OR",
            BinaryOperator::Like => "LIKE",
            BinaryOperator::NotLike => "NOT LIKE",
            BinaryOperator::Glob => "GLOB",
        }
    }
}
