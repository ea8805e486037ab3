use crate::query::ast::expr::{BinaryOp, BinaryOperator, Expr, Ident};
use model::core::value::Value;

pub mod ast;
pub mod builder;
pub mod dialect;
pub mod macros;
pub mod renderer;

pub fn ident(name: &str) -> Expr {
    Expr::Identifier(Ident {
        qualifier: None,
        name: name.to_string(),
    })
}

/// `alias.column`
pub fn aliased_ident(alias: &str, name: &str) -> Expr {
    Expr::Identifier(Ident {
        qualifier: Some(alias.to_string()),
        name: name.to_string(),
    })
}

pub fn value(val: Value) -> Expr {
    Expr::Value(val)
}

pub fn binary(left: Expr, op: BinaryOperator, right: Expr) -> Expr {
    Expr::BinaryOp(Box::new(BinaryOp { left, op, right }))
}

/// Joins `exprs` with `AND`. `None` when there is nothing to join.
pub fn and_all(exprs: Vec<Expr>) -> Option<Expr> {
    exprs
        .into_iter()
        .reduce(|acc, e| binary(acc, BinaryOperator::And, e))
}

/// Joins `exprs` with `OR`, parenthesized when more than one so the result
/// can sit inside an `AND` chain.
pub fn or_all(exprs: Vec<Expr>) -> Option<Expr> {
    let many = exprs.len() > 1;
    let joined = exprs
        .into_iter()
        .reduce(|acc, e| binary(acc, BinaryOperator::Or, e))?;
    Some(if many {
        Expr::Grouped(Box::new(joined))
    } else {
        joined
    })
}
