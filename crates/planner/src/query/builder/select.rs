use crate::query::ast::{
    common::{JoinKind, OrderDir, TableRef},
    expr::Expr,
    select::{FromClause, JoinClause, OrderByExpr, Select, SelectItem},
};
use std::marker::PhantomData;

#[derive(Debug, Clone)]
pub struct InitialState;

#[derive(Debug, Clone)]
pub struct SelectState;

#[derive(Debug, Clone)]
pub struct FromState;

/// Builds a [`Select`] in order: columns, then tables, then the optional
/// clauses.
#[derive(Debug, Clone)]
pub struct SelectBuilder<State> {
    pub ast: Select,
    _state: PhantomData<State>,
}

impl SelectBuilder<InitialState> {
    pub fn new() -> Self {
        Self {
            ast: Select::default(),
            _state: PhantomData,
        }
    }

    pub fn select(self, columns: Vec<SelectItem>) -> SelectBuilder<SelectState> {
        let mut ast = self.ast;
        ast.columns = columns;
        SelectBuilder {
            ast,
            _state: PhantomData,
        }
    }
}

impl Default for SelectBuilder<InitialState> {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectBuilder<SelectState> {
    pub fn distinct(mut self, distinct: bool) -> Self {
        self.ast.distinct = distinct;
        self
    }

    pub fn from(self, table: TableRef, alias: Option<&str>) -> SelectBuilder<FromState> {
        let mut ast = self.ast;
        ast.from.push(FromClause {
            table,
            alias: alias.map(|a| a.to_string()),
            indexed_by: None,
        });
        SelectBuilder {
            ast,
            _state: PhantomData,
        }
    }
}

impl SelectBuilder<FromState> {
    /// Adds another comma-separated table to the FROM clause.
    pub fn also_from(mut self, table: TableRef, alias: Option<&str>) -> Self {
        self.ast.from.push(FromClause {
            table,
            alias: alias.map(|a| a.to_string()),
            indexed_by: None,
        });
        self
    }

    /// Pins the first FROM table to a named index.
    pub fn indexed_by(mut self, index: Option<&str>) -> Self {
        if let Some(first) = self.ast.from.first_mut() {
            first.indexed_by = index.map(|i| i.to_string());
        }
        self
    }

    pub fn join(mut self, kind: JoinKind, table: TableRef, alias: Option<&str>, on: Expr) -> Self {
        self.ast.joins.push(JoinClause {
            kind,
            table,
            alias: alias.map(|a| a.to_string()),
            on,
        });
        self
    }

    pub fn where_clause(mut self, condition: Option<Expr>) -> Self {
        self.ast.where_clause = condition;
        self
    }

    pub fn order_by(mut self, expr: Expr, direction: Option<OrderDir>) -> Self {
        self.ast.order_by.push(OrderByExpr { expr, direction });
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.ast.limit = Some(limit);
        self
    }

    pub fn build(self) -> Select {
        self.ast
    }
}

/// `expr AS alias`, or just `expr` when `alias` is `None`.
pub fn select_item(expr: Expr, alias: Option<&str>) -> SelectItem {
    SelectItem {
        expr,
        alias: alias.map(|a| a.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{query::aliased_ident, table_ref};

    #[test]
    fn test_select_builder() {
        let ast = SelectBuilder::new()
            .select(vec![select_item(aliased_ident("w", "form"), None)])
            .distinct(true)
            .from(table_ref!("wordfreqs"), Some("w"))
            .also_from(table_ref!("features"), Some("ft"))
            .indexed_by(Some("idx_wordfreqs_form_freq"))
            .order_by(aliased_ident("w", "frequency"), Some(OrderDir::Desc))
            .limit(20)
            .build();

        assert!(ast.distinct);
        assert_eq!(ast.from.len(), 2);
        assert_eq!(
            ast.from[0].indexed_by.as_deref(),
            Some("idx_wordfreqs_form_freq")
        );
        assert_eq!(ast.from[1].indexed_by, None);
        assert_eq!(ast.limit, Some(20));
    }
}
