use crate::query::{
    ast::{
        common::{JoinKind, OrderDir},
        select::{FromClause, JoinClause, OrderByExpr, Select, SelectItem},
    },
    renderer::{Render, Renderer},
};

impl Render for Select {
    fn render(&self, r: &mut Renderer) {
        r.sql.push_str(if self.distinct {
            "SELECT DISTINCT "
        } else {
            "SELECT "
        });
        render_columns(&self.columns, r);

        if !self.from.is_empty() {
            r.sql.push_str(" FROM ");
            render_from(&self.from, &self.joins, r);
        }

        if let Some(condition) = &self.where_clause {
            r.sql.push_str(" WHERE ");
            condition.render(r);
        }

        if !self.order_by.is_empty() {
            r.sql.push_str(" ORDER BY ");
            render_order_by(&self.order_by, r);
        }

        if let Some(limit) = self.limit {
            r.sql.push_str(&format!(" LIMIT {limit}"));
        }
    }
}

impl Render for SelectItem {
    fn render(&self, r: &mut Renderer) {
        self.expr.render(r);
        if let Some(alias) = &self.alias {
            r.sql.push_str(" AS ");
            let quoted = r.dialect.quote_identifier(alias);
            r.sql.push_str(&quoted);
        }
    }
}

impl Render for FromClause {
    fn render(&self, r: &mut Renderer) {
        r.render_table_ref(&self.table);
        if let Some(alias) = &self.alias {
            r.sql.push(' ');
            let quoted = r.dialect.quote_identifier(alias);
            r.sql.push_str(&quoted);
        }
        if let Some(index) = &self.indexed_by {
            r.sql.push_str(" INDEXED BY ");
            let quoted = r.dialect.quote_identifier(index);
            r.sql.push_str(&quoted);
        }
    }
}

impl Render for JoinClause {
    fn render(&self, r: &mut Renderer) {
        r.sql.push_str(match self.kind {
            JoinKind::Inner => "JOIN ",
            JoinKind::Left => "LEFT JOIN ",
        });
        r.render_table_ref(&self.table);
        if let Some(alias) = &self.alias {
            r.sql.push(' ');
            let quoted = r.dialect.quote_identifier(alias);
            r.sql.push_str(&quoted);
        }
        r.sql.push_str(" ON ");
        self.on.render(r);
    }
}

pub fn render_columns(columns: &[SelectItem], r: &mut Renderer) {
    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            r.sql.push_str(", ");
        }
        column.render(r);
    }
}

/// Comma-separated tables followed by the joins.
pub fn render_from(from: &[FromClause], joins: &[JoinClause], r: &mut Renderer) {
    for (i, table) in from.iter().enumerate() {
        if i > 0 {
            r.sql.push_str(", ");
        }
        table.render(r);
    }
    for join in joins {
        r.sql.push(' ');
        join.render(r);
    }
}

pub fn render_order_by(order_by: &[OrderByExpr], r: &mut Renderer) {
    for (i, item) in order_by.iter().enumerate() {
        if i > 0 {
            r.sql.push_str(", ");
        }
        item.expr.render(r);
        match item.direction {
            Some(OrderDir::Asc) => r.sql.push_str(" ASC"),
            Some(OrderDir::Desc) => r.sql.push_str(" DESC"),
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        query::{
            aliased_ident,
            ast::{
                common::{JoinKind, OrderDir},
                expr::BinaryOperator,
            },
            binary,
            builder::select::{SelectBuilder, select_item},
            dialect::Sqlite,
            renderer::{Render, Renderer},
            value,
        },
        table_ref,
    };
    use model::core::value::Value;

    #[test]
    fn test_render_select() {
        let ast = SelectBuilder::new()
            .select(vec![
                select_item(aliased_ident("w", "form"), None),
                select_item(aliased_ident("i", "frequency"), Some("initgramfreq")),
            ])
            .distinct(true)
            .from(table_ref!("wordfreqs"), Some("w"))
            .also_from(table_ref!("features"), Some("ft"))
            .indexed_by(Some("idx_wordfreqs_len_freq"))
            .join(
                JoinKind::Left,
                table_ref!("initgramfreqs"),
                Some("i"),
                binary(
                    aliased_ident("i", "form"),
                    BinaryOperator::Eq,
                    aliased_ident("w", "form"),
                ),
            )
            .where_clause(Some(binary(
                aliased_ident("w", "len"),
                BinaryOperator::Gt,
                value(Value::Int(3)),
            )))
            .order_by(aliased_ident("w", "frequency"), Some(OrderDir::Desc))
            .limit(100)
            .build();

        let mut renderer = Renderer::new(&Sqlite);
        ast.render(&mut renderer);
        let (sql, params) = renderer.finish();

        assert_eq!(
            sql,
            "SELECT DISTINCT w.form, i.frequency AS initgramfreq \
             FROM wordfreqs w INDEXED BY idx_wordfreqs_len_freq, features ft \
             LEFT JOIN initgramfreqs i ON i.form = w.form \
             WHERE w.len > ? ORDER BY w.frequency DESC LIMIT 100"
        );
        assert_eq!(params, vec![Value::Int(3)]);
    }
}
