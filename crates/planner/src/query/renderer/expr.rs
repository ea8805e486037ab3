use crate::query::{
    ast::expr::{BinaryOperator, Expr},
    renderer::{Render, Renderer},
};

impl Render for Expr {
    fn render(&self, r: &mut Renderer) {
        match self {
            Expr::Identifier(ident) => r.render_ident(ident),
            Expr::Value(value) => r.add_param(value.clone()),
            Expr::BinaryOp(b) => {
                render_operand(&b.left, b.op, r);
                r.sql.push(' ');
                r.sql.push_str(b.op.as_sql());
                r.sql.push(' ');
                render_operand(&b.right, b.op, r);
            }
            Expr::InList {
                expr,
                list,
                negated,
            } => {
                expr.render(r);
                r.sql.push_str(if *negated { " NOT IN(" } else { " IN(" });
                for (i, item) in list.iter().enumerate() {
                    if i > 0 {
                        r.sql.push_str(", ");
                    }
                    item.render(r);
                }
                r.sql.push(')');
            }
            Expr::FunctionCall { name, args } => {
                r.sql.push_str(name);
                r.sql.push('(');
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        r.sql.push_str(", ");
                    }
                    arg.render(r);
                }
                r.sql.push(')');
            }
            Expr::Not(inner) => {
                r.sql.push_str("NOT ");
                match inner.as_ref() {
                    Expr::Grouped(_) => inner.render(r),
                    _ => {
                        r.sql.push('(');
                        inner.render(r);
                        r.sql.push(')');
                    }
                }
            }
            Expr::Grouped(inner) => {
                r.sql.push('(');
                inner.render(r);
                r.sql.push(')');
            }
        }
    }
}

/// An `OR` nested under `AND` needs parentheses to keep its meaning.
fn render_operand(operand: &Expr, parent: BinaryOperator, r: &mut Renderer) {
    let needs_parens = parent == BinaryOperator::And
        && matches!(operand, Expr::BinaryOp(b) if b.op == BinaryOperator::Or);
    if needs_parens {
        r.sql.push('(');
        operand.render(r);
        r.sql.push(')');
    } else {
        operand.render(r);
    }
}

#[cfg(test)]
mod tests {
    use crate::query::{
        aliased_ident, and_all,
        ast::expr::{BinaryOperator, Expr},
        binary,
        dialect::Sqlite,
        or_all,
        renderer::render_to_sql,
        value,
    };
    use model::core::value::Value;

    #[test]
    fn test_render_where_with_params() {
        let starts = or_all(vec![
            binary(
                aliased_ident("w", "form"),
                BinaryOperator::Glob,
                value(Value::from("ssa*")),
            ),
            binary(
                aliased_ident("w", "form"),
                BinaryOperator::Glob,
                value(Value::from("ssä*")),
            ),
        ])
        .unwrap();
        let cond = and_all(vec![
            binary(
                aliased_ident("w", "pos"),
                BinaryOperator::Eq,
                value(Value::from("NOUN")),
            ),
            starts,
            Expr::InList {
                expr: Box::new(aliased_ident("ft", "nouncase")),
                list: vec![value(Value::from("Ill")), value(Value::from("Gen"))],
                negated: true,
            },
        ])
        .unwrap();

        let (sql, params) = render_to_sql(&cond, &Sqlite);
        assert_eq!(
            sql,
            "w.pos = ? AND (w.form GLOB ? OR w.form GLOB ?) AND ft.nouncase NOT IN(?, ?)"
        );
        assert_eq!(params.len(), 5);
        assert_eq!(params[0], Value::from("NOUN"));
    }

    #[test]
    fn test_render_not_and_function() {
        let expr = binary(
            Expr::FunctionCall {
                name: "replace".into(),
                args: vec![
                    aliased_ident("w", "lemma"),
                    value(Value::from("#")),
                    value(Value::from("")),
                ],
            },
            BinaryOperator::Eq,
            value(Value::from("autotalli")),
        )
        .negate();
        let (sql, _) = render_to_sql(&expr, &Sqlite);
        assert_eq!(sql, "replace(w.lemma, ?, ?) != ?");

        let not = binary(
            aliased_ident("w", "form"),
            BinaryOperator::Glob,
            value(Value::from("*ss*")),
        )
        .negate();
        let (sql, _) = render_to_sql(&not, &Sqlite);
        assert_eq!(sql, "NOT (w.form GLOB ?)");
    }
}
