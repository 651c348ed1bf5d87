//! DELETE builder. No staging is required: `USING`/`WHERE`/`RETURNING` are
//! all optional, so a plain consuming builder is the cheapest correct shape.
//!
//! PostgreSQL has no `DELETE ... USING ... ON` syntax; following the jOOQ
//! convention, `on(...)` predicates are folded into the single WHERE list
//! ahead of any explicit `where_clause(...)` conditions rather than
//! rendered as a second, separate `ON` clause.

use crate::builder::{Builder, Renderable};
use crate::dialect::Dialect;
use crate::exec::{Built, Execute, Fetch};
use crate::expr::Expr;
use crate::schema::{Selectable, Table};
use crate::value::SqlValue;

pub struct Delete {
    table: Table,
    using: Option<Box<dyn Selectable>>,
    on_conditions: Vec<Expr>,
    where_conditions: Vec<Expr>,
    returning: Vec<Expr>,
}

impl Delete {
    #[must_use]
    pub fn from(table: Table) -> Self {
        Self { table, using: None, on_conditions: Vec::new(), where_conditions: Vec::new(), returning: Vec::new() }
    }

    /// Additional source table for a multi-table `DELETE ... USING ...`.
    #[must_use]
    pub fn using(mut self, source: Box<dyn Selectable>) -> Self {
        self.using = Some(source);
        self
    }

    /// Join-style predicates against the `USING` source. Folded into the
    /// WHERE list ahead of `where_clause(...)` conditions.
    #[must_use]
    pub fn on(mut self, conditions: Vec<Expr>) -> Self {
        self.on_conditions.extend(conditions);
        self
    }

    #[must_use]
    pub fn where_clause(mut self, conditions: Vec<Expr>) -> Self {
        self.where_conditions.extend(conditions);
        self
    }

    #[must_use]
    pub fn returning(mut self, exprs: Vec<Expr>) -> Self {
        self.returning = exprs;
        self
    }

    #[must_use]
    pub fn build(self) -> (String, Vec<SqlValue>) {
        let mut builder = Builder::new(Dialect::Postgres);
        builder.print("DELETE FROM ");
        builder.print(&self.table.qualified_name());
        if let Some(source) = &self.using {
            builder.print(" USING ");
            source.render(&mut builder);
        }
        let mut conditions = self.on_conditions;
        conditions.extend(self.where_conditions);
        if !conditions.is_empty() {
            builder.print(" WHERE ");
            builder.render_conditions(&conditions);
        }
        if !self.returning.is_empty() {
            builder.print(" RETURNING ");
            builder.render_expressions(&self.returning);
        }
        builder.finish()
    }
}

impl Fetch for Delete {
    fn into_built(self) -> Built {
        let (sql, params) = self.build();
        Built::new(sql, params)
    }
}

impl Execute for Delete {
    fn into_built(self) -> Built {
        let (sql, params) = self.build();
        Built::new(sql, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{ExprOps, NumericExpr, TypedExpr};

    #[test]
    fn delete_with_where_and_returning() {
        let t = Table::new("table1");
        let (sql, args) = Delete::from(t.clone())
            .where_clause(vec![NumericExpr::field(&t, "id").eq(1.0).into_expr()])
            .returning(vec![NumericExpr::field(&t, "id").into_expr()])
            .build();
        assert_eq!(sql, "DELETE FROM public.table1 WHERE \"table1\".id = $1 RETURNING \"table1\".id");
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn delete_without_where_deletes_everything() {
        let (sql, args) = Delete::from(Table::new("table1")).build();
        assert_eq!(sql, "DELETE FROM public.table1");
        assert!(args.is_empty());
    }

    #[test]
    fn using_folds_on_predicates_ahead_of_where() {
        let t1 = Table::new("table1");
        let t2 = Table::new("table2");
        let (sql, args) = Delete::from(t1.clone())
            .using(Box::new(t2.clone()))
            .on(vec![NumericExpr::field(&t1, "table2_id").eq(NumericExpr::field(&t2, "id")).into_expr()])
            .where_clause(vec![NumericExpr::field(&t2, "archived").eq(1.0).into_expr()])
            .build();
        assert_eq!(
            sql,
            "DELETE FROM public.table1 USING public.table2 WHERE \"table1\".table2_id = \"table2\".id AND \"table2\".archived = $1"
        );
        assert_eq!(args.len(), 1);
    }
}
