//! Staged UPDATE builder. `SET` must be populated before `WHERE`/
//! `ON CONFLICT`/`RETURNING`/`build` become reachable.

use std::marker::PhantomData;

use crate::builder::{Builder, Renderable};
use crate::dialect::Dialect;
use crate::exec::{Built, Execute, Fetch};
use crate::expr::Expr;
use crate::schema::{ConflictAction, DatabaseConstraint, FieldRef, SetPredicate, Table};
use crate::value::SqlValue;

struct UpdateCore {
    table: Table,
    set_predicates: Vec<SetPredicate>,
    from: Option<Table>,
    where_conditions: Vec<Expr>,
    conflict: ConflictAction,
    returning: Vec<Expr>,
}

/// Marker: no `SET` clause yet.
pub struct NoSet;
/// Marker: at least one `SET` predicate has been supplied.
pub struct HasSet;

pub struct Update<Stage = NoSet> {
    core: UpdateCore,
    _stage: PhantomData<Stage>,
}

impl Update<NoSet> {
    #[must_use]
    pub fn table(table: Table) -> Self {
        Self {
            core: UpdateCore {
                table,
                set_predicates: Vec::new(),
                from: None,
                where_conditions: Vec::new(),
                conflict: ConflictAction::Nil,
                returning: Vec::new(),
            },
            _stage: PhantomData,
        }
    }

    #[must_use]
    pub fn set(mut self, field: impl Into<String>, value: Expr) -> Update<HasSet> {
        self.core.set_predicates.push(SetPredicate::new(field, value));
        Update { core: self.core, _stage: PhantomData }
    }
}

impl Update<HasSet> {
    #[must_use]
    pub fn set(mut self, field: impl Into<String>, value: Expr) -> Self {
        self.core.set_predicates.push(SetPredicate::new(field, value));
        self
    }

    /// Additional source table for a multi-table `UPDATE ... FROM ...`.
    #[must_use]
    pub fn from_(mut self, table: Table) -> Self {
        self.core.from = Some(table);
        self
    }

    #[must_use]
    pub fn where_clause(mut self, conditions: Vec<Expr>) -> Self {
        self.core.where_conditions.extend(conditions);
        self
    }

    #[must_use]
    pub fn on_conflict_do_nothing(mut self) -> Self {
        self.core.conflict = ConflictAction::DoNothing;
        self
    }

    #[must_use]
    pub fn on_conflict_do_update(mut self, constraint: DatabaseConstraint) -> UpdateOnConflictSet {
        self.core.conflict = ConflictAction::Nil;
        UpdateOnConflictSet { core: self.core, constraint, set_predicates: Vec::new() }
    }

    #[must_use]
    pub fn returning(mut self, exprs: Vec<Expr>) -> Self {
        self.core.returning = exprs;
        self
    }

    #[must_use]
    pub fn build(self) -> (String, Vec<SqlValue>) {
        let mut builder = Builder::new(Dialect::Postgres);
        self.core.render(&mut builder);
        builder.finish()
    }
}

impl Fetch for Update<HasSet> {
    fn into_built(self) -> Built {
        let (sql, params) = self.build();
        Built::new(sql, params)
    }
}

impl Execute for Update<HasSet> {
    fn into_built(self) -> Built {
        let (sql, params) = self.build();
        Built::new(sql, params)
    }
}

/// `UpdateOnConflictStep`'s DO-UPDATE form: the same `excluded.col`
/// set-predicate grammar as `InsertOnConflictSet`.
pub struct UpdateOnConflictSet {
    core: UpdateCore,
    constraint: DatabaseConstraint,
    set_predicates: Vec<SetPredicate>,
}

impl UpdateOnConflictSet {
    #[must_use]
    pub fn set_updates(mut self, field: impl Into<String>, value: Expr) -> Self {
        self.set_predicates.push(SetPredicate::new(field, value));
        self
    }

    /// `(field, excluded.fieldName)` for each named field.
    #[must_use]
    pub fn set_update_columns(mut self, fields: Vec<impl Into<String>>) -> Self {
        let excluded = Table::excluded();
        for field in fields {
            let name: String = field.into();
            let value = Expr::field(FieldRef::new(&excluded, name.clone()));
            self.set_predicates.push(SetPredicate::new(name, value));
        }
        self
    }

    #[must_use]
    pub fn returning(mut self, exprs: Vec<Expr>) -> Update<HasSet> {
        self.core.returning = exprs;
        self.finish()
    }

    #[must_use]
    pub fn build(self) -> (String, Vec<SqlValue>) {
        self.finish().build()
    }

    fn finish(mut self) -> Update<HasSet> {
        self.core.conflict = ConflictAction::DoUpdate { constraint: self.constraint, set_predicates: self.set_predicates };
        Update { core: self.core, _stage: PhantomData }
    }
}

impl UpdateCore {
    fn render(&self, builder: &mut Builder) {
        builder.print("UPDATE ");
        builder.print(&self.table.qualified_name());
        builder.print(" SET ");
        builder.render_set_predicates(&self.set_predicates);
        if let Some(from) = &self.from {
            builder.print(" FROM ");
            builder.print(&from.qualified_name());
        }
        if !self.where_conditions.is_empty() {
            builder.print(" WHERE ");
            builder.render_conditions(&self.where_conditions);
        }
        match &self.conflict {
            ConflictAction::Nil => {}
            ConflictAction::DoNothing => builder.print(" ON CONFLICT DO NOTHING"),
            ConflictAction::DoUpdate { constraint, set_predicates } => {
                builder.print(" ON CONFLICT ON CONSTRAINT ");
                builder.print(&constraint.name);
                builder.print(" DO UPDATE SET ");
                builder.render_set_predicates(set_predicates);
            }
        }
        if !self.returning.is_empty() {
            builder.print(" RETURNING ");
            builder.render_expressions(&self.returning);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{ExprOps, NumericExpr, TypedExpr};

    #[test]
    fn update_with_where_and_returning() {
        let t = Table::new("table1");
        let (sql, args) = Update::table(t.clone())
            .set("column1", Expr::string("new"))
            .where_clause(vec![NumericExpr::field(&t, "id").eq(1.0).into_expr()])
            .returning(vec![NumericExpr::field(&t, "id").into_expr()])
            .build();
        assert_eq!(sql, "UPDATE public.table1 SET column1 = $1 WHERE \"table1\".id = $2 RETURNING \"table1\".id");
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn from_clause_allows_cross_table_set_and_where() {
        let t1 = Table::new("table1");
        let t2 = Table::new("table2");
        let (sql, args) = Update::table(t1.clone())
            .set("column1", NumericExpr::field(&t2, "column1").into_expr())
            .from_(t2.clone())
            .where_clause(vec![NumericExpr::field(&t1, "column2").eq(NumericExpr::field(&t2, "column2")).into_expr()])
            .build();
        assert_eq!(
            sql,
            "UPDATE public.table1 SET column1 = \"table2\".column1 FROM public.table2 WHERE \"table1\".column2 = \"table2\".column2"
        );
        assert!(args.is_empty());
    }

    #[test]
    fn multiple_set_predicates_are_comma_joined() {
        let (sql, _) = Update::table(Table::new("table1"))
            .set("column1", Expr::int64(1))
            .set("column2", Expr::int64(2))
            .build();
        assert_eq!(sql, "UPDATE public.table1 SET column1 = $1, column2 = $2");
    }

    #[test]
    fn on_conflict_do_nothing_trails_the_where_clause() {
        let t = Table::new("table1");
        let (sql, _) = Update::table(t.clone())
            .set("column1", Expr::int64(1))
            .where_clause(vec![NumericExpr::field(&t, "id").eq(1.0).into_expr()])
            .on_conflict_do_nothing()
            .build();
        assert_eq!(sql, "UPDATE public.table1 SET column1 = $1 WHERE \"table1\".id = $2 ON CONFLICT DO NOTHING");
    }

    #[test]
    fn on_conflict_do_update_sets_excluded_columns() {
        let t1pkey = DatabaseConstraint::new("table1_pkey", vec!["id".into()]);
        let (sql, _) = Update::table(Table::new("table1"))
            .set("column1", Expr::string("foo"))
            .on_conflict_do_update(t1pkey)
            .set_update_columns(vec!["column1"])
            .build();
        assert_eq!(
            sql,
            "UPDATE public.table1 SET column1 = $1 ON CONFLICT ON CONSTRAINT table1_pkey DO UPDATE SET column1 = \"excluded\".column1"
        );
    }
}
