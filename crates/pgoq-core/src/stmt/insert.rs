//! Staged INSERT builder. Column-list and subquery source are mutually
//! exclusive; `ON CONFLICT`/`RETURNING`/`build` only appear once a source
//! has been supplied.

use std::marker::PhantomData;

use crate::builder::{Builder, Renderable};
use crate::dialect::Dialect;
use crate::exec::{Built, Execute, Fetch};
use crate::expr::Expr;
use crate::schema::{ConflictAction, DatabaseConstraint, SetPredicate, Selectable, Table};
use crate::value::SqlValue;

enum InsertSource {
    Rows { columns: Vec<String>, rows: Vec<Vec<Expr>> },
    Subquery(Box<dyn Selectable>),
}

struct InsertCore {
    table: Table,
    source: Option<InsertSource>,
    conflict: ConflictAction,
    returning: Vec<Expr>,
}

/// Marker: no values or subquery source has been supplied yet.
pub struct Building;
/// Marker: the statement has a source and can take `ON CONFLICT`,
/// `RETURNING`, or `build`.
pub struct Ready;

pub struct Insert<Stage = Building> {
    core: InsertCore,
    _stage: PhantomData<Stage>,
}

impl Insert<Building> {
    #[must_use]
    pub fn into_table(table: Table) -> Self {
        Self {
            core: InsertCore { table, source: None, conflict: ConflictAction::Nil, returning: Vec::new() },
            _stage: PhantomData,
        }
    }

    /// `Set(field, value)`; repeated calls append to one implicit row.
    #[must_use]
    pub fn set(mut self, field: impl Into<String>, value: Expr) -> Insert<Ready> {
        match &mut self.core.source {
            Some(InsertSource::Rows { columns, rows }) => {
                columns.push(field.into());
                rows[0].push(value);
            }
            _ => {
                self.core.source = Some(InsertSource::Rows { columns: vec![field.into()], rows: vec![vec![value]] });
            }
        }
        Insert { core: self.core, _stage: PhantomData }
    }

    /// `Columns(f1, f2, …)`, to be followed by one or more `.values(...)`.
    #[must_use]
    pub fn columns(self, columns: Vec<impl Into<String>>) -> InsertColumns {
        InsertColumns {
            core: self.core,
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// `INSERT INTO t (SELECT …)`.
    #[must_use]
    pub fn select(mut self, subquery: Box<dyn Selectable>) -> Insert<Ready> {
        self.core.source = Some(InsertSource::Subquery(subquery));
        Insert { core: self.core, _stage: PhantomData }
    }
}

/// Intermediate stage between `Columns(...)` and the first `.values(...)`.
pub struct InsertColumns {
    core: InsertCore,
    columns: Vec<String>,
}

impl InsertColumns {
    #[must_use]
    pub fn values(mut self, row: Vec<Expr>) -> Insert<Ready> {
        assert_eq!(row.len(), self.columns.len(), "VALUES row arity must match the column list");
        self.core.source = Some(InsertSource::Rows { columns: self.columns, rows: vec![row] });
        Insert { core: self.core, _stage: PhantomData }
    }
}

impl Insert<Ready> {
    /// Another `Set(field, value)` call, appending a column to the single
    /// implicit row.
    #[must_use]
    pub fn set(mut self, field: impl Into<String>, value: Expr) -> Self {
        if let Some(InsertSource::Rows { columns, rows }) = &mut self.core.source {
            columns.push(field.into());
            rows[0].push(value);
        }
        self
    }

    /// An additional VALUES row for the column-list form.
    #[must_use]
    pub fn and_values(mut self, row: Vec<Expr>) -> Self {
        if let Some(InsertSource::Rows { columns, rows }) = &mut self.core.source {
            assert_eq!(row.len(), columns.len(), "VALUES row arity must match the column list");
            rows.push(row);
        }
        self
    }

    #[must_use]
    pub fn on_conflict_do_nothing(mut self) -> Self {
        self.core.conflict = ConflictAction::DoNothing;
        self
    }

    #[must_use]
    pub fn on_conflict_do_update(mut self, constraint: DatabaseConstraint) -> InsertOnConflictSet {
        self.core.conflict = ConflictAction::Nil;
        InsertOnConflictSet { core: self.core, constraint, set_predicates: Vec::new() }
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

impl Fetch for Insert<Ready> {
    fn into_built(self) -> Built {
        let (sql, params) = self.build();
        Built::new(sql, params)
    }
}

impl Execute for Insert<Ready> {
    fn into_built(self) -> Built {
        let (sql, params) = self.build();
        Built::new(sql, params)
    }
}

/// `InsertOnConflictSetStep`: the DO-UPDATE clause's `SetUpdates`/
/// `SetUpdateColumns`.
pub struct InsertOnConflictSet {
    core: InsertCore,
    constraint: DatabaseConstraint,
    set_predicates: Vec<SetPredicate>,
}

impl InsertOnConflictSet {
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
            let value = Expr::field(crate::schema::FieldRef::new(&excluded, name.clone()));
            self.set_predicates.push(SetPredicate::new(name, value));
        }
        self
    }

    #[must_use]
    pub fn returning(mut self, exprs: Vec<Expr>) -> Insert<Ready> {
        self.core.returning = exprs;
        self.finish()
    }

    #[must_use]
    pub fn build(self) -> (String, Vec<SqlValue>) {
        self.finish().build()
    }

    fn finish(mut self) -> Insert<Ready> {
        self.core.conflict = ConflictAction::DoUpdate { constraint: self.constraint, set_predicates: self.set_predicates };
        Insert { core: self.core, _stage: PhantomData }
    }
}

impl InsertCore {
    fn render(&self, builder: &mut Builder) {
        builder.print("INSERT INTO ");
        builder.print(&self.table.qualified_name());
        builder.print(" ");
        match self.source.as_ref().expect("insert statement has no source") {
            InsertSource::Rows { columns, rows } => {
                let names: Vec<&str> = columns.iter().map(String::as_str).collect();
                builder.render_field_array(&names);
                builder.print(" VALUES ");
                for (i, row) in rows.iter().enumerate() {
                    if i > 0 {
                        builder.print(", ");
                    }
                    builder.render_expression_array(row);
                }
            }
            InsertSource::Subquery(subquery) => {
                builder.print("(");
                subquery.render(builder);
                builder.print(")");
            }
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
    use crate::expr::Expr;

    #[test]
    fn column_list_form_via_repeated_set() {
        let t1pkey = DatabaseConstraint::new("table1_pkey", vec!["id".into()]);
        let (sql, args) = Insert::into_table(Table::new("table1"))
            .set("column1", Expr::string("foo"))
            .set("column2", Expr::string("bar"))
            .on_conflict_do_update(t1pkey)
            .set_update_columns(vec!["column2"])
            .build();
        assert_eq!(
            sql,
            "INSERT INTO public.table1 (column1, column2) VALUES ($1, $2) ON CONFLICT ON CONSTRAINT table1_pkey DO UPDATE SET column2 = \"excluded\".column2"
        );
        assert_eq!(args, vec![SqlValue::Text("foo".into()), SqlValue::Text("bar".into())]);
    }

    #[test]
    fn multi_row_values_form() {
        let (sql, args) = Insert::into_table(Table::new("table1"))
            .columns(vec!["column1", "column2"])
            .values(vec![Expr::int64(1), Expr::int64(2)])
            .and_values(vec![Expr::int64(3), Expr::int64(4)])
            .build();
        assert_eq!(sql, "INSERT INTO public.table1 (column1, column2) VALUES ($1, $2), ($3, $4)");
        assert_eq!(args.len(), 4);
    }

    #[test]
    fn do_nothing_conflict_action() {
        let (sql, _) = Insert::into_table(Table::new("table1"))
            .set("column1", Expr::int64(1))
            .on_conflict_do_nothing()
            .build();
        assert_eq!(sql, "INSERT INTO public.table1 (column1) VALUES ($1) ON CONFLICT DO NOTHING");
    }
}
