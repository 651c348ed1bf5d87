//! Tables and fields (C4): named, schema-qualified table descriptors, and
//! the field references that are simultaneously typed expressions.

use crate::builder::{Builder, Renderable};
use crate::expr::Expr;

/// Anything that can appear in a FROM position: a table, a subquery, an
/// aliased subquery.
pub trait Selectable: Renderable {
    fn selectable_alias(&self) -> Option<&str>;
}

/// A schema-qualified table descriptor. Tables are value-like: `as_`
/// returns a new descriptor sharing name/schema but with a distinct alias;
/// the receiver is never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    schema: String,
    name: String,
    alias: Option<String>,
}

impl Table {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: "public".to_string(),
            name: name.into(),
            alias: None,
        }
    }

    #[must_use]
    pub fn with_schema(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            alias: None,
        }
    }

    /// The PostgreSQL pseudo-table used on the RHS of `ON CONFLICT DO
    /// UPDATE` set-predicates to refer to the proposed row. Not a real
    /// table: its only use is emitting `excluded.colname`.
    #[must_use]
    pub fn excluded() -> Self {
        Self {
            schema: String::new(),
            name: "excluded".to_string(),
            alias: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn schema(&self) -> &str {
        &self.schema
    }

    #[must_use]
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// `schema.name`; the excluded pseudo-table has no schema and renders
    /// bare.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        if self.schema.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.schema, self.name)
        }
    }

    /// A new descriptor sharing name and schema, with the given alias.
    /// Does not mutate `self`.
    #[must_use]
    pub fn as_(&self, alias: impl Into<String>) -> Self {
        Self {
            alias: Some(alias.into()),
            ..self.clone()
        }
    }

    /// The identifier used to qualify this table's fields: the alias if
    /// set, otherwise the bare table name.
    #[must_use]
    pub fn qualifier(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

impl Renderable for Table {
    fn render(&self, builder: &mut Builder) {
        builder.print(&self.qualified_name());
        if let Some(alias) = &self.alias {
            builder.print(" AS \"");
            builder.print(alias);
            builder.print("\"");
        }
    }
}

impl Selectable for Table {
    fn selectable_alias(&self) -> Option<&str> {
        self.alias()
    }
}

/// A named reference tied to an owning [`Selectable`] and simultaneously a
/// typed [`Expr`]. Qualification always quotes the owner identifier:
/// `"qualifier".name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRef {
    qualifier: String,
    name: String,
}

impl FieldRef {
    #[must_use]
    pub fn new(table: &Table, name: impl Into<String>) -> Self {
        Self {
            qualifier: table.qualifier().to_string(),
            name: name.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("\"{}\".{}", self.qualifier, self.name)
    }
}

impl Renderable for FieldRef {
    fn render(&self, builder: &mut Builder) {
        builder.print(&self.qualified_name());
    }
}

/// A database constraint referenced by `ON CONFLICT`: `(name, columns,
/// optional partial-index predicate)`.
#[derive(Debug, Clone)]
pub struct DatabaseConstraint {
    pub name: String,
    pub columns: Vec<String>,
    pub predicate: Option<Expr>,
}

impl DatabaseConstraint {
    #[must_use]
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            predicate: None,
        }
    }

    #[must_use]
    pub fn with_predicate(mut self, predicate: Expr) -> Self {
        self.predicate = Some(predicate);
        self
    }
}

/// `(field, value)`. Rendering uses the field's *unqualified* name — an
/// UPDATE target cannot be table-qualified on the LHS of `SET`.
#[derive(Debug, Clone)]
pub struct SetPredicate {
    pub field_name: String,
    pub value: Expr,
}

impl SetPredicate {
    #[must_use]
    pub fn new(field_name: impl Into<String>, value: Expr) -> Self {
        Self {
            field_name: field_name.into(),
            value,
        }
    }
}

/// `ON CONFLICT` resolution, shared by `Insert` and `Update`.
#[derive(Debug, Clone, Default)]
pub enum ConflictAction {
    #[default]
    Nil,
    DoNothing,
    DoUpdate {
        constraint: DatabaseConstraint,
        set_predicates: Vec<SetPredicate>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliasing_does_not_mutate_receiver() {
        let t = Table::new("table1");
        let aliased = t.as_("t1");
        assert_eq!(t.name(), aliased.name());
        assert!(t.alias().is_none());
        assert_eq!(aliased.alias(), Some("t1"));
    }

    #[test]
    fn qualified_name_includes_schema() {
        let t = Table::new("table1");
        assert_eq!(t.qualified_name(), "public.table1");
    }

    #[test]
    fn excluded_pseudo_table_has_no_schema() {
        let t = Table::excluded();
        assert_eq!(t.qualified_name(), "excluded");
        let f = FieldRef::new(&t, "column2");
        assert_eq!(f.qualified_name(), "\"excluded\".column2");
    }

    #[test]
    fn field_qualifies_through_alias_when_present() {
        let t = Table::new("table1").as_("boo");
        let f = FieldRef::new(&t, "column1");
        assert_eq!(f.qualified_name(), "\"boo\".column1");
    }
}
