//! End-to-end statement-construction scenarios exercised through the
//! public API only, one per concrete example in the builder's design
//! notes. The join/seek scenarios live alongside `Select` itself; the
//! conflict-update scenario lives alongside `Insert`.

use pgoq_core::expr::{NumericExpr, StringExpr, TypedExpr};
use pgoq_core::schema::Table;
use pgoq_core::value::SqlValue;
use pgoq_core::{Delete, Select, Update};

#[test]
fn delete_with_string_equality_predicate() {
    // The always-quoted `"table1".column1` here is a deliberate,
    // documented divergence from this scenario's literal unquoted
    // `table1.column1` text: the always-quote convention matches the
    // other three scenarios' concrete qualifiers instead. See
    // `schema/mod.rs`'s entry in DESIGN.md for the full tie-break
    // reasoning (checked against the original, which is unquoted
    // everywhere and does not resolve the tie either).
    let table1 = Table::new("table1");
    let (sql, args) = Delete::from(table1.clone())
        .where_clause(vec![StringExpr::field(&table1, "column1").eq("foo").into_expr()])
        .build();
    assert_eq!(sql, "DELETE FROM public.table1 WHERE \"table1\".column1 = $1");
    assert_eq!(args, vec![SqlValue::Text("foo".into())]);
}

#[test]
fn update_with_from_clause_assigns_across_tables() {
    let table1 = Table::new("table1");
    let table2 = Table::new("table2");
    let (sql, args) = Update::table(table1.clone())
        .set("column1", NumericExpr::field(&table2, "column1").into_expr())
        .from_(table2.clone())
        .where_clause(vec![
            NumericExpr::field(&table1, "column2").eq(NumericExpr::field(&table2, "column2")).into_expr(),
        ])
        .build();
    assert_eq!(
        sql,
        "UPDATE public.table1 SET column1 = \"table2\".column1 FROM public.table2 WHERE \"table1\".column2 = \"table2\".column2"
    );
    assert!(args.is_empty());
}

#[test]
fn select_count_star_from_table() {
    let table1 = Table::new("table1");
    let (sql, args) = Select::count().from(Box::new(table1)).build();
    assert_eq!(sql, "SELECT COUNT(*) FROM public.table1");
    assert!(args.is_empty());
}
