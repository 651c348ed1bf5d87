//! Universal invariants checked against concrete renders, rather than as
//! properties over arbitrary input (no QuickCheck-style generator exists
//! for typed expression trees here).

use pgoq_core::expr::{and, BoolExpr, NumericExpr, StringExpr, TypedExpr};
use pgoq_core::schema::Table;
use pgoq_core::{Delete, Select};

fn count_placeholders(sql: &str) -> usize {
    let mut max_n = 0;
    let mut chars = sql.char_indices().peekable();
    while let Some((_, c)) = chars.next() {
        if c != '$' {
            continue;
        }
        let mut digits = String::new();
        while let Some((_, d)) = chars.peek() {
            if d.is_ascii_digit() {
                digits.push(*d);
                chars.next();
            } else {
                break;
            }
        }
        if let Ok(n) = digits.parse::<usize>() {
            max_n = max_n.max(n);
        }
    }
    max_n
}

#[test]
fn placeholder_argument_parity() {
    let t = Table::new("t");
    let (sql, args) = Select::new(vec![])
        .from(Box::new(t.clone()))
        .where_clause(vec![
            NumericExpr::field(&t, "a").gt(1.0).into_expr(),
            StringExpr::field(&t, "b").eq("x").into_expr(),
        ])
        .build();
    assert_eq!(count_placeholders(&sql), args.len());
}

#[test]
fn literals_never_appear_inline_outside_debug_mode() {
    let t = Table::new("t");
    let (sql, _) = Delete::from(t.clone())
        .where_clause(vec![StringExpr::field(&t, "name").eq("super_secret_value").into_expr()])
        .build();
    assert!(!sql.contains("super_secret_value"));
}

#[test]
fn asterisk_and_operators_are_emitted_verbatim() {
    let (sql, _) = Select::count().from(Box::new(Table::new("t"))).build();
    assert!(sql.contains("COUNT(*)"));

    let t = Table::new("t");
    let (sql, _) = Select::new(vec![])
        .from(Box::new(t.clone()))
        .where_clause(vec![NumericExpr::field(&t, "a").gte(1.0).into_expr()])
        .build();
    assert!(sql.contains(">="));
}

#[test]
fn aliasing_a_table_does_not_mutate_the_receiver_and_preserves_name() {
    let t = Table::new("table1");
    let aliased = t.as_("x");
    assert_eq!(aliased.name(), t.name());
    assert!(t.alias().is_none());
    assert_eq!(aliased.alias(), Some("x"));
}

#[test]
fn fields_render_fully_qualified_names_not_empty_strings() {
    let t = Table::new("table1");
    let expr = NumericExpr::field(&t, "column1").into_expr();
    let (sql, _) = Select::new(vec![expr]).from(Box::new(t)).build();
    assert!(sql.contains("\"table1\".column1"));
    assert!(!sql.contains("\"\".column1"));
}

#[test]
fn infix_and_or_render_with_surrounding_parens() {
    let t = Table::new("t");
    let combined: BoolExpr = NumericExpr::field(&t, "a")
        .eq(1.0)
        .and(NumericExpr::field(&t, "b").eq(2.0));
    let (sql, _) = Select::new(vec![])
        .from(Box::new(t))
        .where_clause(vec![combined.into_expr()])
        .build();
    assert!(sql.contains("("));
    assert!(sql.contains(")"));
}

#[test]
fn multigrade_and_or_render_with_single_enclosing_pair() {
    let t = Table::new("t");
    let combined = and(vec![
        NumericExpr::field(&t, "a").eq(1.0),
        NumericExpr::field(&t, "b").eq(2.0),
        NumericExpr::field(&t, "c").eq(3.0),
    ]);
    let (sql, _) = Select::new(vec![])
        .from(Box::new(t))
        .where_clause(vec![combined.into_expr()])
        .build();
    let open = sql.matches('(').count();
    let close = sql.matches(')').count();
    assert_eq!(open, close);
    assert_eq!(open, 1, "multigrade AND must render with a single enclosing pair, got: {sql}");
}
