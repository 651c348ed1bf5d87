//! The expression algebra (C3): a tagged-union expression tree with typed
//! operator wrappers.
//!
//! The original design recovers a field's most-derived render method
//! through an "original expression" back-reference on every wrapper
//! (necessary when polymorphism is built from struct embedding). Here the
//! tree is a single [`Expr`] enum that owns its rendering directly — a
//! [`BoolExpr`]/[`NumericExpr`]/[`StringExpr`]/[`DateTimeExpr`]/[`UuidExpr`]
//! is a thin newtype around the same node, so there is nothing to lose by
//! embedding it in a larger expression and no back-reference to maintain.

use std::rc::Rc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::builder::{Builder, Renderable};
use crate::schema::{FieldRef, Table};
use crate::value::{IntoSqlValue, SqlValue};

mod operand;
mod ops;

pub use operand::{BoolOperand, DateTimeOperand, NumericOperand, StringOperand, UuidOperand};
pub use ops::{ExprOps, TypedExpr};

/// The SQL operators this crate knows how to render (C1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    And,
    Or,
    Not,
    Eq,
    NotEq,
    Lt,
    Lte,
    Gt,
    Gte,
    Like,
    ILike,
    IsNull,
    IsNotNull,
    In,
    NotIn,
    Add,
    Sub,
    Mult,
    Div,
    Sqrt,
    Asc,
    Desc,
}

impl Operator {
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Like => "LIKE",
            Self::ILike => "ILIKE",
            Self::IsNull => "IS NULL",
            Self::IsNotNull => "IS NOT NULL",
            Self::In => "IN",
            Self::NotIn => "NOT IN",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mult => "*",
            Self::Div => "/",
            Self::Sqrt => "|/",
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Clone)]
enum ExprKind {
    Keyword(String),
    Literal(SqlValue),
    ExpressionArray(Vec<Expr>),
    Subquery(Rc<dyn Renderable>),
    Field(FieldRef),
    Function { name: String, args: Vec<Expr> },
    Overlay { source: Box<Expr>, replacing: Box<Expr>, from: Box<Expr>, for_len: Option<Box<Expr>> },
    UnaryPrefix { op: Operator, operand: Box<Expr> },
    UnaryPostfix { operand: Box<Expr>, op: Operator },
    Binary { lhs: Box<Expr>, op: Operator, rhs: Box<Expr> },
    Multigrade { op: Operator, exprs: Vec<Expr> },
    Alias { inner: Box<Expr>, alias: String },
    Filter { inner: Box<Expr>, conditions: Vec<Expr> },
}

/// A node in the typed expression tree. Every `Expr` knows how to render
/// itself; the `has_parens` flag controls whether rendering wraps the
/// output in `( … )`.
#[derive(Clone)]
pub struct Expr {
    kind: ExprKind,
    has_parens: bool,
}

impl std::fmt::Debug for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Expr").field("has_parens", &self.has_parens).finish_non_exhaustive()
    }
}

/// Sort direction recovered from an ORDER BY entry, used by keyset seek to
/// pick `<` (descending) or `>` (ascending, the default for a bare
/// expression) at each prefix position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekDirection {
    Ascending,
    Descending,
}

impl Expr {
    #[must_use]
    pub fn keyword(s: impl Into<String>) -> Self {
        Self { kind: ExprKind::Keyword(s.into()), has_parens: false }
    }

    /// `*`, used in `Count(Asterisk)` and bare `SELECT *`.
    #[must_use]
    pub fn asterisk() -> Self {
        Self::keyword("*")
    }

    #[must_use]
    pub fn literal(v: SqlValue) -> Self {
        Self { kind: ExprKind::Literal(v), has_parens: false }
    }

    /// Escape hatch for values that legitimately need to bypass the typed
    /// constructors (`excluded.col`-style synthetic references, or an
    /// override type the generator doesn't know about).
    #[must_use]
    pub fn raw_literal(v: impl IntoSqlValue) -> Self {
        Self::literal(v.into_sql_value())
    }

    #[must_use]
    pub fn bool(v: bool) -> Self {
        Self::literal(SqlValue::Bool(v))
    }

    #[must_use]
    pub fn int64(v: i64) -> Self {
        Self::literal(SqlValue::Int(v))
    }

    #[must_use]
    pub fn float64(v: f64) -> Self {
        Self::literal(SqlValue::Float(v))
    }

    #[must_use]
    pub fn string(v: impl Into<String>) -> Self {
        Self::literal(SqlValue::Text(v.into()))
    }

    #[must_use]
    pub fn datetime(v: DateTime<Utc>) -> Self {
        Self::literal(SqlValue::Timestamp(v))
    }

    #[must_use]
    pub fn uuid(v: Uuid) -> Self {
        Self::literal(SqlValue::Uuid(v))
    }

    #[must_use]
    pub fn field(f: FieldRef) -> Self {
        Self { kind: ExprKind::Field(f), has_parens: false }
    }

    #[must_use]
    pub fn expression_array(exprs: Vec<Expr>) -> Self {
        Self { kind: ExprKind::ExpressionArray(exprs), has_parens: false }
    }

    /// A subquery used as an expression operand. Always renders
    /// parenthesized, matching `IN`-operand and set-predicate rendering.
    #[must_use]
    pub fn subquery(selectable: Rc<dyn Renderable>) -> Self {
        Self { kind: ExprKind::Subquery(selectable), has_parens: true }
    }

    #[must_use]
    pub fn function(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self { kind: ExprKind::Function { name: name.into(), args }, has_parens: false }
    }

    #[must_use]
    pub fn overlay(source: Expr, replacing: Expr, from: Expr, for_len: Option<Expr>) -> Self {
        Self {
            kind: ExprKind::Overlay {
                source: Box::new(source),
                replacing: Box::new(replacing),
                from: Box::new(from),
                for_len: for_len.map(Box::new),
            },
            has_parens: false,
        }
    }

    #[must_use]
    pub fn unary_prefix(operand: Expr, op: Operator) -> Self {
        Self { kind: ExprKind::UnaryPrefix { op, operand: Box::new(operand) }, has_parens: false }
    }

    #[must_use]
    pub fn unary_postfix(operand: Expr, op: Operator) -> Self {
        Self { kind: ExprKind::UnaryPostfix { operand: Box::new(operand), op }, has_parens: false }
    }

    #[must_use]
    pub fn binary(lhs: Expr, op: Operator, rhs: Expr) -> Self {
        Self { kind: ExprKind::Binary { lhs: Box::new(lhs), op, rhs: Box::new(rhs) }, has_parens: false }
    }

    /// A binary expression that always renders parenthesized — the shape
    /// produced by infix `.and`/`.or`.
    #[must_use]
    pub fn binary_paren(lhs: Expr, op: Operator, rhs: Expr) -> Self {
        let mut e = Self::binary(lhs, op, rhs);
        e.has_parens = true;
        e
    }

    /// `e1 OP e2 OP … OP eN`, always parenthesized — multigrade
    /// `And(a,b,c)`/`Or(a,b,c)`.
    #[must_use]
    pub fn multigrade(op: Operator, exprs: Vec<Expr>) -> Self {
        Self { kind: ExprKind::Multigrade { op, exprs }, has_parens: true }
    }

    #[must_use]
    pub fn alias(self, alias: impl Into<String>) -> Self {
        Self { kind: ExprKind::Alias { inner: Box::new(self), alias: alias.into() }, has_parens: false }
    }

    #[must_use]
    pub fn filter_where(self, conditions: Vec<Expr>) -> Self {
        Self { kind: ExprKind::Filter { inner: Box::new(self), conditions }, has_parens: false }
    }

    /// Unwraps a trailing `.asc()`/`.desc()` postfix, recovering the
    /// underlying expression and its direction. A bare expression (no
    /// postfix) defaults to ascending, matching seek's `>` default.
    #[must_use]
    pub fn order_direction(&self) -> (Expr, SeekDirection) {
        if let ExprKind::UnaryPostfix { operand, op } = &self.kind {
            match op {
                Operator::Asc => return (operand.as_ref().clone(), SeekDirection::Ascending),
                Operator::Desc => return (operand.as_ref().clone(), SeekDirection::Descending),
                _ => {}
            }
        }
        (self.clone(), SeekDirection::Ascending)
    }
}

impl Renderable for Expr {
    fn render(&self, builder: &mut Builder) {
        if self.has_parens {
            builder.print("(");
        }
        match &self.kind {
            ExprKind::Keyword(s) => builder.print(s),
            ExprKind::Literal(v) => builder.render_literal(v),
            ExprKind::ExpressionArray(exprs) => builder.render_expression_array(exprs),
            ExprKind::Subquery(selectable) => selectable.render(builder),
            ExprKind::Field(f) => f.render(builder),
            ExprKind::Function { name, args } => {
                builder.print(name);
                builder.print("(");
                builder.render_expressions(args);
                builder.print(")");
            }
            ExprKind::Overlay { source, replacing, from, for_len } => {
                builder.print("OVERLAY(");
                builder.render_expression(source.as_ref());
                builder.print(" PLACING ");
                builder.render_expression(replacing.as_ref());
                builder.print(" FROM ");
                builder.render_expression(from.as_ref());
                if let Some(len) = for_len {
                    builder.print(" FOR ");
                    builder.render_expression(len.as_ref());
                }
                builder.print(")");
            }
            ExprKind::UnaryPrefix { op, operand } => {
                builder.print(op.as_sql());
                builder.print(" ");
                builder.render_expression(operand.as_ref());
            }
            ExprKind::UnaryPostfix { operand, op } => {
                builder.render_expression(operand.as_ref());
                builder.print(" ");
                builder.print(op.as_sql());
            }
            ExprKind::Binary { lhs, op, rhs } => {
                builder.render_expression(lhs.as_ref());
                builder.print(" ");
                builder.print(op.as_sql());
                builder.print(" ");
                builder.render_expression(rhs.as_ref());
            }
            ExprKind::Multigrade { op, exprs } => {
                for (i, e) in exprs.iter().enumerate() {
                    if i > 0 {
                        builder.print(" ");
                        builder.print(op.as_sql());
                        builder.print(" ");
                    }
                    builder.render_expression(e);
                }
            }
            ExprKind::Alias { inner, alias } => {
                builder.render_expression(inner.as_ref());
                builder.print(" AS \"");
                builder.print(alias);
                builder.print("\"");
            }
            ExprKind::Filter { inner, conditions } => {
                builder.render_expression(inner.as_ref());
                builder.print(" FILTER (WHERE ");
                builder.render_conditions(conditions);
                builder.print(")");
            }
        }
        if self.has_parens {
            builder.print(")");
        }
    }
}

fn in_values<T: IntoSqlValue>(lhs: Expr, values: Vec<T>, op: Operator) -> BoolExpr {
    let exprs = values.into_iter().map(|v| Expr::literal(v.into_sql_value())).collect();
    BoolExpr::from_expr(Expr::binary(lhs, op, Expr::expression_array(exprs)))
}

macro_rules! typed_expr {
    ($name:ident) => {
        #[derive(Clone)]
        pub struct $name(Expr);

        impl TypedExpr for $name {
            fn from_expr(e: Expr) -> Self {
                Self(e)
            }

            fn into_expr(self) -> Expr {
                self.0
            }
        }

        impl From<$name> for Expr {
            fn from(v: $name) -> Expr {
                v.0
            }
        }
    };
}

typed_expr!(BoolExpr);
typed_expr!(NumericExpr);
typed_expr!(StringExpr);
typed_expr!(DateTimeExpr);
typed_expr!(UuidExpr);

impl BoolExpr {
    #[must_use]
    pub fn field(table: &Table, name: impl Into<String>) -> Self {
        Self::from_expr(Expr::field(FieldRef::new(table, name)))
    }

    #[must_use]
    pub fn eq(self, rhs: impl BoolOperand) -> BoolExpr {
        BoolExpr::from_expr(Expr::binary(self.0, Operator::Eq, rhs.into_operand_expr()))
    }

    #[must_use]
    pub fn not_eq(self, rhs: impl BoolOperand) -> BoolExpr {
        BoolExpr::from_expr(Expr::binary(self.0, Operator::NotEq, rhs.into_operand_expr()))
    }

    #[must_use]
    pub fn and(self, rhs: BoolExpr) -> BoolExpr {
        BoolExpr::from_expr(Expr::binary_paren(self.0, Operator::And, rhs.0))
    }

    #[must_use]
    pub fn or(self, rhs: BoolExpr) -> BoolExpr {
        BoolExpr::from_expr(Expr::binary_paren(self.0, Operator::Or, rhs.0))
    }

    #[must_use]
    pub fn not(self) -> BoolExpr {
        BoolExpr::from_expr(Expr::unary_prefix(self.0, Operator::Not))
    }

    #[must_use]
    pub fn is_in(self, values: Vec<bool>) -> BoolExpr {
        in_values(self.0, values, Operator::In)
    }

    #[must_use]
    pub fn is_not_in(self, values: Vec<bool>) -> BoolExpr {
        in_values(self.0, values, Operator::NotIn)
    }
}

/// Multigrade `And(a, b, c, …)`: a single flat node, one enclosing pair of
/// parentheses, distinct from chained infix `.and` (each call parenthesizes).
#[must_use]
pub fn and(exprs: Vec<BoolExpr>) -> BoolExpr {
    BoolExpr::from_expr(Expr::multigrade(Operator::And, exprs.into_iter().map(TypedExpr::into_expr).collect()))
}

/// Multigrade `Or(a, b, c, …)`.
#[must_use]
pub fn or(exprs: Vec<BoolExpr>) -> BoolExpr {
    BoolExpr::from_expr(Expr::multigrade(Operator::Or, exprs.into_iter().map(TypedExpr::into_expr).collect()))
}

impl NumericExpr {
    #[must_use]
    pub fn field(table: &Table, name: impl Into<String>) -> Self {
        Self::from_expr(Expr::field(FieldRef::new(table, name)))
    }

    #[must_use]
    pub fn lt(self, rhs: impl NumericOperand) -> BoolExpr {
        BoolExpr::from_expr(Expr::binary(self.0, Operator::Lt, rhs.into_operand_expr()))
    }

    #[must_use]
    pub fn lte(self, rhs: impl NumericOperand) -> BoolExpr {
        BoolExpr::from_expr(Expr::binary(self.0, Operator::Lte, rhs.into_operand_expr()))
    }

    #[must_use]
    pub fn gt(self, rhs: impl NumericOperand) -> BoolExpr {
        BoolExpr::from_expr(Expr::binary(self.0, Operator::Gt, rhs.into_operand_expr()))
    }

    #[must_use]
    pub fn gte(self, rhs: impl NumericOperand) -> BoolExpr {
        BoolExpr::from_expr(Expr::binary(self.0, Operator::Gte, rhs.into_operand_expr()))
    }

    #[must_use]
    pub fn eq(self, rhs: impl NumericOperand) -> BoolExpr {
        BoolExpr::from_expr(Expr::binary(self.0, Operator::Eq, rhs.into_operand_expr()))
    }

    #[must_use]
    pub fn not_eq(self, rhs: impl NumericOperand) -> BoolExpr {
        BoolExpr::from_expr(Expr::binary(self.0, Operator::NotEq, rhs.into_operand_expr()))
    }

    #[must_use]
    pub fn add(self, rhs: impl NumericOperand) -> NumericExpr {
        NumericExpr::from_expr(Expr::binary(self.0, Operator::Add, rhs.into_operand_expr()))
    }

    #[must_use]
    pub fn sub(self, rhs: impl NumericOperand) -> NumericExpr {
        NumericExpr::from_expr(Expr::binary(self.0, Operator::Sub, rhs.into_operand_expr()))
    }

    #[must_use]
    pub fn mult(self, rhs: impl NumericOperand) -> NumericExpr {
        NumericExpr::from_expr(Expr::binary(self.0, Operator::Mult, rhs.into_operand_expr()))
    }

    #[must_use]
    pub fn div(self, rhs: impl NumericOperand) -> NumericExpr {
        NumericExpr::from_expr(Expr::binary(self.0, Operator::Div, rhs.into_operand_expr()))
    }

    #[must_use]
    pub fn sqrt(self) -> NumericExpr {
        NumericExpr::from_expr(Expr::unary_prefix(self.0, Operator::Sqrt))
    }

    #[must_use]
    pub fn is_in(self, values: Vec<f64>) -> BoolExpr {
        in_values(self.0, values, Operator::In)
    }

    #[must_use]
    pub fn is_not_in(self, values: Vec<f64>) -> BoolExpr {
        in_values(self.0, values, Operator::NotIn)
    }
}

impl StringExpr {
    #[must_use]
    pub fn field(table: &Table, name: impl Into<String>) -> Self {
        Self::from_expr(Expr::field(FieldRef::new(table, name)))
    }

    #[must_use]
    pub fn eq(self, rhs: impl StringOperand) -> BoolExpr {
        BoolExpr::from_expr(Expr::binary(self.0, Operator::Eq, rhs.into_operand_expr()))
    }

    #[must_use]
    pub fn not_eq(self, rhs: impl StringOperand) -> BoolExpr {
        BoolExpr::from_expr(Expr::binary(self.0, Operator::NotEq, rhs.into_operand_expr()))
    }

    #[must_use]
    pub fn like(self, rhs: impl StringOperand) -> BoolExpr {
        BoolExpr::from_expr(Expr::binary(self.0, Operator::Like, rhs.into_operand_expr()))
    }

    #[must_use]
    pub fn ilike(self, rhs: impl StringOperand) -> BoolExpr {
        BoolExpr::from_expr(Expr::binary(self.0, Operator::ILike, rhs.into_operand_expr()))
    }

    #[must_use]
    pub fn is_in(self, values: Vec<String>) -> BoolExpr {
        in_values(self.0, values, Operator::In)
    }

    #[must_use]
    pub fn is_not_in(self, values: Vec<String>) -> BoolExpr {
        in_values(self.0, values, Operator::NotIn)
    }
}

impl DateTimeExpr {
    #[must_use]
    pub fn field(table: &Table, name: impl Into<String>) -> Self {
        Self::from_expr(Expr::field(FieldRef::new(table, name)))
    }

    #[must_use]
    pub fn lt(self, rhs: impl DateTimeOperand) -> BoolExpr {
        BoolExpr::from_expr(Expr::binary(self.0, Operator::Lt, rhs.into_operand_expr()))
    }

    #[must_use]
    pub fn lte(self, rhs: impl DateTimeOperand) -> BoolExpr {
        BoolExpr::from_expr(Expr::binary(self.0, Operator::Lte, rhs.into_operand_expr()))
    }

    #[must_use]
    pub fn gt(self, rhs: impl DateTimeOperand) -> BoolExpr {
        BoolExpr::from_expr(Expr::binary(self.0, Operator::Gt, rhs.into_operand_expr()))
    }

    #[must_use]
    pub fn gte(self, rhs: impl DateTimeOperand) -> BoolExpr {
        BoolExpr::from_expr(Expr::binary(self.0, Operator::Gte, rhs.into_operand_expr()))
    }

    #[must_use]
    pub fn eq(self, rhs: impl DateTimeOperand) -> BoolExpr {
        BoolExpr::from_expr(Expr::binary(self.0, Operator::Eq, rhs.into_operand_expr()))
    }

    #[must_use]
    pub fn not_eq(self, rhs: impl DateTimeOperand) -> BoolExpr {
        BoolExpr::from_expr(Expr::binary(self.0, Operator::NotEq, rhs.into_operand_expr()))
    }

    #[must_use]
    pub fn add(self, rhs: impl DateTimeOperand) -> DateTimeExpr {
        DateTimeExpr::from_expr(Expr::binary(self.0, Operator::Add, rhs.into_operand_expr()))
    }

    #[must_use]
    pub fn sub(self, rhs: impl DateTimeOperand) -> DateTimeExpr {
        DateTimeExpr::from_expr(Expr::binary(self.0, Operator::Sub, rhs.into_operand_expr()))
    }

    #[must_use]
    pub fn mult(self, rhs: impl DateTimeOperand) -> DateTimeExpr {
        DateTimeExpr::from_expr(Expr::binary(self.0, Operator::Mult, rhs.into_operand_expr()))
    }

    #[must_use]
    pub fn div(self, rhs: impl DateTimeOperand) -> DateTimeExpr {
        DateTimeExpr::from_expr(Expr::binary(self.0, Operator::Div, rhs.into_operand_expr()))
    }

    #[must_use]
    pub fn is_in(self, values: Vec<DateTime<Utc>>) -> BoolExpr {
        in_values(self.0, values, Operator::In)
    }

    #[must_use]
    pub fn is_not_in(self, values: Vec<DateTime<Utc>>) -> BoolExpr {
        in_values(self.0, values, Operator::NotIn)
    }
}

impl UuidExpr {
    #[must_use]
    pub fn field(table: &Table, name: impl Into<String>) -> Self {
        Self::from_expr(Expr::field(FieldRef::new(table, name)))
    }

    #[must_use]
    pub fn eq(self, rhs: impl UuidOperand) -> BoolExpr {
        BoolExpr::from_expr(Expr::binary(self.0, Operator::Eq, rhs.into_operand_expr()))
    }

    #[must_use]
    pub fn not_eq(self, rhs: impl UuidOperand) -> BoolExpr {
        BoolExpr::from_expr(Expr::binary(self.0, Operator::NotEq, rhs.into_operand_expr()))
    }

    #[must_use]
    pub fn is_in(self, values: Vec<Uuid>) -> BoolExpr {
        in_values(self.0, values, Operator::In)
    }

    #[must_use]
    pub fn is_not_in(self, values: Vec<Uuid>) -> BoolExpr {
        in_values(self.0, values, Operator::NotIn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;
    use crate::dialect::Dialect;

    fn render(e: &Expr) -> (String, Vec<SqlValue>) {
        let mut b = Builder::new(Dialect::Postgres);
        b.render_expression(e);
        b.finish()
    }

    #[test]
    fn field_equals_literal_renders_qualified_placeholder() {
        let t = Table::new("table1");
        let col = StringExpr::field(&t, "column1");
        let (sql, args) = render(&col.eq("foo").into_expr());
        assert_eq!(sql, "\"table1\".column1 = $1");
        assert_eq!(args, vec![SqlValue::Text("foo".into())]);
    }

    #[test]
    fn infix_and_or_each_parenthesize() {
        let t = Table::new("t");
        let active = BoolExpr::field(&t, "active").eq(true);
        let age = NumericExpr::field(&t, "age").gt(21.0);
        let verified = BoolExpr::field(&t, "verified").eq(true);
        let combined = active.and(age.or(verified));
        let (sql, _) = render(&combined.into_expr());
        assert_eq!(sql, "(\"t\".active = $1 AND (\"t\".age > $2 OR \"t\".verified = $3))");
    }

    #[test]
    fn multigrade_and_produces_single_enclosing_pair() {
        let t = Table::new("t");
        let a = BoolExpr::field(&t, "a").eq(true);
        let b = BoolExpr::field(&t, "b").eq(true);
        let c = BoolExpr::field(&t, "c").eq(true);
        let (sql, _) = render(&and(vec![a, b, c]).into_expr());
        assert_eq!(sql, "(\"t\".a = $1 AND \"t\".b = $2 AND \"t\".c = $3)");
    }

    #[test]
    fn is_null_renders_unary_postfix() {
        let t = Table::new("t");
        let (sql, args) = render(&StringExpr::field(&t, "middle_name").is_null().into_expr());
        assert_eq!(sql, "\"t\".middle_name IS NULL");
        assert!(args.is_empty());
    }

    #[test]
    fn expression_alias_is_always_quoted() {
        let e = Expr::function("COUNT", vec![Expr::asterisk()]).alias("total");
        let (sql, _) = render(&e);
        assert_eq!(sql, "COUNT(*) AS \"total\"");
    }
}
