//! Staged SELECT builder. `FROM` is the single compile-time gate: every
//! other clause method only appears once a source has been chosen.

use std::marker::PhantomData;
use std::rc::Rc;

use crate::builder::{Builder, Renderable};
use crate::dialect::Dialect;
use crate::exec::{Built, Fetch};
use crate::expr::{Expr, Operator, SeekDirection};
use crate::schema::Selectable;
use crate::value::SqlValue;

/// `FOR UPDATE` / `FOR NO KEY UPDATE` / `FOR SHARE` / `FOR KEY SHARE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockingType {
    Update,
    NoKeyUpdate,
    Share,
    KeyShare,
}

impl LockingType {
    fn as_sql(self) -> &'static str {
        match self {
            Self::Update => "FOR UPDATE",
            Self::NoKeyUpdate => "FOR NO KEY UPDATE",
            Self::Share => "FOR SHARE",
            Self::KeyShare => "FOR KEY SHARE",
        }
    }
}

/// `NOWAIT` / `SKIP LOCKED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockingOption {
    NoWait,
    SkipLocked,
}

impl LockingOption {
    fn as_sql(self) -> &'static str {
        match self {
            Self::NoWait => "NOWAIT",
            Self::SkipLocked => "SKIP LOCKED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Join,
    LeftOuterJoin,
}

pub struct JoinClause {
    target: Box<dyn Selectable>,
    kind: JoinType,
    conditions: Vec<Expr>,
}

#[derive(Default)]
struct SelectCore {
    cte: Option<(String, Rc<dyn Renderable>)>,
    distinct: bool,
    distinct_on: Vec<Expr>,
    projections: Vec<Expr>,
    from: Option<Box<dyn Selectable>>,
    joins: Vec<JoinClause>,
    where_conditions: Vec<Expr>,
    group_by: Vec<Expr>,
    having: Vec<Expr>,
    unions: Vec<SelectCore>,
    order_by: Vec<Expr>,
    seek_predicate: Option<Expr>,
    limit: Option<i64>,
    offset: Option<i64>,
    locking: Option<(LockingType, Option<LockingOption>)>,
    alias: Option<String>,
}

/// Marker: no `FROM` source has been chosen yet.
pub struct NoFrom;
/// Marker: a `FROM` source has been chosen; the rest of the grammar is
/// available.
pub struct HasFrom;

pub struct Select<Stage = NoFrom> {
    core: SelectCore,
    _stage: PhantomData<Stage>,
}

impl Select<NoFrom> {
    /// `Select(projections…)`; an empty list renders `*`.
    #[must_use]
    pub fn new(projections: Vec<Expr>) -> Self {
        Self { core: SelectCore { projections, ..SelectCore::default() }, _stage: PhantomData }
    }

    /// `SelectCount()`, equivalent to `Select(Count(*))`.
    #[must_use]
    pub fn count() -> Self {
        Self::new(vec![Expr::function("COUNT", vec![Expr::asterisk()])])
    }

    /// A single `WITH alias AS (subquery)` clause.
    #[must_use]
    pub fn with_cte(mut self, alias: impl Into<String>, subquery: Rc<dyn Renderable>) -> Self {
        self.core.cte = Some((alias.into(), subquery));
        self
    }

    #[must_use]
    pub fn distinct(mut self) -> Self {
        self.core.distinct = true;
        self
    }

    #[must_use]
    pub fn distinct_on(mut self, exprs: Vec<Expr>) -> Self {
        self.core.distinct_on = exprs;
        self
    }

    #[must_use]
    pub fn from(self, source: Box<dyn Selectable>) -> Select<HasFrom> {
        Select {
            core: SelectCore { from: Some(source), ..self.core },
            _stage: PhantomData,
        }
    }
}

impl Select<HasFrom> {
    #[must_use]
    pub fn join(mut self, target: Box<dyn Selectable>, conditions: Vec<Expr>) -> Self {
        self.core.joins.push(JoinClause { target, kind: JoinType::Join, conditions });
        self
    }

    #[must_use]
    pub fn left_outer_join(mut self, target: Box<dyn Selectable>, conditions: Vec<Expr>) -> Self {
        self.core.joins.push(JoinClause { target, kind: JoinType::LeftOuterJoin, conditions });
        self
    }

    #[must_use]
    pub fn where_clause(mut self, conditions: Vec<Expr>) -> Self {
        self.core.where_conditions.extend(conditions);
        self
    }

    #[must_use]
    pub fn group_by(mut self, exprs: Vec<Expr>) -> Self {
        self.core.group_by = exprs;
        self
    }

    #[must_use]
    pub fn having(mut self, conditions: Vec<Expr>) -> Self {
        self.core.having = conditions;
        self
    }

    #[must_use]
    pub fn union(mut self, other: Select<HasFrom>) -> Self {
        self.core.unions.push(other.core);
        self
    }

    #[must_use]
    pub fn order_by(mut self, exprs: Vec<Expr>) -> Self {
        self.core.order_by = exprs;
        self
    }

    /// Keyset seek: `seek(v1, …, vK)` must follow `order_by(o1, …, oK)`.
    /// Fewer seek values than ORDER BY entries is a programming error.
    /// Extra seek values beyond the ORDER BY arity are ignored.
    #[must_use]
    pub fn seek(mut self, values: Vec<SqlValue>) -> Self {
        assert!(
            values.len() >= self.core.order_by.len(),
            "seek requires at least as many values as ORDER BY entries"
        );
        let mut disjuncts = Vec::with_capacity(self.core.order_by.len());
        for i in 0..self.core.order_by.len() {
            let mut conjuncts = Vec::with_capacity(i + 1);
            for (j, order_expr) in self.core.order_by.iter().enumerate().take(i) {
                let (base, _) = order_expr.order_direction();
                conjuncts.push(Expr::binary(base, Operator::Eq, Expr::literal(values[j].clone())));
            }
            let (base_i, direction) = self.core.order_by[i].order_direction();
            let op = match direction {
                SeekDirection::Descending => Operator::Lt,
                SeekDirection::Ascending => Operator::Gt,
            };
            conjuncts.push(Expr::binary(base_i, op, Expr::literal(values[i].clone())));
            disjuncts.push(Expr::multigrade(Operator::And, conjuncts));
        }
        self.core.seek_predicate = Some(Expr::multigrade(Operator::Or, disjuncts));
        self
    }

    #[must_use]
    pub fn limit(mut self, n: i64) -> Self {
        self.core.limit = Some(n);
        self
    }

    #[must_use]
    pub fn offset(mut self, n: i64) -> Self {
        self.core.offset = Some(n);
        self
    }

    #[must_use]
    pub fn locking(mut self, kind: LockingType, option: Option<LockingOption>) -> Self {
        self.core.locking = Some((kind, option));
        self
    }

    /// Aliases this select for use as a derived table: `(SELECT …) AS
    /// "alias"`.
    #[must_use]
    pub fn as_(mut self, alias: impl Into<String>) -> Self {
        self.core.alias = Some(alias.into());
        self
    }

    #[must_use]
    pub fn build(self) -> (String, Vec<SqlValue>) {
        let mut builder = Builder::new(Dialect::Postgres);
        self.core.render(&mut builder);
        builder.finish()
    }
}

impl SelectCore {
    fn render(&self, builder: &mut Builder) {
        let outer_alias = self.alias.as_deref();
        if outer_alias.is_some() {
            builder.print("(");
        }
        if let Some((alias, subquery)) = &self.cte {
            builder.print("WITH \"");
            builder.print(alias);
            builder.print("\" AS (");
            subquery.render(builder);
            builder.print(") ");
        }
        builder.print("SELECT");
        if self.distinct {
            builder.print(" DISTINCT");
        } else if !self.distinct_on.is_empty() {
            builder.print(" DISTINCT ON ");
            builder.render_expression_array(&self.distinct_on);
        }
        builder.print(" ");
        builder.render_projections(&self.projections);
        if let Some(from) = &self.from {
            builder.print(" FROM ");
            from.render(builder);
        }
        for join in &self.joins {
            match join.kind {
                JoinType::Join => builder.print(" JOIN "),
                JoinType::LeftOuterJoin => builder.print(" LEFT OUTER JOIN "),
            }
            join.target.render(builder);
            builder.print(" ON ");
            builder.render_conditions(&join.conditions);
        }
        let mut where_conditions = self.where_conditions.clone();
        if let Some(seek) = &self.seek_predicate {
            where_conditions.push(seek.clone());
        }
        if !where_conditions.is_empty() {
            builder.print(" WHERE ");
            builder.render_conditions(&where_conditions);
        }
        if !self.group_by.is_empty() {
            builder.print(" GROUP BY ");
            builder.render_expressions(&self.group_by);
        }
        if !self.having.is_empty() {
            builder.print(" HAVING ");
            builder.render_conditions(&self.having);
        }
        for union in &self.unions {
            builder.print(" UNION (");
            union.render(builder);
            builder.print(")");
        }
        if !self.order_by.is_empty() {
            builder.print(" ORDER BY ");
            builder.render_expressions(&self.order_by);
        }
        if let Some(limit) = self.limit {
            builder.print(&format!(" LIMIT {limit}"));
        }
        if let Some(offset) = self.offset {
            builder.print(&format!(" OFFSET {offset}"));
        }
        if let Some((kind, option)) = &self.locking {
            builder.print(" ");
            builder.print(kind.as_sql());
            if let Some(option) = option {
                builder.print(" ");
                builder.print(option.as_sql());
            }
        }
        if let Some(alias) = outer_alias {
            builder.print(") AS \"");
            builder.print(alias);
            builder.print("\"");
        }
    }
}

impl Renderable for Select<HasFrom> {
    fn render(&self, builder: &mut Builder) {
        self.core.render(builder);
    }
}

impl Selectable for Select<HasFrom> {
    fn selectable_alias(&self) -> Option<&str> {
        self.core.alias.as_deref()
    }
}

impl Fetch for Select<HasFrom> {
    fn into_built(self) -> Built {
        let (sql, params) = self.build();
        Built::new(sql, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{ExprOps, NumericExpr, StringExpr};
    use crate::schema::Table;

    #[test]
    fn select_count_from_table() {
        let table1 = Table::new("table1");
        let (sql, args) = Select::count().from(Box::new(table1)).build();
        assert_eq!(sql, "SELECT COUNT(*) FROM public.table1");
        assert!(args.is_empty());
    }

    #[test]
    fn left_outer_join_on_aliased_subquery() {
        let table1 = Table::new("table1");
        let boo = Select::new(vec![StringExpr::field(&table1, "column1").into_expr()])
            .from(Box::new(table1.clone()))
            .as_("boo");
        let (sql, _) = Select::new(vec![])
            .from(Box::new(table1.clone()))
            .left_outer_join(
                Box::new(boo),
                vec![
                    StringExpr::field(&Table::new("boo"), "column1")
                        .eq(StringExpr::field(&table1, "column1"))
                        .into_expr(),
                ],
            )
            .build();
        assert_eq!(
            sql,
            "SELECT * FROM public.table1 LEFT OUTER JOIN (SELECT \"table1\".column1 FROM public.table1) AS \"boo\" ON \"boo\".column1 = \"table1\".column1"
        );
    }

    #[test]
    fn keyset_seek_builds_disjunction_of_and_chains() {
        let t = Table::new("t");
        let (sql, args) = Select::new(vec![])
            .from(Box::new(t.clone()))
            .order_by(vec![
                NumericExpr::field(&t, "c1").desc(),
                NumericExpr::field(&t, "c2").desc(),
            ])
            .seek(vec![SqlValue::Text("a".into()), SqlValue::Text("b".into())])
            .limit(10)
            .build();
        assert_eq!(
            sql,
            "SELECT * FROM public.t WHERE ((\"t\".c1 < $1) OR (\"t\".c1 = $2 AND \"t\".c2 < $3)) LIMIT 10"
        );
        assert_eq!(
            args,
            vec![
                SqlValue::Text("a".into()),
                SqlValue::Text("a".into()),
                SqlValue::Text("b".into()),
            ]
        );
    }
}
