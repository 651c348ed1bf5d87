use crate::dialect::Dialect;
use crate::schema::SetPredicate;
use crate::value::SqlValue;

/// Anything that knows how to write itself into a [`Builder`].
///
/// Implemented by [`crate::expr::Expr`] and by every `Selectable` (tables,
/// aliased subqueries), so the same `render_expression`/`render` call site
/// works whether the operand is a field, a literal, a join target, or a
/// nested select.
pub trait Renderable {
    fn render(&self, builder: &mut Builder);
}

/// Accumulates SQL text and the positional argument vector for a single
/// statement render. One `Builder` is created per `Render` call and
/// consumed by it; it is never shared across renders.
pub struct Builder {
    dialect: Dialect,
    debug: bool,
    buffer: String,
    arguments: Vec<SqlValue>,
    errors: Vec<String>,
}

impl Builder {
    #[must_use]
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            debug: false,
            buffer: String::new(),
            arguments: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// A builder that inlines literal values instead of parameterizing
    /// them. Exists for debugging/logging; never used by `build()`.
    #[must_use]
    pub fn debug(dialect: Dialect) -> Self {
        Self {
            debug: true,
            ..Self::new(dialect)
        }
    }

    #[must_use]
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn print(&mut self, s: &str) {
        self.buffer.push_str(s);
    }

    pub fn printf(&mut self, args: std::fmt::Arguments<'_>) {
        self.buffer.push_str(&args.to_string());
    }

    /// Report a non-fatal validation problem. Does not touch the argument
    /// vector and does not halt rendering.
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Dispatch to `e.render(self)`.
    pub fn render_expression<R: Renderable + ?Sized>(&mut self, e: &R) {
        e.render(self);
    }

    /// The sole point where a literal value becomes a placeholder (or,
    /// in debug mode, an inline textual representation).
    pub fn render_literal(&mut self, v: &SqlValue) {
        if self.debug {
            self.buffer.push_str(&v.to_sql_inline());
            return;
        }
        self.arguments.push(v.clone());
        let placeholder = self.dialect.placeholder(self.arguments.len());
        self.buffer.push_str(&placeholder);
    }

    /// `(e1, e2, …)`.
    pub fn render_expression_array<R: Renderable>(&mut self, exprs: &[R]) {
        self.print("(");
        for (i, e) in exprs.iter().enumerate() {
            if i > 0 {
                self.print(", ");
            }
            self.render_expression(e);
        }
        self.print(")");
    }

    /// `(name1, name2, …)` using unqualified names.
    pub fn render_field_array(&mut self, names: &[&str]) {
        self.print("(");
        self.print(&names.join(", "));
        self.print(")");
    }

    /// Joins expressions with ` AND `.
    pub fn render_conditions<R: Renderable>(&mut self, exprs: &[R]) {
        for (i, e) in exprs.iter().enumerate() {
            if i > 0 {
                self.print(" AND ");
            }
            self.render_expression(e);
        }
    }

    /// Joins expressions with `, `.
    pub fn render_expressions<R: Renderable>(&mut self, exprs: &[R]) {
        for (i, e) in exprs.iter().enumerate() {
            if i > 0 {
                self.print(", ");
            }
            self.render_expression(e);
        }
    }

    /// Joins selectables (projections) with `, `; empty means `*`.
    pub fn render_projections<R: Renderable>(&mut self, projections: &[R]) {
        if projections.is_empty() {
            self.print("*");
            return;
        }
        self.render_expressions(projections);
    }

    /// `unqualifiedName = <value>`, comma separated.
    pub fn render_set_predicates(&mut self, preds: &[SetPredicate]) {
        for (i, pred) in preds.iter().enumerate() {
            if i > 0 {
                self.print(", ");
            }
            self.print(&pred.field_name);
            self.print(" = ");
            self.render_expression(&pred.value);
        }
    }

    /// Consume the builder, returning the rendered SQL text and the
    /// ordered argument vector.
    #[must_use]
    pub fn finish(self) -> (String, Vec<SqlValue>) {
        (self.buffer, self.arguments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Expr;

    #[test]
    fn literal_parity_between_placeholders_and_arguments() {
        let mut b = Builder::new(Dialect::Postgres);
        b.render_literal(&SqlValue::Text("a".into()));
        b.print(", ");
        b.render_literal(&SqlValue::Text("b".into()));
        let (sql, args) = b.finish();
        assert_eq!(sql, "$1, $2");
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn debug_mode_inlines_literals() {
        let mut b = Builder::debug(Dialect::Postgres);
        b.render_literal(&SqlValue::Int(7));
        let (sql, args) = b.finish();
        assert_eq!(sql, "7");
        assert!(args.is_empty());
    }

    #[test]
    fn expression_array_renders_parenthesized_list() {
        let mut b = Builder::new(Dialect::Postgres);
        let exprs = vec![Expr::int64(1), Expr::int64(2)];
        b.render_expression_array(&exprs);
        let (sql, args) = b.finish();
        assert_eq!(sql, "($1, $2)");
        assert_eq!(args.len(), 2);
    }
}
