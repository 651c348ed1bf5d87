//! Built-in SQL functions (C5): aggregates, string functions, datetime
//! truncation, comparison-function forms, and advisory locks.

use crate::expr::{BoolExpr, DateTimeExpr, Expr, NumericExpr, Operator, StringExpr, TypedExpr};

fn call1(name: &str, a: impl Into<Expr>) -> Expr {
    Expr::function(name, vec![a.into()])
}

fn call2(name: &str, a: impl Into<Expr>, b: impl Into<Expr>) -> Expr {
    Expr::function(name, vec![a.into(), b.into()])
}

fn call3(name: &str, a: impl Into<Expr>, b: impl Into<Expr>, c: impl Into<Expr>) -> Expr {
    Expr::function(name, vec![a.into(), b.into(), c.into()])
}

/// `COUNT(expr)`; `count(*)` is spelled `count(Expr::asterisk())`.
#[must_use]
pub fn count(e: impl Into<Expr>) -> NumericExpr {
    NumericExpr::from_expr(call1("COUNT", e))
}

#[must_use]
pub fn coalesce(first: impl Into<Expr>, rest: Vec<Expr>) -> Expr {
    let mut args = vec![first.into()];
    args.extend(rest);
    Expr::function("COALESCE", args)
}

#[must_use]
pub fn null_if(a: impl Into<Expr>, b: impl Into<Expr>) -> Expr {
    call2("NULLIF", a, b)
}

#[must_use]
pub fn greatest(first: impl Into<Expr>, rest: Vec<Expr>) -> Expr {
    let mut args = vec![first.into()];
    args.extend(rest);
    Expr::function("GREATEST", args)
}

#[must_use]
pub fn least(first: impl Into<Expr>, rest: Vec<Expr>) -> Expr {
    let mut args = vec![first.into()];
    args.extend(rest);
    Expr::function("LEAST", args)
}

/// `DISTINCT(e)`.
#[must_use]
pub fn distinct(e: impl Into<Expr>) -> Expr {
    call1("DISTINCT", e)
}

/// `DATE_TRUNC('field', timestamp)`.
#[must_use]
pub fn date_trunc(field: &str, timestamp: impl Into<Expr>) -> DateTimeExpr {
    DateTimeExpr::from_expr(call2("DATE_TRUNC", Expr::string(field), timestamp))
}

// -- string family --------------------------------------------------------

macro_rules! string_fn1 {
    ($rust_name:ident, $sql_name:literal) => {
        #[must_use]
        pub fn $rust_name(a: impl Into<Expr>) -> StringExpr {
            StringExpr::from_expr(call1($sql_name, a))
        }
    };
}

macro_rules! string_fn2 {
    ($rust_name:ident, $sql_name:literal) => {
        #[must_use]
        pub fn $rust_name(a: impl Into<Expr>, b: impl Into<Expr>) -> StringExpr {
            StringExpr::from_expr(call2($sql_name, a, b))
        }
    };
}

string_fn1!(ascii, "ASCII");
string_fn1!(btrim, "BTRIM");
string_fn1!(ltrim, "LTRIM");
string_fn1!(rtrim, "RTRIM");
string_fn1!(chr, "CHR");
string_fn1!(init_cap, "INITCAP");
string_fn1!(md5, "MD5");
string_fn1!(pg_client_encoding, "PG_CLIENT_ENCODING");
string_fn1!(quote_ident, "QUOTE_IDENT");
string_fn1!(quote_literal, "QUOTE_LITERAL");
string_fn1!(quote_nullable, "QUOTE_NULLABLE");
string_fn1!(reverse, "REVERSE");
string_fn1!(to_ascii, "TO_ASCII");
string_fn1!(to_hex, "TO_HEX");

string_fn2!(left, "LEFT");
string_fn2!(right, "RIGHT");
string_fn2!(lpad, "LPAD");
string_fn2!(rpad, "RPAD");
string_fn2!(repeat, "REPEAT");
string_fn2!(strpos, "STRPOS");

#[must_use]
pub fn concat(first: impl Into<Expr>, rest: Vec<Expr>) -> StringExpr {
    let mut args = vec![first.into()];
    args.extend(rest);
    StringExpr::from_expr(Expr::function("CONCAT", args))
}

#[must_use]
pub fn concat_ws(separator: impl Into<Expr>, rest: Vec<Expr>) -> StringExpr {
    let mut args = vec![separator.into()];
    args.extend(rest);
    StringExpr::from_expr(Expr::function("CONCAT_WS", args))
}

#[must_use]
pub fn format(fmt: impl Into<Expr>, rest: Vec<Expr>) -> StringExpr {
    let mut args = vec![fmt.into()];
    args.extend(rest);
    StringExpr::from_expr(Expr::function("FORMAT", args))
}

#[must_use]
pub fn length(a: impl Into<Expr>) -> NumericExpr {
    NumericExpr::from_expr(call1("LENGTH", a))
}

#[must_use]
pub fn replace(source: impl Into<Expr>, from: impl Into<Expr>, to: impl Into<Expr>) -> StringExpr {
    StringExpr::from_expr(call3("REPLACE", source, from, to))
}

#[must_use]
pub fn split_part(source: impl Into<Expr>, delimiter: impl Into<Expr>, field: impl Into<Expr>) -> StringExpr {
    StringExpr::from_expr(call3("SPLIT_PART", source, delimiter, field))
}

#[must_use]
pub fn substr(source: impl Into<Expr>, from: impl Into<Expr>, count: impl Into<Expr>) -> StringExpr {
    StringExpr::from_expr(call3("SUBSTR", source, from, count))
}

#[must_use]
pub fn translate(source: impl Into<Expr>, from: impl Into<Expr>, to: impl Into<Expr>) -> StringExpr {
    StringExpr::from_expr(call3("TRANSLATE", source, from, to))
}

#[must_use]
pub fn starts_with(source: impl Into<Expr>, prefix: impl Into<Expr>) -> BoolExpr {
    BoolExpr::from_expr(call2("STARTS_WITH", source, prefix))
}

/// `OVERLAY(source PLACING replacement FROM pos [FOR len])`.
#[must_use]
pub fn overlay(source: impl Into<Expr>, replacing: impl Into<Expr>, from: impl Into<Expr>, for_len: Option<Expr>) -> StringExpr {
    StringExpr::from_expr(Expr::overlay(source.into(), replacing.into(), from.into(), for_len))
}

// -- comparison function forms: same semantics as the typed methods, ------
// -- infix-operator surface syntax instead of method-call syntax ---------

fn compare(op: Operator, a: impl Into<Expr>, b: impl Into<Expr>) -> BoolExpr {
    BoolExpr::from_expr(Expr::binary(a.into(), op, b.into()))
}

#[must_use]
pub fn less_than(a: impl Into<Expr>, b: impl Into<Expr>) -> BoolExpr {
    compare(Operator::Lt, a, b)
}

#[must_use]
pub fn less_than_or_equal(a: impl Into<Expr>, b: impl Into<Expr>) -> BoolExpr {
    compare(Operator::Lte, a, b)
}

#[must_use]
pub fn greater_than(a: impl Into<Expr>, b: impl Into<Expr>) -> BoolExpr {
    compare(Operator::Gt, a, b)
}

#[must_use]
pub fn greater_than_or_equal(a: impl Into<Expr>, b: impl Into<Expr>) -> BoolExpr {
    compare(Operator::Gte, a, b)
}

#[must_use]
pub fn equal(a: impl Into<Expr>, b: impl Into<Expr>) -> BoolExpr {
    compare(Operator::Eq, a, b)
}

#[must_use]
pub fn not_equal(a: impl Into<Expr>, b: impl Into<Expr>) -> BoolExpr {
    compare(Operator::NotEq, a, b)
}

// -- advisory locks --------------------------------------------------------

#[must_use]
pub fn try_advisory_lock(n: impl Into<Expr>) -> BoolExpr {
    BoolExpr::from_expr(call1("pg_try_advisory_lock", n))
}

#[must_use]
pub fn release_advisory_lock(n: impl Into<Expr>) -> BoolExpr {
    BoolExpr::from_expr(call1("pg_advisory_unlock", n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{Builder, Renderable};
    use crate::dialect::Dialect;

    fn render(e: &Expr) -> String {
        let mut b = Builder::new(Dialect::Postgres);
        e.render(&mut b);
        b.finish().0
    }

    #[test]
    fn count_asterisk_renders_count_star() {
        let (sql, _) = {
            let mut b = Builder::new(Dialect::Postgres);
            b.render_expression(&count(Expr::asterisk()).into_expr());
            b.finish()
        };
        assert_eq!(sql, "COUNT(*)");
    }

    #[test]
    fn date_trunc_quotes_its_field_literal() {
        let (sql, args) = {
            let mut b = Builder::new(Dialect::Postgres);
            b.render_expression(&date_trunc("hour", Expr::datetime(chrono::Utc::now())).into_expr());
            b.finish()
        };
        assert_eq!(sql, "DATE_TRUNC($1, $2)");
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn overlay_renders_placing_from_syntax() {
        let e = overlay(Expr::string("hello"), Expr::string("XX"), Expr::int64(2), None);
        assert_eq!(render(&e.into_expr()), "OVERLAY($1 PLACING $2 FROM $3)");
    }

    #[test]
    fn comparison_function_form_matches_method_form() {
        let sql = render(&greater_than(Expr::int64(3), Expr::int64(1)).into_expr());
        assert_eq!(sql, "$1 > $2");
    }
}
