//! Per-class operand traits. Each typed comparison method (`eq`, `lt`, …)
//! accepts `impl XxxOperand` rather than a bare `Expr`, so a `StringExpr`
//! can never be compared against a `NumericExpr` — the compile-time
//! safety the expression algebra exists to provide.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{BoolExpr, DateTimeExpr, Expr, NumericExpr, StringExpr, TypedExpr, UuidExpr};

pub trait BoolOperand {
    fn into_operand_expr(self) -> Expr;
}

impl BoolOperand for BoolExpr {
    fn into_operand_expr(self) -> Expr {
        self.into_expr()
    }
}

impl BoolOperand for bool {
    fn into_operand_expr(self) -> Expr {
        Expr::bool(self)
    }
}

pub trait NumericOperand {
    fn into_operand_expr(self) -> Expr;
}

impl NumericOperand for NumericExpr {
    fn into_operand_expr(self) -> Expr {
        self.into_expr()
    }
}

impl NumericOperand for f64 {
    fn into_operand_expr(self) -> Expr {
        Expr::float64(self)
    }
}

pub trait StringOperand {
    fn into_operand_expr(self) -> Expr;
}

impl StringOperand for StringExpr {
    fn into_operand_expr(self) -> Expr {
        self.into_expr()
    }
}

impl StringOperand for String {
    fn into_operand_expr(self) -> Expr {
        Expr::string(self)
    }
}

impl StringOperand for &str {
    fn into_operand_expr(self) -> Expr {
        Expr::string(self)
    }
}

pub trait DateTimeOperand {
    fn into_operand_expr(self) -> Expr;
}

impl DateTimeOperand for DateTimeExpr {
    fn into_operand_expr(self) -> Expr {
        self.into_expr()
    }
}

impl DateTimeOperand for DateTime<Utc> {
    fn into_operand_expr(self) -> Expr {
        Expr::datetime(self)
    }
}

pub trait UuidOperand {
    fn into_operand_expr(self) -> Expr;
}

impl UuidOperand for UuidExpr {
    fn into_operand_expr(self) -> Expr {
        self.into_expr()
    }
}

impl UuidOperand for Uuid {
    fn into_operand_expr(self) -> Expr {
        Expr::uuid(self)
    }
}
