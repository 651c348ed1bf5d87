//! Kind-independent operators (§4.3): valid on every expression regardless
//! of its SQL return type.

use std::rc::Rc;

use super::{BoolExpr, Expr, Operator};
use crate::builder::Renderable;

/// A typed expression wrapper that can be built from, and unwrapped back
/// into, a raw [`Expr`] node.
pub trait TypedExpr: Sized {
    fn from_expr(e: Expr) -> Self;
    fn into_expr(self) -> Expr;
}

/// `as`, `isNull`/`isNotNull`, `in`/`notIn(subquery)`, `asc`/`desc`,
/// `filter` — valid for any SQL value, so implemented once for every
/// [`TypedExpr`] rather than duplicated per class.
pub trait ExprOps: TypedExpr {
    #[must_use]
    fn alias(self, alias: impl Into<String>) -> Expr {
        self.into_expr().alias(alias)
    }

    #[must_use]
    fn is_null(self) -> BoolExpr {
        BoolExpr::from_expr(Expr::unary_postfix(self.into_expr(), Operator::IsNull))
    }

    #[must_use]
    fn is_not_null(self) -> BoolExpr {
        BoolExpr::from_expr(Expr::unary_postfix(self.into_expr(), Operator::IsNotNull))
    }

    /// Unary postfix suitable only for ORDER BY.
    #[must_use]
    fn asc(self) -> Expr {
        Expr::unary_postfix(self.into_expr(), Operator::Asc)
    }

    #[must_use]
    fn desc(self) -> Expr {
        Expr::unary_postfix(self.into_expr(), Operator::Desc)
    }

    #[must_use]
    fn filter(self, conditions: Vec<BoolExpr>) -> Expr {
        let conds = conditions.into_iter().map(TypedExpr::into_expr).collect();
        self.into_expr().filter_where(conds)
    }

    /// The subquery always renders parenthesized.
    #[must_use]
    fn in_subquery(self, subquery: Rc<dyn Renderable>) -> BoolExpr {
        BoolExpr::from_expr(Expr::binary(self.into_expr(), Operator::In, Expr::subquery(subquery)))
    }

    #[must_use]
    fn not_in_subquery(self, subquery: Rc<dyn Renderable>) -> BoolExpr {
        BoolExpr::from_expr(Expr::binary(self.into_expr(), Operator::NotIn, Expr::subquery(subquery)))
    }
}

impl<T: TypedExpr> ExprOps for T {}
