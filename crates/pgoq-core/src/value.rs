//! Runtime value representation for literals bound to a rendered statement.
//!
//! `SqlValue` is the single type every literal constructor, `Set`/`Values`
//! argument, and seek value collapses into before it reaches the
//! [`crate::builder::Builder`]. The conversion is always explicit through
//! [`IntoSqlValue`]; there is no untyped escape hatch except `raw_literal`
//! at the expression layer.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// A value that can be bound as a single positional argument.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Decimal(Decimal),
    Text(String),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
    Json(serde_json::Value),
    TextArray(Vec<String>),
}

impl SqlValue {
    /// Inline textual representation, used only when the Builder's debug
    /// flag is set. Never reachable from normal rendering.
    #[must_use]
    pub fn to_sql_inline(&self) -> String {
        match self {
            Self::Null => "NULL".to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Decimal(d) => d.to_string(),
            Self::Text(s) => format!("'{}'", s.replace('\'', "''")),
            Self::Uuid(u) => format!("'{u}'"),
            Self::Timestamp(t) => format!("'{}'", t.to_rfc3339()),
            Self::Json(v) => format!("'{}'", v.to_string().replace('\'', "''")),
            Self::TextArray(items) => {
                let joined = items
                    .iter()
                    .map(|s| s.replace('\'', "''"))
                    .collect::<Vec<_>>()
                    .join(",");
                format!("'{{{joined}}}'")
            }
        }
    }
}

/// Conversion into a bindable [`SqlValue`].
///
/// Every literal constructor in [`crate::expr`] and every `Set`/`Values`
/// argument in [`crate::stmt`] goes through this trait, so the set of
/// values the DSL can accept is closed and unambiguous.
pub trait IntoSqlValue {
    fn into_sql_value(self) -> SqlValue;
}

impl IntoSqlValue for SqlValue {
    fn into_sql_value(self) -> SqlValue {
        self
    }
}

impl IntoSqlValue for bool {
    fn into_sql_value(self) -> SqlValue {
        SqlValue::Bool(self)
    }
}

macro_rules! impl_into_sql_value_int {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoSqlValue for $ty {
                fn into_sql_value(self) -> SqlValue {
                    SqlValue::Int(i64::from(self))
                }
            }
        )*
    };
}

impl_into_sql_value_int!(i8, i16, i32, u8, u16, u32);

impl IntoSqlValue for i64 {
    fn into_sql_value(self) -> SqlValue {
        SqlValue::Int(self)
    }
}

impl IntoSqlValue for f32 {
    fn into_sql_value(self) -> SqlValue {
        SqlValue::Float(f64::from(self))
    }
}

impl IntoSqlValue for f64 {
    fn into_sql_value(self) -> SqlValue {
        SqlValue::Float(self)
    }
}

impl IntoSqlValue for Decimal {
    fn into_sql_value(self) -> SqlValue {
        SqlValue::Decimal(self)
    }
}

impl IntoSqlValue for String {
    fn into_sql_value(self) -> SqlValue {
        SqlValue::Text(self)
    }
}

impl IntoSqlValue for &str {
    fn into_sql_value(self) -> SqlValue {
        SqlValue::Text(self.to_string())
    }
}

impl IntoSqlValue for Uuid {
    fn into_sql_value(self) -> SqlValue {
        SqlValue::Uuid(self)
    }
}

impl IntoSqlValue for DateTime<Utc> {
    fn into_sql_value(self) -> SqlValue {
        SqlValue::Timestamp(self)
    }
}

impl IntoSqlValue for serde_json::Value {
    fn into_sql_value(self) -> SqlValue {
        SqlValue::Json(self)
    }
}

impl IntoSqlValue for Vec<String> {
    fn into_sql_value(self) -> SqlValue {
        SqlValue::TextArray(self)
    }
}

impl<T: IntoSqlValue> IntoSqlValue for Option<T> {
    fn into_sql_value(self) -> SqlValue {
        match self {
            Some(v) => v.into_sql_value(),
            None => SqlValue::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_text_escapes_quotes() {
        let v = SqlValue::Text("O'Brien".to_string());
        assert_eq!(v.to_sql_inline(), "'O''Brien'");
    }

    #[test]
    fn option_none_becomes_null() {
        let v: SqlValue = Option::<i64>::None.into_sql_value();
        assert_eq!(v, SqlValue::Null);
    }

    #[test]
    fn small_ints_widen_to_int() {
        let v: SqlValue = 7_i32.into_sql_value();
        assert_eq!(v, SqlValue::Int(7));
    }
}
