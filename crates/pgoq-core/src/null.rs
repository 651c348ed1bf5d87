//! `Null<T>` wrapper family (C7): a validity flag plus payload, the shape
//! generated model structs use for nullable columns. Scalar wrappers
//! delegate straight to `Option<T>`'s sqlx impl; the array wrappers round
//! trip PostgreSQL's `{val,val}` text syntax by hand, tolerant of
//! whitespace around the separators.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef};
use sqlx::{Decode, Encode, Postgres, Type};
use uuid::Uuid;

/// Valid flag plus payload. `Valid == false` means the underlying column
/// was SQL `NULL`; `payload` is then a default-constructed placeholder,
/// never meaningful — check `valid` before reading it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Null<T> {
    pub valid: bool,
    pub payload: T,
}

impl<T: Default> Null<T> {
    #[must_use]
    pub fn some(payload: T) -> Self {
        Self { valid: true, payload }
    }

    #[must_use]
    pub fn null() -> Self {
        Self { valid: false, payload: T::default() }
    }
}

impl<T: Default> From<Option<T>> for Null<T> {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => Self::some(v),
            None => Self::null(),
        }
    }
}

impl<T> From<Null<T>> for Option<T> {
    fn from(n: Null<T>) -> Self {
        n.valid.then_some(n.payload)
    }
}

impl<T> Type<Postgres> for Null<T>
where
    T: Type<Postgres>,
{
    fn type_info() -> PgTypeInfo {
        T::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        T::compatible(ty)
    }
}

impl<'q, T> Encode<'q, Postgres> for Null<T>
where
    T: Encode<'q, Postgres> + Clone,
{
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        if self.valid {
            self.payload.clone().encode(buf)
        } else {
            Ok(sqlx::encode::IsNull::Yes)
        }
    }
}

impl<'r, T> Decode<'r, Postgres> for Null<T>
where
    T: Decode<'r, Postgres> + Default,
{
    fn decode(value: PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        if value.is_null() {
            return Ok(Self::null());
        }
        Ok(Self::some(T::decode(value)?))
    }
}

pub type NullBool = Null<bool>;
pub type NullInt = Null<i64>;
pub type NullFloat = Null<f64>;
pub type NullString = Null<String>;
pub type NullTime = Null<DateTime<Utc>>;
pub type NullUuid = Null<Uuid>;
pub type NullJsonb = Null<serde_json::Value>;
pub type NullBigFloat = Null<Decimal>;

/// `{val,val,val}` with tolerant leading/trailing whitespace around each
/// element. Empty string elements are distinguished from the empty array
/// `{}` (which parses as zero elements).
#[must_use]
pub fn parse_pg_text_array(s: &str) -> Vec<String> {
    let inner = s.trim().trim_start_matches('{').trim_end_matches('}');
    if inner.is_empty() {
        return Vec::new();
    }
    inner.split(',').map(|item| item.trim().to_string()).collect()
}

#[must_use]
pub fn format_pg_text_array(items: &[String]) -> String {
    format!("{{{}}}", items.join(","))
}

#[derive(Debug, Clone, Default)]
pub struct StringArrayPayload(pub Vec<String>);

impl fmt::Display for StringArrayPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_pg_text_array(&self.0))
    }
}

pub type NullStringArray = Null<StringArrayPayload>;

impl Type<Postgres> for StringArrayPayload {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("text")
    }
}

impl<'q> Encode<'q, Postgres> for StringArrayPayload {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        self.to_string().encode(buf)
    }
}

impl<'r> Decode<'r, Postgres> for StringArrayPayload {
    fn decode(value: PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let raw = <&str as Decode<Postgres>>::decode(value)?;
        Ok(Self(parse_pg_text_array(raw)))
    }
}

#[derive(Debug, Clone, Default)]
pub struct UuidArrayPayload(pub Vec<Uuid>);

impl fmt::Display for UuidArrayPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items: Vec<String> = self.0.iter().map(Uuid::to_string).collect();
        write!(f, "{}", format_pg_text_array(&items))
    }
}

pub type NullUuidArray = Null<UuidArrayPayload>;

impl Type<Postgres> for UuidArrayPayload {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("text")
    }
}

impl<'q> Encode<'q, Postgres> for UuidArrayPayload {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        self.to_string().encode(buf)
    }
}

impl<'r> Decode<'r, Postgres> for UuidArrayPayload {
    fn decode(value: PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let raw = <&str as Decode<Postgres>>::decode(value)?;
        let items = parse_pg_text_array(raw)
            .into_iter()
            .map(|s| Uuid::parse_str(&s))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self(items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_some_and_null_round_trip_through_option() {
        let present: Null<i64> = Some(7).into();
        assert!(present.valid);
        assert_eq!(present.payload, 7);
        let absent: Null<i64> = None.into();
        assert!(!absent.valid);

        let back: Option<i64> = present.into();
        assert_eq!(back, Some(7));
    }

    #[test]
    fn text_array_parses_tolerant_whitespace() {
        assert_eq!(parse_pg_text_array("{a, b ,c}"), vec!["a", "b", "c"]);
        assert_eq!(parse_pg_text_array("{}"), Vec::<String>::new());
    }

    #[test]
    fn text_array_formats_back_to_brace_syntax() {
        let payload = StringArrayPayload(vec!["a".into(), "b".into()]);
        assert_eq!(payload.to_string(), "{a,b}");
    }
}
