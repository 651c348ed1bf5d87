//! PostgreSQL type → DSL type mapping (spec §6).

use crate::error::CodegenError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DslType {
    Bool,
    String,
    Enum,
    Int,
    Int64,
    Jsonb,
    Float32,
    Float64,
    Time,
    Uuid,
    StringArray,
}

impl DslType {
    #[must_use]
    pub fn rust_type_name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::String | Self::Enum => "String",
            Self::Int => "i32",
            Self::Int64 => "i64",
            Self::Jsonb => "serde_json::Value",
            Self::Float32 => "f32",
            Self::Float64 => "rust_decimal::Decimal",
            Self::Time => "chrono::DateTime<chrono::Utc>",
            Self::Uuid => "uuid::Uuid",
            Self::StringArray => "Vec<String>",
        }
    }
}

/// Maps `data_type`/`udt_name` as reported by `information_schema.columns`
/// to a [`DslType`]. `is_user_defined_enum` distinguishes a `citext`
/// `user-defined` column (→ `String`) from an actual enum (→ `Enum`).
pub fn map_pg_type(data_type: &str, udt_name: &str, is_user_defined_enum: bool) -> Result<DslType, CodegenError> {
    match data_type {
        "boolean" => Ok(DslType::Bool),
        "character" | "character varying" | "text" | "inet" | "json" => Ok(DslType::String),
        "user-defined" => {
            if udt_name == "citext" {
                Ok(DslType::String)
            } else if is_user_defined_enum {
                Ok(DslType::Enum)
            } else {
                Err(CodegenError::UnknownPgType(format!("{data_type} ({udt_name})")))
            }
        }
        "smallint" | "integer" => Ok(DslType::Int),
        "bigint" => Ok(DslType::Int64),
        "jsonb" => Ok(DslType::Jsonb),
        "real" | "float" => Ok(DslType::Float32),
        "decimal" | "double precision" | "numeric" => Ok(DslType::Float64),
        _ if data_type.starts_with("timestamp") || data_type.starts_with("time") || data_type == "date" => Ok(DslType::Time),
        "uuid" => Ok(DslType::Uuid),
        "array" | "ARRAY" => Ok(DslType::StringArray),
        other => Err(CodegenError::UnknownPgType(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn citext_maps_to_string_not_enum() {
        let mapped = map_pg_type("user-defined", "citext", false).unwrap();
        assert_eq!(mapped, DslType::String);
    }

    #[test]
    fn unknown_user_defined_type_errors() {
        let err = map_pg_type("user-defined", "some_domain", false).unwrap_err();
        assert!(matches!(err, CodegenError::UnknownPgType(_)));
    }

    #[test]
    fn timestamp_variants_map_to_time() {
        assert_eq!(map_pg_type("timestamp without time zone", "timestamp", false).unwrap(), DslType::Time);
        assert_eq!(map_pg_type("timestamptz", "timestamptz", false).unwrap(), DslType::Time);
    }

    #[test]
    fn bigint_maps_to_int64() {
        assert_eq!(map_pg_type("bigint", "int8", false).unwrap(), DslType::Int64);
    }
}
