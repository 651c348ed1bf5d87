//! Hand-rolled string templates for the generated Rust source. No
//! templating crate is pulled in: the artifact here is a literal source
//! file rather than a runtime-rendered document.

use crate::typemap::DslType;

pub struct GeneratedColumn {
    pub name: String,
    pub dsl_type: DslType,
    pub nullable: bool,
}

pub struct GeneratedTable {
    pub struct_name: String,
    pub table_name: String,
    pub columns: Vec<GeneratedColumn>,
}

/// A plain data-row struct: one field per column, `Option<T>` wrapping any
/// nullable column's Rust type.
#[must_use]
pub fn render_model_struct(table: &GeneratedTable) -> String {
    let mut out = String::new();
    out.push_str(&format!("/// Row of `{}`.\n", table.table_name));
    out.push_str("#[derive(Debug, Clone, sqlx::FromRow)]\n");
    out.push_str(&format!("pub struct {} {{\n", table.struct_name));
    for column in &table.columns {
        let rust_type = column.dsl_type.rust_type_name();
        let field_type = if column.nullable {
            format!("Option<{rust_type}>")
        } else {
            rust_type.to_string()
        };
        out.push_str(&format!("    pub {}: {field_type},\n", column.name));
    }
    out.push_str("}\n");
    out
}

/// A singleton `Table` descriptor exposing a typed field-constructor
/// method per column, grounded in `pgoq_core::schema::Table`.
#[must_use]
pub fn render_table_singleton(table: &GeneratedTable) -> String {
    let mut out = String::new();
    out.push_str(&format!("pub fn {}() -> pgoq_core::schema::Table {{\n", table.table_name));
    out.push_str(&format!("    pgoq_core::schema::Table::new(\"{}\")\n", table.table_name));
    out.push_str("}\n\n");
    for column in &table.columns {
        let wrapper = match column.dsl_type {
            DslType::Bool => "BoolExpr",
            DslType::Int | DslType::Int64 | DslType::Float32 | DslType::Float64 => "NumericExpr",
            DslType::Time => "DateTimeExpr",
            DslType::Uuid => "UuidExpr",
            DslType::String | DslType::Enum | DslType::Jsonb | DslType::StringArray => "StringExpr",
        };
        out.push_str(&format!(
            "pub fn {name}(t: &pgoq_core::schema::Table) -> pgoq_core::expr::{wrapper} {{\n    pgoq_core::expr::{wrapper}::field(t, \"{name}\")\n}}\n\n",
            name = column.name,
        ));
    }
    out
}

/// An enum type: PostgreSQL `pg_enum` values or `*_reference_table` rows,
/// either way a flat `CREATE TYPE`-shaped Rust enum.
#[must_use]
pub fn render_enum(enum_name: &str, variants: &[String]) -> String {
    let mut out = String::new();
    out.push_str("#[derive(Debug, Clone, Copy, PartialEq, Eq)]\n");
    out.push_str(&format!("pub enum {enum_name} {{\n"));
    for variant in variants {
        out.push_str(&format!("    {},\n", pascal_case(variant)));
    }
    out.push_str("}\n");
    out
}

fn pascal_case(s: &str) -> String {
    s.split(['_', '-'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_struct_wraps_nullable_columns_in_option() {
        let table = GeneratedTable {
            struct_name: "User".into(),
            table_name: "users".into(),
            columns: vec![
                GeneratedColumn { name: "id".into(), dsl_type: DslType::Int64, nullable: false },
                GeneratedColumn { name: "nickname".into(), dsl_type: DslType::String, nullable: true },
            ],
        };
        let rendered = render_model_struct(&table);
        assert!(rendered.contains("pub id: i64,"));
        assert!(rendered.contains("pub nickname: Option<String>,"));
    }

    #[test]
    fn pascal_case_splits_on_underscore_and_dash() {
        assert_eq!(pascal_case("pending_review"), "PendingReview");
        assert_eq!(pascal_case("top-level"), "TopLevel");
    }

    #[test]
    fn enum_render_lists_every_variant() {
        let rendered = render_enum("Status", &["active".to_string(), "banned".to_string()]);
        assert!(rendered.contains("Active,"));
        assert!(rendered.contains("Banned,"));
    }
}
