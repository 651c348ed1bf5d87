//! Orchestrates a full generator run: introspect every table, map its
//! columns, and write one `.rs` file per table plus one per enum.

use std::collections::HashSet;
use std::path::Path;

use sqlx::PgPool;
use tracing::info;

use crate::catalog;
use crate::config::Overrides;
use crate::error::{CodegenError, Result};
use crate::template::{render_enum, render_model_struct, render_table_singleton, GeneratedColumn, GeneratedTable};
use crate::typemap::{map_pg_type, DslType};

fn pascal_case(table_name: &str) -> String {
    table_name
        .split('_')
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

fn write_file(output_dir: &Path, file_name: &str, contents: &str) -> Result<()> {
    std::fs::create_dir_all(output_dir).map_err(|source| CodegenError::OutputWrite {
        path: output_dir.display().to_string(),
        source,
    })?;
    let path = output_dir.join(file_name);
    std::fs::write(&path, contents).map_err(|source| CodegenError::OutputWrite {
        path: path.display().to_string(),
        source,
    })
}

/// Runs the full introspection → codegen pipeline and writes every
/// generated file under `output_dir`.
pub async fn run(pool: &PgPool, output_dir: &Path, overrides: &Overrides) -> Result<()> {
    let enums = catalog::list_enums(pool).await?;
    let enum_names: HashSet<&str> = enums.iter().map(|e| e.enum_name.as_str()).collect();

    for enum_name in &enum_names {
        let variants: Vec<String> = enums
            .iter()
            .filter(|e| e.enum_name == *enum_name)
            .map(|e| e.enum_label.clone())
            .collect();
        let rendered = render_enum(&pascal_case(enum_name), &variants);
        write_file(output_dir, &format!("{enum_name}.rs"), &rendered)?;
        info!(enum_name, variant_count = variants.len(), "generated enum");
    }

    for table in catalog::list_tables(pool).await? {
        let table_name = table.table_name;
        let columns = catalog::list_columns(pool, &table_name).await?;
        let foreign_keys = catalog::list_foreign_keys(pool, &table_name).await?;

        let mut generated_columns = Vec::with_capacity(columns.len());
        for column in columns {
            let overridden = overrides.type_for(&table_name, &column.column_name);
            let dsl_type = if let Some(override_name) = overridden {
                parse_override_type(override_name)?
            } else {
                let referenced_enum = foreign_keys
                    .iter()
                    .find(|fk| fk.column_name == column.column_name && fk.foreign_table_name.ends_with("_reference_table"));
                if referenced_enum.is_some() {
                    DslType::Enum
                } else {
                    let is_enum = enum_names.contains(column.udt_name.as_str());
                    map_pg_type(&column.data_type, &column.udt_name, is_enum)?
                }
            };
            generated_columns.push(GeneratedColumn {
                name: column.column_name,
                dsl_type,
                nullable: column.is_nullable,
            });
        }

        let generated = GeneratedTable {
            struct_name: pascal_case(&table_name),
            table_name: table_name.clone(),
            columns: generated_columns,
        };

        let mut file = render_model_struct(&generated);
        file.push('\n');
        file.push_str(&render_table_singleton(&generated));
        write_file(output_dir, &format!("{table_name}.rs"), &file)?;
        info!(table_name, column_count = generated.columns.len(), "generated table");
    }

    Ok(())
}

fn parse_override_type(name: &str) -> Result<DslType> {
    match name {
        "Bool" => Ok(DslType::Bool),
        "String" => Ok(DslType::String),
        "Enum" => Ok(DslType::Enum),
        "Int" => Ok(DslType::Int),
        "Int64" => Ok(DslType::Int64),
        "Jsonb" => Ok(DslType::Jsonb),
        "Float32" => Ok(DslType::Float32),
        "Float64" => Ok(DslType::Float64),
        "Time" => Ok(DslType::Time),
        "UUID" => Ok(DslType::Uuid),
        "StringArray" => Ok(DslType::StringArray),
        other => Err(CodegenError::UnknownOverrideType(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pascal_case_converts_snake_case_table_name() {
        assert_eq!(pascal_case("blog_posts"), "BlogPosts");
    }

    #[test]
    fn override_type_name_round_trips() {
        assert_eq!(parse_override_type("Int64").unwrap(), DslType::Int64);
        assert!(parse_override_type("Nope").is_err());
    }
}
