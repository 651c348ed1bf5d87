//! Catalog introspection (spec §6's External Interfaces table): one query
//! per artifact kind, each instrumented with a `tracing` span the way
//! `oxide-migrate`'s executor instruments its own database calls.

use sqlx::{FromRow, PgPool};
use tracing::instrument;

use crate::error::Result;

#[derive(Debug, Clone, FromRow)]
pub struct TableInfo {
    pub table_name: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct ColumnInfo {
    pub table_name: String,
    pub column_name: String,
    pub data_type: String,
    pub is_nullable: bool,
    pub udt_name: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct EnumInfo {
    pub enum_name: String,
    pub enum_label: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct ReferenceTableRow {
    pub table_name: String,
    pub value: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct ConstraintInfo {
    pub table_name: String,
    pub constraint_name: String,
    pub column_names: Vec<String>,
    pub predicate: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ForeignKeyInfo {
    pub table_name: String,
    pub column_name: String,
    pub foreign_table_name: String,
    pub foreign_column_name: String,
}

/// `information_schema.tables`, excluding the migration bookkeeping table.
#[instrument(skip(pool))]
pub async fn list_tables(pool: &PgPool) -> Result<Vec<TableInfo>> {
    let rows = sqlx::query_as::<_, TableInfo>(
        "SELECT table_name FROM information_schema.tables \
         WHERE table_schema = 'public' AND table_name != 'schema_migrations' \
         ORDER BY table_name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// `information_schema.columns`: name, data type, nullability, udt name.
#[instrument(skip(pool))]
pub async fn list_columns(pool: &PgPool, table_name: &str) -> Result<Vec<ColumnInfo>> {
    let rows = sqlx::query_as::<_, ColumnInfo>(
        "SELECT table_name, column_name, data_type, \
                (is_nullable = 'YES') AS is_nullable, udt_name \
         FROM information_schema.columns \
         WHERE table_schema = 'public' AND table_name = $1 \
         ORDER BY ordinal_position",
    )
    .bind(table_name)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// `pg_type` joined with `pg_namespace`/`pg_enum`, ordered by `enumsortorder`.
#[instrument(skip(pool))]
pub async fn list_enums(pool: &PgPool) -> Result<Vec<EnumInfo>> {
    let rows = sqlx::query_as::<_, EnumInfo>(
        "SELECT t.typname AS enum_name, e.enumlabel AS enum_label \
         FROM pg_type t \
         JOIN pg_namespace n ON n.oid = t.typnamespace \
         JOIN pg_enum e ON e.enumtypid = t.oid \
         WHERE n.nspname = 'public' \
         ORDER BY t.typname, e.enumsortorder",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Rows of every table named `*_reference_table`, ordered by `value`,
/// adopted as a derived enum.
#[instrument(skip(pool))]
pub async fn list_reference_table_values(pool: &PgPool, table_name: &str) -> Result<Vec<ReferenceTableRow>> {
    let sql = format!("SELECT '{table_name}' AS table_name, value FROM {table_name} ORDER BY value");
    let rows = sqlx::query_as::<_, ReferenceTableRow>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

/// `pg_indexes` + `pg_class` + `pg_index`, with the partial-index
/// predicate decompiled via `pg_get_expr`.
#[instrument(skip(pool))]
pub async fn list_constraints(pool: &PgPool, table_name: &str) -> Result<Vec<ConstraintInfo>> {
    let rows = sqlx::query_as::<_, ConstraintInfo>(
        "SELECT ix.indrelid::regclass::text AS table_name, \
                ic.relname AS constraint_name, \
                array_agg(a.attname ORDER BY a.attnum) AS column_names, \
                pg_get_expr(ix.indpred, ix.indrelid) AS predicate \
         FROM pg_index ix \
         JOIN pg_class ic ON ic.oid = ix.indexrelid \
         JOIN pg_attribute a ON a.attrelid = ix.indrelid AND a.attnum = ANY(ix.indkey) \
         WHERE ix.indrelid = $1::regclass \
         GROUP BY ix.indrelid, ic.relname, ix.indpred",
    )
    .bind(table_name)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// `information_schema.table_constraints` / `key_column_usage` /
/// `constraint_column_usage`.
#[instrument(skip(pool))]
pub async fn list_foreign_keys(pool: &PgPool, table_name: &str) -> Result<Vec<ForeignKeyInfo>> {
    let rows = sqlx::query_as::<_, ForeignKeyInfo>(
        "SELECT tc.table_name, kcu.column_name, \
                ccu.table_name AS foreign_table_name, \
                ccu.column_name AS foreign_column_name \
         FROM information_schema.table_constraints tc \
         JOIN information_schema.key_column_usage kcu \
           ON tc.constraint_name = kcu.constraint_name AND tc.table_schema = kcu.table_schema \
         JOIN information_schema.constraint_column_usage ccu \
           ON ccu.constraint_name = tc.constraint_name AND ccu.table_schema = tc.table_schema \
         WHERE tc.constraint_type = 'FOREIGN KEY' AND tc.table_schema = 'public' AND tc.table_name = $1",
    )
    .bind(table_name)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
