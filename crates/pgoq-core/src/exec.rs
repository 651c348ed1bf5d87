//! Fetch/Exec adapters (C8): thin `sqlx::PgPool` glue around a rendered
//! `(sql, params)` pair. Binding walks the same [`SqlValue`] enum the
//! Builder parameterizes, so the set of values a statement can carry and
//! the set of values that can reach the wire never drift apart.

use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::{PgPool, Postgres};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::value::SqlValue;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, ExecError>;

fn bind<'q>(mut query: Query<'q, Postgres, PgArguments>, params: &'q [SqlValue]) -> Query<'q, Postgres, PgArguments> {
    for param in params {
        query = match param {
            SqlValue::Null => query.bind(Option::<i64>::None),
            SqlValue::Bool(b) => query.bind(b),
            SqlValue::Int(i) => query.bind(i),
            SqlValue::Float(f) => query.bind(f),
            SqlValue::Decimal(d) => query.bind(d),
            SqlValue::Text(s) => query.bind(s),
            SqlValue::Uuid(u) => query.bind(u),
            SqlValue::Timestamp(t) => query.bind(t),
            SqlValue::Json(v) => query.bind(v),
            SqlValue::TextArray(items) => query.bind(items),
        };
    }
    query
}

/// A rendered `(sql, params)` pair, ready to fetch rows or execute for
/// affected-row count against a pool. Every statement builder's `.build()`
/// output can be wrapped in one: `Built::new(sql, params)`, or `Select`'s
/// own `build_fetchable()`/`Insert`'s `RETURNING` path.
pub struct Built {
    sql: String,
    params: Vec<SqlValue>,
}

impl Built {
    #[must_use]
    pub fn new(sql: String, params: Vec<SqlValue>) -> Self {
        Self { sql, params }
    }

    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Runs the statement and maps every row into `T`.
    #[instrument(skip(self, pool), fields(sql = %self.sql))]
    pub async fn fetch_all<T>(&self, pool: &PgPool) -> Result<Vec<T>>
    where
        T: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
    {
        let query = bind(sqlx::query_as(&self.sql), &self.params);
        let rows = query.fetch_all(pool).await?;
        debug!(count = rows.len(), "fetched rows");
        Ok(rows)
    }

    /// Runs the statement and maps at most one row into `T`.
    #[instrument(skip(self, pool), fields(sql = %self.sql))]
    pub async fn fetch_optional<T>(&self, pool: &PgPool) -> Result<Option<T>>
    where
        T: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
    {
        let query = bind(sqlx::query_as(&self.sql), &self.params);
        let row = query.fetch_optional(pool).await?;
        Ok(row)
    }

    /// Runs the statement, returning the number of affected rows. Intended
    /// for a plain `INSERT`/`UPDATE`/`DELETE` with no `RETURNING`.
    #[instrument(skip(self, pool), fields(sql = %self.sql))]
    pub async fn execute(&self, pool: &PgPool) -> Result<u64> {
        let query = bind(sqlx::query(&self.sql), &self.params);
        let result = query.execute(pool).await?;
        debug!(rows_affected = result.rows_affected(), "executed");
        Ok(result.rows_affected())
    }
}

/// Implemented by every finished statement builder so callers can go
/// straight from `.build()` to `.into_built().fetch_all(&pool)` without an
/// intermediate tuple destructure.
pub trait Fetch {
    fn into_built(self) -> Built;
}

/// Implemented by every finished statement builder with no result rows.
pub trait Execute {
    fn into_built(self) -> Built;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_retains_sql_text() {
        let built = Built::new("SELECT 1".to_string(), vec![SqlValue::Int(7)]);
        assert_eq!(built.sql(), "SELECT 1");
    }
}
