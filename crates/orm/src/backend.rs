//! Storage backend seam
//!
//! The loading pipeline talks to storage through [`DatabaseExecutor`]:
//! hand it a built query, get back rows as JSON maps. The trait also
//! carries a capability flag the orchestrator checks before it builds a
//! batch query, so backends that cannot evaluate key-set filters reject
//! a load up front instead of failing mid-flight.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{Column, Pool, Postgres, Row as SqlxRow};
use tracing::debug;

use crate::error::ModelResult;
use crate::query::QueryBuilder;

/// A fetched row as a column-name-to-value map
pub type Row = serde_json::Map<String, Value>;

/// Async seam between the loading pipeline and storage
#[async_trait]
pub trait DatabaseExecutor: Send + Sync {
    /// Execute a query and return all matching rows
    async fn fetch_rows(&self, query: &QueryBuilder) -> ModelResult<Vec<Row>>;

    /// Whether this backend can evaluate batched key-set filters
    /// (`WHERE key IN (...)`). Checked before any batch query is built.
    fn supports_batch_keys(&self) -> bool {
        true
    }
}

/// Executor backed by a PostgreSQL connection pool
pub struct PostgresExecutor {
    pool: Pool<Postgres>,
}

impl PostgresExecutor {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn row_to_map(row: &sqlx::postgres::PgRow) -> Row {
        let mut map = Row::new();

        // Simplified conversion covering the column types relation
        // loading touches; unsupported types decode to null.
        for (i, column) in row.columns().iter().enumerate() {
            let column_name = column.name();

            if let Ok(value) = row.try_get::<Option<i64>, _>(i) {
                map.insert(
                    column_name.to_string(),
                    value.map(Value::from).unwrap_or(Value::Null),
                );
            } else if let Ok(value) = row.try_get::<Option<String>, _>(i) {
                map.insert(
                    column_name.to_string(),
                    value.map(Value::String).unwrap_or(Value::Null),
                );
            } else if let Ok(value) = row.try_get::<Option<bool>, _>(i) {
                map.insert(
                    column_name.to_string(),
                    value.map(Value::Bool).unwrap_or(Value::Null),
                );
            } else if let Ok(value) = row.try_get::<Option<f64>, _>(i) {
                map.insert(
                    column_name.to_string(),
                    value.and_then(serde_json::Number::from_f64)
                        .map(Value::Number)
                        .unwrap_or(Value::Null),
                );
            } else if let Ok(value) = row.try_get::<Option<Value>, _>(i) {
                map.insert(column_name.to_string(), value.unwrap_or(Value::Null));
            } else {
                map.insert(column_name.to_string(), Value::Null);
            }
        }

        map
    }
}

#[async_trait]
impl DatabaseExecutor for PostgresExecutor {
    async fn fetch_rows(&self, query: &QueryBuilder) -> ModelResult<Vec<Row>> {
        let sql = query.to_sql();
        debug!(sql = %sql, "executing query");

        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(Self::row_to_map).collect())
    }
}
