//! Postgres-backed record store.
//!
//! The table is expected to exist already:
//!
//! ```sql
//! CREATE TABLE "SampleTable" (
//!     id   integer PRIMARY KEY,
//!     col1 varchar(100),
//!     col2 varchar(100)
//! );
//! ```
//!
//! `NULL` columns read back as empty strings. The id is cast to `bigint` on
//! the way out so both `integer` and `bigint` keys decode as `i64`.

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tracing::instrument;

use tablegate_core::{Record, RecordId, RecordUpdate};

use super::{RecordStore, StoreError, TableName};

pub struct PostgresRecordStore {
    pool: PgPool,
    table: TableName,
    list_sql: String,
    update_sql: String,
}

impl PostgresRecordStore {
    pub fn new(pool: PgPool, table: TableName) -> Self {
        let quoted = table.quoted();
        let list_sql = format!(
            "SELECT CAST(id AS BIGINT) AS id, col1, col2 FROM {quoted} ORDER BY id"
        );
        let update_sql = format!(
            "UPDATE {quoted} SET col1 = $1, col2 = $2 WHERE id = $3 \
             RETURNING CAST(id AS BIGINT) AS id, col1, col2"
        );
        Self {
            pool,
            table,
            list_sql,
            update_sql,
        }
    }

    /// Build a store whose pool connects on first use.
    ///
    /// Bad credentials or an unreachable host surface on the first query, not
    /// at startup.
    pub fn connect_lazy(options: PgConnectOptions, table: TableName) -> Self {
        let pool = PgPoolOptions::new().connect_lazy_with(options);
        Self::new(pool, table)
    }
}

fn row_to_record(row: &PgRow) -> Result<Record, sqlx::Error> {
    Ok(record_from_columns(
        row.try_get("id")?,
        row.try_get("col1")?,
        row.try_get("col2")?,
    ))
}

fn record_from_columns(id: i64, col1: Option<String>, col2: Option<String>) -> Record {
    Record::new(RecordId::new(id), col1.unwrap_or_default(), col2.unwrap_or_default())
}

#[async_trait]
impl RecordStore for PostgresRecordStore {
    #[instrument(skip(self), fields(table = %self.table))]
    async fn list_all(&self) -> Result<Vec<Record>, StoreError> {
        let rows = sqlx::query(&self.list_sql).fetch_all(&self.pool).await?;
        let records = rows
            .iter()
            .map(row_to_record)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    #[instrument(skip(self, update), fields(table = %self.table))]
    async fn update_by_id(&self, id: RecordId, update: RecordUpdate) -> Result<Record, StoreError> {
        let row = sqlx::query(&self.update_sql)
            .bind(update.col1())
            .bind(update.col2())
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(row_to_record(&row)?),
            None => Err(StoreError::NotFound),
        }
    }
}
