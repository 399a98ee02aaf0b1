//! Repository over the single editable table.

use async_trait::async_trait;
use thiserror::Error;

use tablegate_core::{Record, RecordId, RecordUpdate};

pub mod in_memory;
pub mod postgres;
pub mod table;

pub use in_memory::InMemoryRecordStore;
pub use postgres::PostgresRecordStore;
pub use table::TableName;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("record store lock poisoned")]
    Poisoned,
}

/// Access to the record table.
///
/// Writes are immediate: there is no batching and no transaction is exposed
/// to the caller. Concurrent updates to the same row are last-write-wins.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Every record, ordered by ascending id.
    async fn list_all(&self) -> Result<Vec<Record>, StoreError>;

    /// Overwrite both columns of an existing record and return it as stored.
    async fn update_by_id(&self, id: RecordId, update: RecordUpdate) -> Result<Record, StoreError>;
}
