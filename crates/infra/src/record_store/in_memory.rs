use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use tablegate_core::{Record, RecordId, RecordUpdate};

use super::{RecordStore, StoreError};

/// In-memory record table for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    inner: RwLock<BTreeMap<RecordId, Record>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed the table; later duplicates of an id replace earlier ones.
    pub fn with_records(records: impl IntoIterator<Item = Record>) -> Self {
        let map = records.into_iter().map(|r| (r.id, r)).collect();
        Self {
            inner: RwLock::new(map),
        }
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn list_all(&self) -> Result<Vec<Record>, StoreError> {
        let map = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.values().cloned().collect())
    }

    async fn update_by_id(&self, id: RecordId, update: RecordUpdate) -> Result<Record, StoreError> {
        let mut map = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        let record = map.get_mut(&id).ok_or(StoreError::NotFound)?;
        record.apply(&update);
        Ok(record.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> InMemoryRecordStore {
        InMemoryRecordStore::with_records([
            Record::new(RecordId::new(3), "c1", "c2"),
            Record::new(RecordId::new(1), "a1", "a2"),
            Record::new(RecordId::new(2), "b1", "b2"),
        ])
    }

    #[tokio::test]
    async fn list_all_is_ordered_by_id() {
        let store = seeded();
        let ids: Vec<i64> = store
            .list_all()
            .await
            .unwrap()
            .iter()
            .map(|r| r.id.get())
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn update_overwrites_both_columns() {
        let store = seeded();
        let updated = store
            .update_by_id(RecordId::new(2), RecordUpdate::new("new", ""))
            .await
            .unwrap();
        assert_eq!(updated, Record::new(RecordId::new(2), "new", ""));

        let all = store.list_all().await.unwrap();
        assert_eq!(all[1], updated);
        assert_eq!(all[0], Record::new(RecordId::new(1), "a1", "a2"));
    }

    #[tokio::test]
    async fn repeated_update_is_idempotent() {
        let store = seeded();
        let update = RecordUpdate::new("x", "y");
        store.update_by_id(RecordId::new(1), update.clone()).await.unwrap();
        let first = store.list_all().await.unwrap();
        store.update_by_id(RecordId::new(1), update).await.unwrap();
        assert_eq!(store.list_all().await.unwrap(), first);
    }

    #[tokio::test]
    async fn update_of_missing_id_is_not_found_and_changes_nothing() {
        let store = seeded();
        let before = store.list_all().await.unwrap();
        let err = store
            .update_by_id(RecordId::new(99), RecordUpdate::new("x", "y"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
        assert_eq!(store.list_all().await.unwrap(), before);
    }
}
