//! In-memory record store

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{error::StoreResult, record::Record, store, store::RecordStore};

/// Record store that keeps its collection in process memory
#[derive(Debug)]
pub struct MemoryStore<R> {
    records: RwLock<Vec<R>>,
}

impl<R: Record> MemoryStore<R> {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Create an in-memory store seeded with `records`
    pub fn with_records(records: Vec<R>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

impl<R: Record> Default for MemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: Record> RecordStore<R> for MemoryStore<R> {
    async fn append(&self, record: R) -> StoreResult<R> {
        let mut records = self.records.write().await;
        store::append(&mut records, record)
    }

    async fn list_all(&self) -> StoreResult<Vec<R>> {
        Ok(self.records.read().await.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<R> {
        let records = self.records.read().await;
        store::find(&records, id)
    }

    async fn replace(&self, id: Uuid, record: R) -> StoreResult<R> {
        let mut records = self.records.write().await;
        store::replace(&mut records, id, record)
    }

    async fn remove(&self, id: Uuid) -> StoreResult<R> {
        let mut records = self.records.write().await;
        store::remove(&mut records, id)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::test_support::Note;

    #[tokio::test]
    async fn test_append_then_find() {
        let store = MemoryStore::<Note>::new();
        let created = store.append(Note::new("first")).await.unwrap();

        assert_eq!(store.find_by_id(created.id).await.unwrap(), created);
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_then_find_is_not_found() {
        let store = MemoryStore::with_records(vec![Note::new("a"), Note::new("b")]);
        let target = store.list_all().await.unwrap()[0].clone();

        let removed = store.remove(target.id).await.unwrap();
        assert_eq!(removed, target);
        assert_eq!(store.list_all().await.unwrap().len(), 1);
        assert!(
            store
                .find_by_id(target.id)
                .await
                .unwrap_err()
                .is_not_found()
        );
    }

    #[tokio::test]
    async fn test_find_first() {
        let store = MemoryStore::with_records(vec![Note::new("a"), Note::new("b")]);

        let found = store.find_first(&|n: &Note| n.title == "b").await.unwrap();
        assert_eq!(found.map(|n| n.title), Some("b".to_string()));

        let missing = store.find_first(&|n: &Note| n.title == "z").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_appends_are_all_kept() {
        let store = Arc::new(MemoryStore::<Note>::new());

        let handles: Vec<_> = (0..32)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.append(Note::new(&format!("n{i}"))).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.list_all().await.unwrap().len(), 32);
    }
}
