use crate::model::{GreetingRecord, StorageKey};

/// Keyed storage of current greeting state plus a collection change token.
///
/// Every method is individually atomic. Callers composing a read-check-write
/// sequence get no atomicity across calls; the entity tag check is what detects
/// interleaved writers.
#[async_trait::async_trait]
pub trait GreetingStore: Send + Sync {
    async fn get(&self, key: &StorageKey) -> Option<GreetingRecord>;
    /// Insert or overwrite. Returns whether the change token advanced.
    async fn put(&self, key: StorageKey, record: GreetingRecord) -> bool;
    /// Remove the record under `key`, returning it if it was present.
    async fn delete(&self, key: &StorageKey) -> Option<GreetingRecord>;
    /// Snapshot of all records in key order.
    async fn values(&self) -> Vec<GreetingRecord>;
    /// Opaque rendering of the change token, used to seed the collection entity tag.
    async fn change_token(&self) -> String;
    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
