use crate::model::{GreetingRecord, StorageKey};
use crate::store::traits::GreetingStore;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Seed for the change token, so a fresh store never renders as `0`.
const INITIAL_CHANGE_TOKEN: u64 = 0x6f;

#[derive(Debug)]
struct StoreState {
    entries: BTreeMap<StorageKey, GreetingRecord>,
    change_token: u64,
}

/// Process-memory greeting store.
///
/// A single `RwLock` guards both the entries and the change token, so each operation
/// observes and leaves a consistent pair. Records are handed out as clones; readers
/// never see a record that is half written.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    state: Arc<RwLock<StoreState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(StoreState {
                entries: BTreeMap::new(),
                change_token: INITIAL_CHANGE_TOKEN,
            })),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl GreetingStore for MemoryStore {
    async fn get(&self, key: &StorageKey) -> Option<GreetingRecord> {
        self.state.read().entries.get(key).cloned()
    }

    async fn put(&self, key: StorageKey, record: GreetingRecord) -> bool {
        let mut state = self.state.write();
        let changed = state.entries.get(&key) != Some(&record);
        state.entries.insert(key, record);
        if changed {
            state.change_token += 1;
        }
        changed
    }

    async fn delete(&self, key: &StorageKey) -> Option<GreetingRecord> {
        let mut state = self.state.write();
        // advances even when nothing was removed
        state.change_token += 1;
        state.entries.remove(key)
    }

    async fn values(&self) -> Vec<GreetingRecord> {
        self.state.read().entries.values().cloned().collect()
    }

    async fn change_token(&self) -> String {
        format!("{:x}", self.state.read().change_token)
    }

    async fn len(&self) -> usize {
        self.state.read().entries.len()
    }
}
