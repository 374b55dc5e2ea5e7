//! In-process store backed by an ordered map

use crate::{KeyValueStore, StoreResult};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::ops::Bound;
use tracing::debug;

/// In-memory engine.
///
/// Keys are kept in a `BTreeMap` so a prefix scan is a single ordered range
/// walk that stops at the first key outside the prefix.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently held
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait::async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.entries.read().get(key).cloned())
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> StoreResult<()> {
        debug!(key = %key, bytes = value.len(), "Store put");
        self.entries.write().insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        let removed = self.entries.write().remove(key).is_some();
        debug!(key = %key, removed, "Store delete");
        Ok(())
    }

    async fn scan_prefix(&self, prefix: &str) -> StoreResult<Vec<(String, Vec<u8>)>> {
        let entries = self.entries.read();
        let pairs: Vec<(String, Vec<u8>)> = entries
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        debug!(prefix = %prefix, count = pairs.len(), "Store prefix scan");
        Ok(pairs)
    }
}
