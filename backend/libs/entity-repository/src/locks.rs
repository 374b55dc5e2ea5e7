//! Per-key async mutexes
//!
//! Read-modify-write sequences on one key hold that key's lock for the whole
//! sequence, so concurrent mutations of the same record cannot lose updates.
//! Entries are dropped once nobody holds or waits on them.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

type LockTable = DashMap<String, Arc<Mutex<()>>>;

#[derive(Clone, Default)]
pub struct KeyedLocks {
    table: Arc<LockTable>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key`
    pub async fn lock(&self, key: &str) -> KeyGuard {
        let mutex = {
            let entry = self.table.entry(key.to_string()).or_default();
            Arc::clone(entry.value())
        };
        // Shard lock is released above; never hold it across an await
        let guard = mutex.lock_owned().await;

        KeyGuard {
            key: key.to_string(),
            guard: Some(guard),
            table: Arc::clone(&self.table),
        }
    }

    /// Number of keys with a live lock entry
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

pub struct KeyGuard {
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
    table: Arc<LockTable>,
}

impl Drop for KeyGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Clones are only made under the shard lock, so a count of one here
        // means no holder and no waiter
        self.table
            .remove_if(&self.key, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}
