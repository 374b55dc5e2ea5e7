//! Byte-oriented key-value storage
//!
//! The entity services only ever talk to storage through [`KeyValueStore`]:
//! - Point get / put / delete on string keys
//! - Prefix scan returning every pair under a namespace, ordered by key
//!
//! Two engines ship with the crate: [`MemoryStore`] for tests and single-node
//! deployments, and [`RedisStore`] for shared state across service processes.

mod error;
mod memory;
mod redis_store;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use redis_store::{RedisStore, SharedRedis};

use std::sync::Arc;

/// Store handle shared by every repository of a process
pub type SharedStore = Arc<dyn KeyValueStore>;

/// Core storage operations trait
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Get the raw value stored under `key`
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value
    async fn put(&self, key: &str, value: Vec<u8>) -> StoreResult<()>;

    /// Remove `key`. Removing a missing key succeeds.
    async fn delete(&self, key: &str) -> StoreResult<()>;

    /// Return every pair whose key starts with `prefix`, in ascending key order
    async fn scan_prefix(&self, prefix: &str) -> StoreResult<Vec<(String, Vec<u8>)>>;
}
