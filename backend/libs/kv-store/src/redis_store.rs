//! Redis engine
//!
//! Values are stored as plain Redis strings under the record key, so records
//! written by other services sharing the instance stay readable.

use crate::{KeyValueStore, StoreError, StoreResult};
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Shared Redis connection manager
pub type SharedRedis = Arc<Mutex<ConnectionManager>>;

/// Keys fetched per SCAN round trip
const SCAN_BATCH: usize = 100;

#[derive(Clone)]
pub struct RedisStore {
    redis: SharedRedis,
}

impl RedisStore {
    pub fn new(redis: SharedRedis) -> Self {
        Self { redis }
    }

    /// Open a connection manager for `redis_url`
    pub async fn connect(redis_url: &str) -> StoreResult<Self> {
        let client = Client::open(redis_url).map_err(StoreError::Redis)?;
        let manager = ConnectionManager::new(client)
            .await
            .map_err(StoreError::Redis)?;
        info!("Redis store connected");
        Ok(Self::new(Arc::new(Mutex::new(manager))))
    }
}

/// Escape glob metacharacters so a prefix is matched literally by SCAN MATCH
pub(crate) fn glob_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for ch in prefix.chars() {
        if matches!(ch, '*' | '?' | '[' | ']' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('*');
    pattern
}

#[async_trait::async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let mut conn = self.redis.lock().await;
        let value = conn.get::<_, Option<Vec<u8>>>(key).await.map_err(|e| {
            warn!(key = %key, error = %e, "Redis get error");
            StoreError::Redis(e)
        })?;
        Ok(value)
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> StoreResult<()> {
        let mut conn = self.redis.lock().await;
        conn.set::<_, _, ()>(key, value)
            .await
            .map_err(StoreError::Redis)?;

        debug!(key = %key, "Store put");
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        let mut conn = self.redis.lock().await;
        conn.del::<_, ()>(key).await.map_err(StoreError::Redis)?;

        debug!(key = %key, "Store delete");
        Ok(())
    }

    async fn scan_prefix(&self, prefix: &str) -> StoreResult<Vec<(String, Vec<u8>)>> {
        let pattern = glob_pattern(prefix);
        let mut conn = self.redis.lock().await;
        let mut cursor: u64 = 0;
        let mut keys: Vec<String> = Vec::new();

        loop {
            // SCAN instead of KEYS so large namespaces never block the server
            let (next_cursor, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut *conn)
                .await
                .map_err(StoreError::Redis)?;

            keys.extend(batch);
            cursor = next_cursor;
            if cursor == 0 {
                break;
            }
        }

        // SCAN may return a key more than once
        keys.sort();
        keys.dedup();

        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let values: Vec<Option<Vec<u8>>> = redis::cmd("MGET")
            .arg(&keys)
            .query_async(&mut *conn)
            .await
            .map_err(StoreError::Redis)?;

        // A key deleted between SCAN and MGET comes back as nil
        let pairs: Vec<(String, Vec<u8>)> = keys
            .into_iter()
            .zip(values)
            .filter_map(|(key, value)| value.map(|v| (key, v)))
            .collect();

        debug!(prefix = %prefix, count = pairs.len(), "Store prefix scan");
        Ok(pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glob_pattern_plain_prefix() {
        assert_eq!(glob_pattern("post-"), "post-*");
    }

    #[test]
    fn test_glob_pattern_escapes_metacharacters() {
        assert_eq!(glob_pattern("a*b?[c]\\"), "a\\*b\\?\\[c\\]\\\\*");
    }
}
