//! Generic repository over a key-value store
//!
//! Every operation is fail-open: store and encoding failures are logged,
//! counted and then treated as "nothing changed" or "absent". The only error a
//! caller sees is [`Interrupted`].

use crate::context::{Interrupted, RequestContext};
use crate::entity::{Entity, ListOrder};
use crate::list::{ListQuery, Listing};
use crate::locks::KeyedLocks;
use crate::lookup::Lookup;
use crate::metrics::RepositoryMetrics;
use kv_store::SharedStore;
use std::marker::PhantomData;
use tracing::{debug, warn};

pub struct Repository<E> {
    store: SharedStore,
    locks: KeyedLocks,
    metrics: RepositoryMetrics,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            locks: self.locks.clone(),
            metrics: self.metrics,
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> Repository<E> {
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            locks: KeyedLocks::new(),
            metrics: RepositoryMetrics::new(),
            _entity: PhantomData,
        }
    }

    /// Write a freshly built record under its key.
    ///
    /// Never checks for an existing key. Returns whether the record reached
    /// the store.
    pub async fn insert(&self, ctx: &RequestContext, entity: &E) -> Result<bool, Interrupted> {
        let key = E::storage_key(entity.id());
        self.write(ctx, &key, entity).await
    }

    pub async fn lookup(&self, ctx: &RequestContext, id: &str) -> Result<Lookup<E>, Interrupted> {
        let key = E::storage_key(id);
        self.lookup_key(ctx, &key).await
    }

    /// Found record or `None`; corrupt values count as absent
    pub async fn read(&self, ctx: &RequestContext, id: &str) -> Result<Option<E>, Interrupted> {
        Ok(self.lookup(ctx, id).await?.found())
    }

    /// Read-modify-write `id` under its key lock.
    ///
    /// `mutate` returns whether it changed the record; unchanged records are
    /// not written back. Returns the record as left by `mutate`, even if the
    /// write failed, or `None` when the record is absent or corrupt.
    pub async fn modify<F>(
        &self,
        ctx: &RequestContext,
        id: &str,
        mutate: F,
    ) -> Result<Option<E>, Interrupted>
    where
        F: FnOnce(&mut E) -> bool + Send,
    {
        let key = E::storage_key(id);
        let _guard = ctx.run(self.locks.lock(&key)).await?;

        let Lookup::Found(mut entity) = self.lookup_key(ctx, &key).await? else {
            return Ok(None);
        };

        if mutate(&mut entity) {
            self.write(ctx, &key, &entity).await?;
        } else {
            debug!(kind = E::KIND, key = %key, "Record unchanged, skipping write");
        }

        Ok(Some(entity))
    }

    /// Remove `id`. Deleting a missing record is not an error.
    pub async fn delete(&self, ctx: &RequestContext, id: &str) -> Result<(), Interrupted> {
        let key = E::storage_key(id);
        let _guard = ctx.run(self.locks.lock(&key)).await?;

        match ctx.run(self.store.delete(&key)).await? {
            Ok(()) => debug!(kind = E::KIND, key = %key, "Record deleted"),
            Err(e) => {
                warn!(kind = E::KIND, key = %key, error = %e, "Failed to delete record");
                self.metrics.record_store_error(E::KIND, "delete");
            }
        }
        Ok(())
    }

    /// Every record of this kind accepted by `filter`, in [`Entity::LIST_ORDER`].
    ///
    /// Skip-and-continue: a value that fails to deserialize is dropped from
    /// the listing instead of failing it.
    pub async fn list<F>(
        &self,
        ctx: &RequestContext,
        query: ListQuery,
        filter: F,
    ) -> Result<Listing<E>, Interrupted>
    where
        F: Fn(&E) -> bool,
    {
        let entries = match ctx.run(self.store.scan_prefix(E::KEY_PREFIX)).await? {
            Ok(entries) => entries,
            Err(e) => {
                warn!(kind = E::KIND, error = %e, "Prefix scan failed, listing nothing");
                self.metrics.record_store_error(E::KIND, "scan");
                Vec::new()
            }
        };

        let mut records: Vec<E> = entries
            .iter()
            .filter_map(|(key, bytes)| self.decode(key, bytes))
            .filter(|entity| filter(entity))
            .collect();

        match E::LIST_ORDER {
            ListOrder::NewestFirst => records.sort_by(|a, b| {
                b.created_at()
                    .cmp(&a.created_at())
                    .then_with(|| a.id().cmp(b.id()))
            }),
            ListOrder::StoreOrder => {}
        }

        debug!(kind = E::KIND, count = records.len(), "Listed records");
        Ok(Listing::new(records, query))
    }

    async fn lookup_key(&self, ctx: &RequestContext, key: &str) -> Result<Lookup<E>, Interrupted> {
        match ctx.run(self.store.get(key)).await? {
            Ok(Some(bytes)) => Ok(match self.decode(key, &bytes) {
                Some(entity) => Lookup::Found(entity),
                None => Lookup::Corrupt,
            }),
            Ok(None) => Ok(Lookup::Missing),
            Err(e) => {
                warn!(kind = E::KIND, key = %key, error = %e, "Failed to read record");
                self.metrics.record_store_error(E::KIND, "get");
                Ok(Lookup::Missing)
            }
        }
    }

    async fn write(&self, ctx: &RequestContext, key: &str, entity: &E) -> Result<bool, Interrupted> {
        let bytes = match serde_json::to_vec(entity) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(kind = E::KIND, key = %key, error = %e, "Failed to encode record");
                self.metrics.record_store_error(E::KIND, "encode");
                return Ok(false);
            }
        };

        match ctx.run(self.store.put(key, bytes)).await? {
            Ok(()) => {
                debug!(kind = E::KIND, key = %key, "Record written");
                self.metrics.record_write(E::KIND);
                Ok(true)
            }
            Err(e) => {
                warn!(kind = E::KIND, key = %key, error = %e, "Failed to write record");
                self.metrics.record_store_error(E::KIND, "put");
                Ok(false)
            }
        }
    }

    fn decode(&self, key: &str, bytes: &[u8]) -> Option<E> {
        match serde_json::from_slice(bytes) {
            Ok(entity) => Some(entity),
            Err(e) => {
                warn!(kind = E::KIND, key = %key, error = %e, "Skipping corrupt record");
                self.metrics.record_corrupt(E::KIND);
                None
            }
        }
    }
}
