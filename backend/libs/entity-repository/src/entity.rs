//! Entity trait shared by every stored record kind

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Order in which [`crate::Repository::list`] returns records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOrder {
    /// `created_at` descending, ties broken by id ascending
    NewestFirst,
    /// Ascending key order, as the store's prefix scan yields it
    StoreOrder,
}

/// A record kind persisted under its own key namespace.
///
/// Key prefixes must not be prefixes of one another, otherwise one kind's
/// scan would pick up the other's records.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Label used in logs and metrics
    const KIND: &'static str;
    const KEY_PREFIX: &'static str;
    const LIST_ORDER: ListOrder;

    fn id(&self) -> &str;

    /// Creation time, epoch seconds
    fn created_at(&self) -> i64;

    fn storage_key(id: &str) -> String {
        format!("{}{}", Self::KEY_PREFIX, id)
    }
}
