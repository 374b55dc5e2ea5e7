use serde::{Deserialize, Serialize};

/// Page and limit as supplied by the caller.
///
/// Echoed back in [`Listing`] but not applied: every list returns the full
/// filtered set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing<E> {
    pub records: Vec<E>,
    /// Size of the filtered set, not a store-wide count
    pub total: usize,
    pub page: u32,
    pub limit: u32,
}

impl<E> Listing<E> {
    pub fn new(records: Vec<E>, query: ListQuery) -> Self {
        Self {
            total: records.len(),
            records,
            page: query.page,
            limit: query.limit,
        }
    }
}
