//! Generic entity persistence
//!
//! One [`Repository`] per record kind, all sharing the same
//! [`kv_store::SharedStore`]. Records live under `<prefix><id>` and are
//! stored as JSON.
//!
//! Mutations of one key are serialized through [`KeyedLocks`], and every
//! store call runs under a [`RequestContext`] so cancellation and deadlines
//! abort it promptly.

mod clock;
mod context;
mod entity;
mod ids;
mod list;
mod locks;
mod lookup;
mod metrics;
mod repository;

pub use clock::{Clock, ManualClock, SystemClock};
pub use context::{Interrupted, RequestContext};
pub use entity::{Entity, ListOrder};
pub use ids::{IdGenerator, SequentialIds, UuidGenerator};
pub use list::{ListQuery, Listing};
pub use locks::{KeyGuard, KeyedLocks};
pub use lookup::Lookup;
pub use metrics::RepositoryMetrics;
pub use repository::Repository;
