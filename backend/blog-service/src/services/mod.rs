//! Entity services
//!
//! Each service owns a [`Repository`](entity_repository::Repository) for its
//! record kind. All three share one store handle, one clock and one id
//! generator through [`Dependencies`].

mod comments;
mod posts;
mod users;

pub use comments::CommentService;
pub use posts::PostService;
pub use users::UserService;

use crate::error::ServiceResult;
use entity_repository::{Clock, IdGenerator, RequestContext, SystemClock, UuidGenerator};
use kv_store::SharedStore;
use link_preview::{LinkPreview, LinkPreviewer};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Part of the request deadline kept back from enrichment for the record write
const WRITE_RESERVE: Duration = Duration::from_millis(250);

/// Collaborators injected into every service
#[derive(Clone)]
pub struct Dependencies {
    pub store: SharedStore,
    pub previewer: LinkPreviewer,
    pub clock: Arc<dyn Clock>,
    pub ids: Arc<dyn IdGenerator>,
}

impl Dependencies {
    /// Wall clock, random ids, previews disabled
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            previewer: LinkPreviewer::disabled(),
            clock: Arc::new(SystemClock),
            ids: Arc::new(UuidGenerator),
        }
    }

    pub fn with_previewer(mut self, previewer: LinkPreviewer) -> Self {
        self.previewer = previewer;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_ids(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }
}

/// Link preview for freshly authored content.
///
/// The fetch gets whatever the request has left minus [`WRITE_RESERVE`].
/// Running out of that time means no preview; cancellation is an error.
async fn enrich(
    previewer: &LinkPreviewer,
    ctx: &RequestContext,
    content: &str,
) -> ServiceResult<Option<LinkPreview>> {
    let fetch = previewer.preview_for(content, ctx.cancellation());
    match ctx.run_reserving(WRITE_RESERVE, fetch).await? {
        Some(preview) => Ok(preview),
        None => {
            warn!(
                reserve_ms = WRITE_RESERVE.as_millis() as u64,
                "Link preview ran out of request time, skipping enrichment"
            );
            Ok(None)
        }
    }
}
