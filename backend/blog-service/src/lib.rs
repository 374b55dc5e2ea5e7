//! Blog entity services
//!
//! Posts, comments and users persisted through one shared key-value store.
//! Posts and comments get a link preview on creation; posts also carry a tag
//! set. The RPC transport that exposes these services lives elsewhere.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod tags;
pub mod telemetry;

pub use error::{ServiceError, ServiceResult};
pub use services::{CommentService, Dependencies, PostService, UserService};

use anyhow::{Context, Result};
use crate::config::{Config, StoreBackend};
use entity_repository::RequestContext;
use kv_store::{MemoryStore, RedisStore, SharedStore};
use link_preview::{HttpPreviewFetcher, LinkPreviewer};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// The three services wired to the same store
#[derive(Clone)]
pub struct BlogServices {
    pub posts: PostService,
    pub comments: CommentService,
    pub users: UserService,
    request_deadline: Option<Duration>,
}

impl BlogServices {
    pub fn new(deps: Dependencies) -> Self {
        Self {
            posts: PostService::new(deps.clone()),
            comments: CommentService::new(deps.clone()),
            users: UserService::new(deps),
            request_deadline: None,
        }
    }

    pub fn with_request_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.request_deadline = deadline;
        self
    }

    pub async fn from_config(config: &Config) -> Result<Self> {
        let store: SharedStore = match config.store.backend {
            StoreBackend::Memory => {
                info!("Using in-memory store");
                Arc::new(MemoryStore::new())
            }
            StoreBackend::Redis => {
                let store = RedisStore::connect(&config.store.redis_url)
                    .await
                    .context("Failed to connect to Redis store")?;
                info!("Connected to Redis store");
                Arc::new(store)
            }
        };

        let previewer = if config.preview.enabled {
            let fetcher = HttpPreviewFetcher::new(config.fetcher_config())
                .context("Failed to build link preview HTTP client")?;
            LinkPreviewer::new(Arc::new(fetcher))
        } else {
            info!("Link previews disabled");
            LinkPreviewer::disabled()
        };

        let deps = Dependencies::new(store).with_previewer(previewer);
        Ok(Self::new(deps).with_request_deadline(config.request_deadline()))
    }

    /// Fresh context for one incoming request, carrying the configured deadline
    pub fn request_context(&self) -> RequestContext {
        match self.request_deadline {
            Some(deadline) => RequestContext::with_timeout(deadline),
            None => RequestContext::new(),
        }
    }
}
