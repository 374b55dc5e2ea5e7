#![allow(dead_code)]

use async_trait::async_trait;
use blog_service::{BlogServices, Dependencies};
use entity_repository::{ManualClock, SequentialIds};
use kv_store::{KeyValueStore, MemoryStore, SharedStore, StoreError, StoreResult};
use link_preview::{LinkPreview, LinkPreviewer, PreviewError, PreviewFetcher};
use mockall::mock;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

mock! {
    pub Fetcher {}

    #[async_trait]
    impl PreviewFetcher for Fetcher {
        async fn fetch_preview(
            &self,
            url: &str,
            cancel: &CancellationToken,
        ) -> Result<LinkPreview, PreviewError>;
    }
}

pub struct Harness {
    pub services: BlogServices,
    pub engine: Arc<MemoryStore>,
    pub clock: Arc<ManualClock>,
}

/// Services over a fresh in-memory store, sequential ids, clock at `start`
pub fn harness(start: i64) -> Harness {
    harness_with(start, LinkPreviewer::disabled())
}

pub fn harness_with(start: i64, previewer: LinkPreviewer) -> Harness {
    let engine = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(start));
    let store: SharedStore = engine.clone();

    let deps = Dependencies::new(store)
        .with_previewer(previewer)
        .with_clock(clock.clone())
        .with_ids(Arc::new(SequentialIds::new()));

    Harness {
        services: BlogServices::new(deps),
        engine,
        clock,
    }
}

pub fn preview(url: &str, title: &str) -> LinkPreview {
    LinkPreview {
        url: url.to_string(),
        title: title.to_string(),
        ..Default::default()
    }
}

/// Fetcher that takes `delay` to answer unless cancelled first
pub struct SlowFetcher {
    pub delay: Duration,
}

#[async_trait]
impl PreviewFetcher for SlowFetcher {
    async fn fetch_preview(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<LinkPreview, PreviewError> {
        tokio::select! {
            _ = cancel.cancelled() => Err(PreviewError::Cancelled),
            _ = tokio::time::sleep(self.delay) => Ok(preview(url, "Slow")),
        }
    }
}

pub fn slow_previewer(delay: Duration) -> LinkPreviewer {
    LinkPreviewer::new(Arc::new(SlowFetcher { delay }))
}

/// Store that accepts nothing
pub struct BrokenStore;

#[async_trait]
impl KeyValueStore for BrokenStore {
    async fn get(&self, _key: &str) -> StoreResult<Option<Vec<u8>>> {
        Err(StoreError::Unavailable("offline".into()))
    }

    async fn put(&self, _key: &str, _value: Vec<u8>) -> StoreResult<()> {
        Err(StoreError::Unavailable("offline".into()))
    }

    async fn delete(&self, _key: &str) -> StoreResult<()> {
        Err(StoreError::Unavailable("offline".into()))
    }

    async fn scan_prefix(&self, _prefix: &str) -> StoreResult<Vec<(String, Vec<u8>)>> {
        Err(StoreError::Unavailable("offline".into()))
    }
}
