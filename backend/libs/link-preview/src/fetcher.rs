//! Page fetching
//!
//! [`PreviewFetcher`] is the seam between enrichment and the network, so
//! tests can swap in a mock and production can bound every fetch.

use crate::error::PreviewError;
use crate::metadata::{scan_metadata, LinkPreview};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PreviewFetcher: Send + Sync {
    /// Fetch `url` and build a preview from its metadata.
    ///
    /// A page without any metadata still yields `Ok` with only `url` set.
    async fn fetch_preview(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<LinkPreview, PreviewError>;
}

#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Upper bound on connect + headers + body read
    pub timeout: Duration,
    /// Bytes of body scanned at most; the rest of the page is never read
    pub max_body_bytes: usize,
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(3),
            max_body_bytes: 1024 * 1024,
            user_agent: concat!("link-preview/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Single-GET fetcher on top of `reqwest`.
///
/// Redirects follow the client's default policy. Non-success statuses are not
/// errors: the body is scanned like any other page.
#[derive(Clone)]
pub struct HttpPreviewFetcher {
    client: reqwest::Client,
    config: FetcherConfig,
}

impl HttpPreviewFetcher {
    pub fn new(config: FetcherConfig) -> Result<Self, PreviewError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client, config })
    }

    pub fn with_client(client: reqwest::Client, config: FetcherConfig) -> Self {
        Self { client, config }
    }

    async fn download(&self, url: &str) -> Result<String, PreviewError> {
        let mut response = self.client.get(url).send().await?;
        debug!(url = %url, status = %response.status(), "Link preview response");

        let limit = self.config.max_body_bytes;
        let mut body: Vec<u8> = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            let remaining = limit - body.len();
            if chunk.len() >= remaining {
                body.extend_from_slice(&chunk[..remaining]);
                debug!(url = %url, limit, "Link preview body truncated");
                break;
            }
            body.extend_from_slice(&chunk);
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

#[async_trait::async_trait]
impl PreviewFetcher for HttpPreviewFetcher {
    async fn fetch_preview(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<LinkPreview, PreviewError> {
        let timeout = self.config.timeout;

        let body = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(PreviewError::Cancelled),
            result = tokio::time::timeout(timeout, self.download(url)) => {
                result.map_err(|_| PreviewError::Timeout(timeout))??
            }
        };

        Ok(scan_metadata(&body).into_preview(url))
    }
}
