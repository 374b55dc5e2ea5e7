//! Enrichment facade used by the entity services on create

use crate::fetcher::PreviewFetcher;
use crate::metadata::LinkPreview;
use crate::url::extract_first_url;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Builds the optional preview for a piece of user content.
///
/// Never fails: no URL, a disabled previewer, or any fetch error all mean
/// "no preview".
#[derive(Clone)]
pub struct LinkPreviewer {
    fetcher: Option<Arc<dyn PreviewFetcher>>,
}

impl LinkPreviewer {
    pub fn new(fetcher: Arc<dyn PreviewFetcher>) -> Self {
        Self {
            fetcher: Some(fetcher),
        }
    }

    pub fn disabled() -> Self {
        Self { fetcher: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.fetcher.is_some()
    }

    pub async fn preview_for(
        &self,
        content: &str,
        cancel: &CancellationToken,
    ) -> Option<LinkPreview> {
        let fetcher = self.fetcher.as_ref()?;
        let url = extract_first_url(content)?;

        match fetcher.fetch_preview(url, cancel).await {
            Ok(preview) => {
                debug!(url = %url, "Link preview attached");
                Some(preview)
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Link preview fetch failed, skipping enrichment");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PreviewError;
    use crate::fetcher::MockPreviewFetcher;
    use std::time::Duration;

    #[tokio::test]
    async fn test_preview_uses_first_url() {
        let mut fetcher = MockPreviewFetcher::new();
        fetcher
            .expect_fetch_preview()
            .withf(|url, _| url == "https://example.com/a")
            .times(1)
            .returning(|url, _| {
                Ok(LinkPreview {
                    url: url.to_string(),
                    title: "A".to_string(),
                    ..Default::default()
                })
            });

        let previewer = LinkPreviewer::new(Arc::new(fetcher));
        let preview = previewer
            .preview_for(
                "look https://example.com/a and https://example.com/b",
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(preview.url, "https://example.com/a");
        assert_eq!(preview.title, "A");
    }

    #[tokio::test]
    async fn test_no_url_skips_fetch() {
        let mut fetcher = MockPreviewFetcher::new();
        fetcher.expect_fetch_preview().times(0);

        let previewer = LinkPreviewer::new(Arc::new(fetcher));
        assert!(previewer
            .preview_for("plain words", &CancellationToken::new())
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_fetch_error_yields_no_preview() {
        let mut fetcher = MockPreviewFetcher::new();
        fetcher
            .expect_fetch_preview()
            .times(1)
            .returning(|_, _| Err(PreviewError::Timeout(Duration::from_millis(5))));

        let previewer = LinkPreviewer::new(Arc::new(fetcher));
        assert!(previewer
            .preview_for("https://slow.example", &CancellationToken::new())
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_disabled_previewer() {
        let previewer = LinkPreviewer::disabled();
        assert!(!previewer.is_enabled());
        assert!(previewer
            .preview_for("https://example.com", &CancellationToken::new())
            .await
            .is_none());
    }
}
