//! Link preview extraction
//!
//! Turns free text into an optional [`LinkPreview`]:
//! - [`extract_first_url`] finds the first `http(s)://` run in the text
//! - [`PreviewFetcher`] downloads the page (bounded by timeout, body cap and
//!   a cancellation token)
//! - [`scan_metadata`] walks the markup token stream for Open Graph tags,
//!   falling back to `<title>` and `<meta name="description">`
//!
//! [`LinkPreviewer`] ties these together and never fails: any fetch problem
//! simply means "no preview".

mod error;
mod fetcher;
mod markup;
mod metadata;
mod previewer;
mod url;

pub use error::PreviewError;
pub use fetcher::{FetcherConfig, HttpPreviewFetcher, PreviewFetcher};
pub use metadata::{scan_metadata, LinkPreview, PageMetadata};
pub use previewer::LinkPreviewer;
pub use url::extract_first_url;

#[cfg(test)]
pub use fetcher::MockPreviewFetcher;
