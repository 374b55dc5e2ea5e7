//! Preview fetch error types

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PreviewError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Fetch timed out after {0:?}")]
    Timeout(Duration),

    #[error("Fetch cancelled")]
    Cancelled,
}
