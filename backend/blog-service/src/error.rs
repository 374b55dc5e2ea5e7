/// Error types for blog-service
use entity_repository::Interrupted;
use thiserror::Error;

/// The only failure a caller can observe.
///
/// Store, encoding and preview failures are absorbed and logged below this
/// layer; a request that was cancelled or ran past its deadline is not.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceError {
    #[error(transparent)]
    Interrupted(#[from] Interrupted),
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
