use thiserror::Error;

/// Boundary error for every engine operation. Failures are always values:
/// no raw store or provider fault crosses this boundary, and nothing is
/// retried internally except the documented not-found-then-create
/// fallbacks.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("{0} was not found")]
    NotFound(String),
    #[error("Calendar {0} cannot be resolved to a provider calendar id")]
    CalendarNotResolvable(String),
    #[error("Calendar provider rejected the request: {0}")]
    ProviderFailure(String),
    #[error("Only {created} of {requested} notification writes completed")]
    PartialWriteFailure { requested: usize, created: usize },
    #[error("Document store request failed: {0}")]
    StoreFailure(String),
}
