use thiserror::Error;

/// Errors from list operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Page size must be at least one.
    #[error("page size must be at least 1, got {0}")]
    InvalidPageSize(usize),

    #[error("unknown sort key: {0:?}")]
    UnknownSortKey(String),

    #[error("unknown sort direction: {0:?}")]
    UnknownSortDirection(String),
}
