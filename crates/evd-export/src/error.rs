use thiserror::Error;

/// Errors raised while producing an export file.
#[derive(Error, Debug)]
pub enum ExportError {
    /// No columns were selected.
    #[error("at least one column must be selected")]
    NoColumns,

    /// JSON encoding failed.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
