//! # Error Types
//!
//! Errors raised by the domain model. All errors use `thiserror` for
//! derive-based `Display` and `Error` implementations.
//!
//! Integrity errors carry both digests so an operator can see what was
//! expected and what was recomputed without consulting logs.

use thiserror::Error;

/// Top-level error type for evidence-domain operations.
#[derive(Error, Debug)]
pub enum EvidenceError {
    /// Canonicalization failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// A recomputed digest did not match the recorded one.
    #[error("integrity violation for {subject}: expected {expected}, got {actual}")]
    Integrity {
        /// The evidence item or package that failed verification.
        subject: String,
        /// The recorded digest (hex).
        expected: String,
        /// The recomputed digest (hex).
        actual: String,
    },

    /// An item has no hash record to verify against.
    #[error("{0} has no recorded content hash")]
    MissingHash(String),

    /// A value failed construction-time validation.
    #[error("validation error: {0}")]
    Validation(String),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    #[error("float values are not permitted in canonical representations: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
