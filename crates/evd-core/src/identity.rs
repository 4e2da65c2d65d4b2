//! # Identifiers
//!
//! Newtype wrappers for evidence and package identifiers. You cannot pass
//! a `PackageId` where an `EvidenceId` is expected.
//!
//! Evidence ids are human-readable display codes (`EVD-2026-000042`). The
//! zero-padded sequence makes lexicographic order match creation order
//! within a year, which the review queue relies on when sorting by id.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EvidenceError;

/// Display code of an evidence record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvidenceId(String);

impl EvidenceId {
    /// Wrap an existing code, rejecting empty or whitespace-only input.
    pub fn new(code: impl Into<String>) -> Result<Self, EvidenceError> {
        let code = code.into();
        let trimmed = code.trim();
        if trimmed.is_empty() {
            return Err(EvidenceError::Validation(
                "evidence id must not be empty".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Build the canonical code for the `seq`-th record of `year`.
    pub fn generate(year: i32, seq: u64) -> Self {
        Self(format!("EVD-{year}-{seq:06}"))
    }

    /// Return the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EvidenceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for EvidenceId {
    type Err = EvidenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Unique identifier for an evidence package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageId(Uuid);

impl PackageId {
    /// Generate a new random package identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PackageId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PackageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "package:{}", self.0)
    }
}
