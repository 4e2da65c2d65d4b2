//! # Sort State
//!
//! Single-column sort for the review queue. Selecting the active column
//! flips the direction; selecting another column switches to it ascending.
//!
//! Upload times compare as epoch milliseconds, everything else as strings.
//! The sort is stable and ties keep their input order in both directions.

use std::borrow::Borrow;
use std::cmp::Ordering;

use evd_core::EvidenceItem;
use serde::{Deserialize, Serialize};

use crate::error::QueryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    UploadedAt,
    EvidenceId,
    Status,
    Province,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UploadedAt => "uploaded_at",
            Self::EvidenceId => "evidence_id",
            Self::Status => "status",
            Self::Province => "province",
        }
    }

    fn compare(&self, a: &EvidenceItem, b: &EvidenceItem) -> Ordering {
        match self {
            Self::UploadedAt => a.uploaded_at.epoch_millis().cmp(&b.uploaded_at.epoch_millis()),
            Self::EvidenceId => a.id.as_str().cmp(b.id.as_str()),
            Self::Status => a.status.as_str().cmp(b.status.as_str()),
            Self::Province => a.scope.province.cmp(&b.scope.province),
        }
    }
}

impl std::str::FromStr for SortKey {
    type Err = QueryError;

    /// Accepts snake_case and camelCase spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "uploaded_at" | "uploadedAt" => Ok(Self::UploadedAt),
            "evidence_id" | "evidenceId" | "id" => Ok(Self::EvidenceId),
            "status" => Ok(Self::Status),
            "province" => Ok(Self::Province),
            other => Err(QueryError::UnknownSortKey(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl std::str::FromStr for SortDirection {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(QueryError::UnknownSortDirection(other.to_string())),
        }
    }
}

/// Active sort column and direction. Defaults to newest uploads first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            key: SortKey::UploadedAt,
            direction: SortDirection::Desc,
        }
    }
}

impl SortState {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Apply a column-header click.
    pub fn toggle(&mut self, key: SortKey) {
        if self.key == key {
            self.direction = self.direction.flipped();
        } else {
            self.key = key;
            self.direction = SortDirection::Asc;
        }
    }

    pub fn toggled(mut self, key: SortKey) -> Self {
        self.toggle(key);
        self
    }

    pub fn compare(&self, a: &EvidenceItem, b: &EvidenceItem) -> Ordering {
        let ord = self.key.compare(a, b);
        match self.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    }
}

/// Stable in-place sort of owned or borrowed items.
pub fn sort_items<T: Borrow<EvidenceItem>>(items: &mut [T], state: SortState) {
    items.sort_by(|a, b| state.compare(a.borrow(), b.borrow()));
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_key() -> impl Strategy<Value = SortKey> {
        prop::sample::select(vec![
            SortKey::UploadedAt,
            SortKey::EvidenceId,
            SortKey::Status,
            SortKey::Province,
        ])
    }

    proptest! {
        #[test]
        fn toggle_twice_on_same_key_is_identity(start in arb_key(), key in arb_key()) {
            let state = SortState::new(start, SortDirection::Asc).toggled(key);
            prop_assert_eq!(state.toggled(key).toggled(key), state);
        }

        #[test]
        fn new_key_is_always_ascending(start in arb_key(), key in arb_key(), desc in any::<bool>()) {
            prop_assume!(start != key);
            let dir = if desc { SortDirection::Desc } else { SortDirection::Asc };
            let state = SortState::new(start, dir).toggled(key);
            prop_assert_eq!(state.direction, SortDirection::Asc);
            prop_assert_eq!(state.key, key);
        }
    }
}
