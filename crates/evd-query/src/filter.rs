//! # Evidence Filters
//!
//! Every active criterion must match (logical AND). A criterion is inactive
//! when absent, or for the string criteria, blank.
//!
//! - `search`: case-insensitive substring over the file name and evidence id.
//! - `province`: exact match on `scope.province`.
//! - `status`: exact match.
//! - `link_type`: the item has at least one link of that entity type.

use evd_core::{EvidenceItem, EvidenceStatus, LinkEntityType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<EvidenceStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_type: Option<LinkEntityType>,
}

impl EvidenceFilter {
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_province(mut self, province: impl Into<String>) -> Self {
        self.province = Some(province.into());
        self
    }

    pub fn with_status(mut self, status: EvidenceStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_link_type(mut self, link_type: LinkEntityType) -> Self {
        self.link_type = Some(link_type);
        self
    }

    fn active_search(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    fn active_province(&self) -> Option<&str> {
        self.province.as_deref().filter(|p| !p.trim().is_empty())
    }

    /// Whether any criterion is active.
    pub fn is_active(&self) -> bool {
        self.active_search().is_some()
            || self.active_province().is_some()
            || self.status.is_some()
            || self.link_type.is_some()
    }

    pub fn matches(&self, item: &EvidenceItem) -> bool {
        self.matches_with(item, self.active_search().as_deref())
    }

    fn matches_with(&self, item: &EvidenceItem, needle: Option<&str>) -> bool {
        if let Some(needle) = needle {
            let hit = item.file.name.to_lowercase().contains(needle)
                || item.id.as_str().to_lowercase().contains(needle);
            if !hit {
                return false;
            }
        }
        if let Some(province) = self.active_province() {
            if item.scope.province != province {
                return false;
            }
        }
        if let Some(status) = self.status {
            if item.status != status {
                return false;
            }
        }
        if let Some(link_type) = self.link_type {
            if !item.has_link_type(link_type) {
                return false;
            }
        }
        true
    }

    /// Matching items in input order.
    pub fn apply<'a>(&self, items: &'a [EvidenceItem]) -> Vec<&'a EvidenceItem> {
        let needle = self.active_search();
        items
            .iter()
            .filter(|item| self.matches_with(item, needle.as_deref()))
            .collect()
    }
}
