//! # API Route Modules
//!
//! | Module | Prefix |
//! |--------|--------|
//! | [`evidence`] | `/v1/evidence` |
//! | [`review`] | `/v1/review` |
//! | [`packages`] | `/v1/packages` |
//! | [`exports`] | `/v1/exports` |
//! | [`audit`] | `/v1/audit` |
//! | [`scope`] | `/v1/scope` |
//! | [`options`] | `/v1/options` |
//!
//! Shared list parameters and helpers live here.

pub mod audit;
pub mod evidence;
pub mod exports;
pub mod options;
pub mod packages;
pub mod review;
pub mod scope;

use axum::http::Uri;
use evd_core::{EvidenceId, EvidenceItem, EvidenceStatus, LinkEntityType};
use evd_query::{EvidenceFilter, Page, DEFAULT_PAGE_SIZE};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::AppError;
use crate::state::AppState;

/// Largest page a client may request.
pub const MAX_PAGE_SIZE: usize = 200;

/// Filter and page parameters shared by the list endpoints.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Case-insensitive substring of file name or evidence id.
    pub search: Option<String>,
    /// Exact province.
    pub province: Option<String>,
    /// Exact status, e.g. `Submitted`.
    pub status: Option<String>,
    /// Entity type the record must link to: `lead`, `risk`, `task` or `store`.
    pub link_type: Option<String>,
    /// 1-based page number.
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

impl ListQuery {
    pub fn filter(&self) -> Result<EvidenceFilter, AppError> {
        let status = non_blank(&self.status)
            .map(|s| s.parse::<EvidenceStatus>())
            .transpose()
            .map_err(AppError::Validation)?;
        let link_type = non_blank(&self.link_type)
            .map(|s| s.parse::<LinkEntityType>())
            .transpose()
            .map_err(AppError::Validation)?;
        Ok(EvidenceFilter {
            search: self.search.clone(),
            province: self.province.clone(),
            status,
            link_type,
        })
    }

    pub fn page(&self) -> usize {
        self.page.unwrap_or(1)
    }

    /// # Errors
    ///
    /// [`AppError::Validation`] above [`MAX_PAGE_SIZE`]. Zero is rejected by
    /// the paginator itself.
    pub fn page_size(&self) -> Result<usize, AppError> {
        let size = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if size > MAX_PAGE_SIZE {
            return Err(AppError::Validation(format!(
                "page_size must be at most {MAX_PAGE_SIZE}"
            )));
        }
        Ok(size)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// One page of evidence records.
#[derive(Debug, Serialize, ToSchema)]
pub struct EvidencePage {
    #[schema(value_type = Vec<Object>)]
    pub items: Vec<EvidenceItem>,
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl From<Page<&EvidenceItem>> for EvidencePage {
    fn from(page: Page<&EvidenceItem>) -> Self {
        let page = page.map(Clone::clone);
        Self {
            items: page.items,
            page: page.page,
            page_size: page.page_size,
            total_items: page.total_items,
            total_pages: page.total_pages,
        }
    }
}

pub(crate) fn parse_evidence_id(raw: &str) -> Result<EvidenceId, AppError> {
    EvidenceId::new(raw).map_err(|e| AppError::Validation(e.to_string()))
}

/// A copy of the record, or 404.
pub(crate) fn load_evidence(state: &AppState, id: &EvidenceId) -> Result<EvidenceItem, AppError> {
    state
        .evidence
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("evidence {id} not found")))
}

pub(crate) fn evidence_not_found(id: &EvidenceId) -> AppError {
    AppError::NotFound(format!("evidence {id} not found"))
}

/// Structured 404 for unknown paths.
pub async fn fallback(uri: Uri) -> AppError {
    AppError::NotFound(format!("no route for {}", uri.path()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_criteria_are_inactive() {
        let query = ListQuery {
            status: Some("  ".into()),
            link_type: Some(String::new()),
            ..ListQuery::default()
        };
        let filter = query.filter().unwrap();
        assert!(filter.status.is_none());
        assert!(filter.link_type.is_none());
    }

    #[test]
    fn unknown_status_is_a_validation_error() {
        let query = ListQuery {
            status: Some("Archived".into()),
            ..ListQuery::default()
        };
        assert!(matches!(query.filter(), Err(AppError::Validation(_))));
    }

    #[test]
    fn page_size_defaults_and_caps() {
        assert_eq!(ListQuery::default().page_size().unwrap(), DEFAULT_PAGE_SIZE);
        let big = ListQuery {
            page_size: Some(MAX_PAGE_SIZE + 1),
            ..ListQuery::default()
        };
        assert!(big.page_size().is_err());
    }
}
