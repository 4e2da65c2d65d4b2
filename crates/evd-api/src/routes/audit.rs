//! # Audit Log
//!
//! Custody events of every record flattened into one log, newest first.
//! Records deleted since startup keep their chain here, closed by a
//! `Delete` event.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use evd_core::{CustodyEvent, CustodyEventType};
use evd_query::{paginate, DEFAULT_PAGE_SIZE};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::MAX_PAGE_SIZE;
use crate::error::{AppError, ErrorBody};
use crate::extractors::extract_query;
use crate::state::AppState;

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AuditQuery {
    /// Exact evidence id.
    pub evidence_id: Option<String>,
    /// Exact actor name.
    pub actor: Option<String>,
    /// Custody event type, e.g. `Export`.
    pub event_type: Option<String>,
    /// Case-insensitive substring of the action text.
    pub search: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

/// Parsed audit criteria. Empty fields match everything.
#[derive(Debug, Default)]
struct AuditFilter {
    evidence_id: Option<String>,
    actor: Option<String>,
    event_type: Option<CustodyEventType>,
    search: Option<String>,
}

impl AuditFilter {
    fn matches(&self, event: &CustodyEvent) -> bool {
        self.evidence_id
            .as_deref()
            .map_or(true, |id| event.evidence_id.as_str() == id)
            && self.actor.as_deref().map_or(true, |a| event.actor == a)
            && self.event_type.map_or(true, |t| event.event_type == t)
            && self
                .search
                .as_deref()
                .map_or(true, |s| event.action.to_lowercase().contains(s))
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl AuditQuery {
    fn filter(&self) -> Result<AuditFilter, AppError> {
        let event_type = non_blank(&self.event_type)
            .map(|t| t.parse::<CustodyEventType>())
            .transpose()
            .map_err(AppError::Validation)?;
        Ok(AuditFilter {
            evidence_id: non_blank(&self.evidence_id),
            actor: non_blank(&self.actor),
            event_type,
            search: non_blank(&self.search).map(|s| s.to_lowercase()),
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuditPage {
    #[schema(value_type = Vec<Object>)]
    pub items: Vec<CustodyEvent>,
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/v1/audit", get(get_audit))
}

/// GET /v1/audit: Custody events across all records.
#[utoipa::path(
    get,
    path = "/v1/audit",
    params(AuditQuery),
    responses(
        (status = 200, description = "Audit page", body = AuditPage),
        (status = 422, description = "Unknown event type or invalid page size", body = ErrorBody),
    ),
    tag = "audit"
)]
async fn get_audit(
    State(state): State<AppState>,
    query: Result<Query<AuditQuery>, QueryRejection>,
) -> Result<Json<AuditPage>, AppError> {
    let query = extract_query(query)?;
    let filter = query.filter()?;
    let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    if page_size > MAX_PAGE_SIZE {
        return Err(AppError::Validation(format!(
            "page_size must be at most {MAX_PAGE_SIZE}"
        )));
    }

    let mut events = state.custody_events(|event| filter.matches(event));
    events.sort_by(|a, b| b.at.cmp(&a.at).then_with(|| b.evidence_id.cmp(&a.evidence_id)));

    let page = paginate(events, query.page.unwrap_or(1), page_size)?;
    Ok(Json(AuditPage {
        items: page.items,
        page: page.page,
        page_size: page.page_size,
        total_items: page.total_items,
        total_pages: page.total_pages,
    }))
}
