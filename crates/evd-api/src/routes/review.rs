//! # Review Queue
//!
//! Pending records (`Submitted`, `InReview`, `NeedMoreInfo`) with per-status
//! counts, reviewer assignment and decisions. Transitions are not validated:
//! a decision may be recorded on a record in any status.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use evd_core::{
    CustodyEvent, CustodyEventType, EvidenceItem, EvidenceStatus, ReviewDecision, Timestamp,
};
use evd_query::{paginate, review_queue, QueueSummary, SortDirection, SortKey, SortState};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::evidence::EvidenceDetail;
use super::{evidence_not_found, load_evidence, parse_evidence_id, EvidencePage, ListQuery};
use crate::auth::{require_role, CallerIdentity, Role};
use crate::error::{AppError, ErrorBody};
use crate::extractors::{extract_query, extract_validated_json, Validate};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SortQuery {
    /// `uploaded_at` (default), `evidence_id`, `status` or `province`.
    pub sort: Option<String>,
    /// `asc` or `desc`. Defaults to `desc` for the default column and `asc`
    /// otherwise.
    pub direction: Option<String>,
}

impl SortQuery {
    pub fn state(&self) -> Result<SortState, AppError> {
        let Some(key) = self.sort.as_deref().filter(|s| !s.trim().is_empty()) else {
            let mut state = SortState::default();
            if let Some(direction) = &self.direction {
                state.direction = direction.parse()?;
            }
            return Ok(state);
        };
        let key: SortKey = key.parse()?;
        let direction = match &self.direction {
            Some(direction) => direction.parse()?,
            None if key == SortKey::UploadedAt => SortDirection::Desc,
            None => SortDirection::Asc,
        };
        Ok(SortState::new(key, direction))
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct QueueResponse {
    #[schema(value_type = Object)]
    pub summary: QueueSummary,
    /// Active sort column.
    pub sort: String,
    pub direction: String,
    pub page: EvidencePage,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewDetail {
    pub detail: EvidenceDetail,
    /// `Review`, `Approve` and `Reject` custody events, oldest first.
    #[schema(value_type = Vec<Object>)]
    pub history: Vec<CustodyEvent>,
}

impl From<EvidenceItem> for ReviewDetail {
    fn from(item: EvidenceItem) -> Self {
        let history = item
            .custody
            .iter()
            .filter(|e| {
                matches!(
                    e.event_type,
                    CustodyEventType::Review | CustodyEventType::Approve | CustodyEventType::Reject
                )
            })
            .cloned()
            .collect();
        Self {
            detail: item.into(),
            history,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignRequest {
    pub reviewer: String,
}

impl Validate for AssignRequest {
    fn validate(&self) -> Result<(), String> {
        if self.reviewer.trim().is_empty() {
            return Err("reviewer must not be empty".into());
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DecisionRequest {
    /// `approve`, `reject` or `need_more_info`.
    #[schema(value_type = String)]
    pub decision: ReviewDecision,
    #[serde(default)]
    pub comment: Option<String>,
}

impl Validate for DecisionRequest {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/review", get(get_queue))
        .route("/v1/review/{id}", get(get_review))
        .route("/v1/review/{id}/assign", post(assign_reviewer))
        .route("/v1/review/{id}/decision", post(record_decision))
}

/// GET /v1/review: Pending records, filtered and sorted.
#[utoipa::path(
    get,
    path = "/v1/review",
    params(ListQuery, SortQuery),
    responses(
        (status = 200, description = "Review queue", body = QueueResponse),
        (status = 422, description = "Invalid filter or sort", body = ErrorBody),
    ),
    tag = "review"
)]
async fn get_queue(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
    sort: Result<Query<SortQuery>, QueryRejection>,
) -> Result<Json<QueueResponse>, AppError> {
    let query = extract_query(query)?;
    let sort = extract_query(sort)?.state()?;
    let filter = query.filter()?;
    let page_size = query.page_size()?;

    let items = state.evidence.list();
    let queue = review_queue(&items, &filter, sort);
    let summary = QueueSummary::from_items(queue.iter().copied());
    let page = paginate(queue, query.page(), page_size)?;
    Ok(Json(QueueResponse {
        summary,
        sort: sort.key.as_str().to_string(),
        direction: sort.direction.as_str().to_string(),
        page: page.into(),
    }))
}

/// GET /v1/review/{id}: Record with its review history.
#[utoipa::path(
    get,
    path = "/v1/review/{id}",
    params(("id" = String, Path, description = "Evidence id")),
    responses(
        (status = 200, description = "Review detail", body = ReviewDetail),
        (status = 404, description = "Unknown id", body = ErrorBody),
    ),
    tag = "review"
)]
async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ReviewDetail>, AppError> {
    let id = parse_evidence_id(&id)?;
    Ok(Json(load_evidence(&state, &id)?.into()))
}

/// POST /v1/review/{id}/assign: Assign a reviewer and move to `InReview`.
#[utoipa::path(
    post,
    path = "/v1/review/{id}/assign",
    params(("id" = String, Path, description = "Evidence id")),
    request_body = AssignRequest,
    responses(
        (status = 200, description = "Reviewer assigned", body = ReviewDetail),
        (status = 403, description = "Reviewer role required", body = ErrorBody),
        (status = 404, description = "Unknown id", body = ErrorBody),
    ),
    tag = "review"
)]
async fn assign_reviewer(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<String>,
    body: Result<Json<AssignRequest>, JsonRejection>,
) -> Result<Json<ReviewDetail>, AppError> {
    require_role(&caller, Role::Reviewer)?;
    let id = parse_evidence_id(&id)?;
    let request = extract_validated_json(body)?;
    let reviewer = request.reviewer.trim().to_string();
    let item = state
        .evidence
        .update(&id, |item| {
            item.review.assigned_reviewer = Some(reviewer.clone());
            item.status = EvidenceStatus::InReview;
            item.log_custody(
                caller.name.as_str(),
                CustodyEventType::Review,
                format!("Assigned to {reviewer}"),
                Timestamp::now(),
            );
        })
        .ok_or_else(|| evidence_not_found(&id))?;
    tracing::info!(evidence_id = %id, reviewer = %reviewer, actor = %caller.name, "reviewer assigned");
    Ok(Json(item.into()))
}

/// POST /v1/review/{id}/decision: Approve, reject or ask for more information.
#[utoipa::path(
    post,
    path = "/v1/review/{id}/decision",
    params(("id" = String, Path, description = "Evidence id")),
    request_body = DecisionRequest,
    responses(
        (status = 200, description = "Decision recorded", body = ReviewDetail),
        (status = 403, description = "Reviewer role required", body = ErrorBody),
        (status = 404, description = "Unknown id", body = ErrorBody),
    ),
    tag = "review"
)]
async fn record_decision(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<String>,
    body: Result<Json<DecisionRequest>, JsonRejection>,
) -> Result<Json<ReviewDetail>, AppError> {
    require_role(&caller, Role::Reviewer)?;
    let id = parse_evidence_id(&id)?;
    let request = extract_validated_json(body)?;
    let comment = request
        .comment
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string);
    let decision = request.decision;
    let item = state
        .evidence
        .update(&id, |item| {
            let now = Timestamp::now();
            let status = decision.resulting_status();
            item.status = status;
            item.review.decision = Some(decision);
            item.review.comment = comment.clone();
            item.review.reviewed_at = Some(now);
            if item.review.assigned_reviewer.is_none() {
                item.review.assigned_reviewer = Some(caller.name.clone());
            }
            let action = match &comment {
                Some(c) => format!("{}: {c}", status.label()),
                None => status.label().to_string(),
            };
            item.log_custody(caller.name.as_str(), decision.custody_event(), action, now);
        })
        .ok_or_else(|| evidence_not_found(&id))?;
    tracing::info!(evidence_id = %id, status = %item.status, actor = %caller.name, "review decision recorded");
    Ok(Json(item.into()))
}
