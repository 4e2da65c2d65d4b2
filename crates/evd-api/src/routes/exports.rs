//! # Exports
//!
//! Renders a selection of evidence records as CSV, Excel-compatible HTML or
//! JSON and returns it as a file download. Every exported record gets an
//! `Export` custody event and each export is kept in the history.
//!
//! Rendering failures are logged by `evd-export` and returned as an error
//! body; no partial file is sent.

use std::collections::HashSet;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use evd_core::{CustodyEventType, EvidenceId, EvidenceItem, Timestamp};
use evd_export::{ColumnKey, ExportFormat};
use evd_query::{sort_items, SortState};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{parse_evidence_id, ListQuery};
use crate::auth::{require_role, CallerIdentity, Role};
use crate::error::{AppError, ErrorBody};
use crate::extractors::{extract_validated_json, Validate};
use crate::state::{AppState, ExportRecord};

pub const EXPORT_ROWS_HEADER: &str = "x-export-rows";
pub const EXPORT_ID_HEADER: &str = "x-export-id";

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ExportRequest {
    /// `csv`, `excel` (or `xls`) or `json`.
    pub format: String,
    /// Column keys in output order; the default set when absent.
    #[serde(default)]
    pub columns: Option<Vec<String>>,
    /// Explicit selection in row order; repeats are dropped. When present the
    /// filters below are ignored.
    #[serde(default)]
    pub evidence_ids: Option<Vec<String>>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub link_type: Option<String>,
}

impl Validate for ExportRequest {
    fn validate(&self) -> Result<(), String> {
        self.format.parse::<ExportFormat>()?;
        if let Some(columns) = &self.columns {
            if columns.iter().all(|c| c.trim().is_empty()) {
                return Err("at least one column must be selected".into());
            }
        }
        Ok(())
    }
}

impl ExportRequest {
    fn columns(&self) -> Vec<ColumnKey> {
        match &self.columns {
            Some(keys) => keys
                .iter()
                .filter(|k| !k.trim().is_empty())
                .map(|k| ColumnKey::parse(k))
                .collect(),
            None => ColumnKey::defaults(),
        }
    }

    fn list_query(&self) -> ListQuery {
        ListQuery {
            search: self.search.clone(),
            province: self.province.clone(),
            status: self.status.clone(),
            link_type: self.link_type.clone(),
            page: None,
            page_size: None,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExportHistoryResponse {
    pub exports: Vec<ExportRecord>,
}

/// Drop repeated ids, keeping the first occurrence of each.
fn first_occurrences(ids: Vec<EvidenceId>) -> Vec<EvidenceId> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}

pub fn router() -> Router<AppState> {
    Router::new().route("/v1/exports", get(list_exports).post(create_export))
}

/// GET /v1/exports: Export history, newest first.
#[utoipa::path(
    get,
    path = "/v1/exports",
    responses(
        (status = 200, description = "Export history", body = ExportHistoryResponse),
    ),
    tag = "exports"
)]
async fn list_exports(State(state): State<AppState>) -> Json<ExportHistoryResponse> {
    Json(ExportHistoryResponse {
        exports: state.export_history(),
    })
}

/// POST /v1/exports: Render and download an export file.
#[utoipa::path(
    post,
    path = "/v1/exports",
    request_body = ExportRequest,
    responses(
        (status = 200, description = "Export file as an attachment", content_type = "application/octet-stream", body = String),
        (status = 422, description = "Unknown format, no columns or unknown evidence id", body = ErrorBody),
    ),
    tag = "exports"
)]
async fn create_export(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<ExportRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    require_role(&caller, Role::Officer)?;
    let request = extract_validated_json(body)?;
    let format: ExportFormat = request.format.parse().map_err(AppError::Validation)?;
    let columns = request.columns();

    let items = state.evidence.list();
    let selected: Vec<&EvidenceItem> = match &request.evidence_ids {
        Some(raw_ids) => {
            let ids = raw_ids
                .iter()
                .map(|raw| parse_evidence_id(raw))
                .collect::<Result<Vec<EvidenceId>, _>>()?;
            first_occurrences(ids)
                .iter()
                .map(|id| {
                    items
                        .iter()
                        .find(|item| &item.id == id)
                        .ok_or_else(|| AppError::Validation(format!("evidence {id} not found")))
                })
                .collect::<Result<_, _>>()?
        }
        None => {
            let filter = request.list_query().filter()?;
            let mut matched = filter.apply(&items);
            sort_items(&mut matched, SortState::default());
            matched
        }
    };

    let file = evd_export::export(&selected, &columns, format, Utc::now())?;

    let now = Timestamp::now();
    let action = format!("Exported to {}", file.filename);
    state.evidence.write(|map| {
        for item in &selected {
            if let Some(stored) = map.get_mut(&item.id) {
                stored.log_custody(caller.name.as_str(), CustodyEventType::Export, action.as_str(), now);
            }
        }
    });

    let record = ExportRecord {
        id: Uuid::new_v4(),
        filename: file.filename.clone(),
        format: file.format,
        row_count: file.row_count,
        columns: file.columns.clone(),
        requested_by: caller.name.clone(),
        created_at: Utc::now(),
    };
    let export_id = record.id;
    state.record_export(record);
    tracing::info!(export_id = %export_id, format = %format, rows = file.row_count, actor = %caller.name, "export produced");

    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", file.filename))
        .map_err(|e| AppError::Internal(format!("content-disposition header: {e}")))?;
    let headers = [
        (header::CONTENT_TYPE, HeaderValue::from_static(file.mime_type)),
        (header::CONTENT_DISPOSITION, disposition),
        (
            HeaderName::from_static(EXPORT_ROWS_HEADER),
            HeaderValue::from(file.row_count),
        ),
        (
            HeaderName::from_static(EXPORT_ID_HEADER),
            HeaderValue::from_str(&export_id.to_string())
                .map_err(|e| AppError::Internal(format!("export id header: {e}")))?,
        ),
    ];
    Ok((StatusCode::OK, headers, file.content).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_default_when_absent() {
        let request = ExportRequest {
            format: "csv".into(),
            ..ExportRequest::default()
        };
        assert_eq!(request.columns(), ColumnKey::defaults());
    }

    #[test]
    fn explicit_columns_keep_order_and_skip_blanks() {
        let request = ExportRequest {
            format: "json".into(),
            columns: Some(vec!["status".into(), " ".into(), "evidenceId".into()]),
            ..ExportRequest::default()
        };
        let keys: Vec<String> = request.columns().iter().map(|c| c.key().to_string()).collect();
        assert_eq!(keys, vec!["status", "evidenceId"]);
    }

    #[test]
    fn repeated_ids_keep_first_position() {
        let ids = [3, 1, 3, 2, 1]
            .into_iter()
            .map(|seq| EvidenceId::generate(2026, seq))
            .collect();
        let kept: Vec<String> = first_occurrences(ids).iter().map(|id| id.to_string()).collect();
        assert_eq!(kept, vec!["EVD-2026-000003", "EVD-2026-000001", "EVD-2026-000002"]);
    }

    #[test]
    fn unknown_format_fails_validation() {
        let request = ExportRequest {
            format: "pdf".into(),
            ..ExportRequest::default()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn all_blank_columns_fail_validation() {
        let request = ExportRequest {
            format: "csv".into(),
            columns: Some(vec![String::new()]),
            ..ExportRequest::default()
        };
        assert!(request.validate().is_err());
    }
}
