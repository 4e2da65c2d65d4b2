//! # Evidence Records
//!
//! Intake, listing, detail, update and delete of evidence records, plus the
//! links and custody tabs and the content hashing endpoints.
//!
//! The main list is never narrowed by the caller's scope unless `scoped=true`
//! is passed; scope partitioning has its own endpoint under `/v1/scope`.

use axum::body::Bytes;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use evd_core::{
    import_rows, ContentDigest, CustodyEvent, CustodyEventType, EntityLink, EvidenceItem,
    EvidenceType, ImportProgress, ImportRejection, ImportRow, IntakeRequest, LinkEntityType,
    Sensitivity, Timestamp,
};
use evd_query::{paginate, sort_items, SortState};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::{evidence_not_found, load_evidence, parse_evidence_id, EvidencePage, ListQuery};
use crate::auth::{require_role, CallerIdentity, Role};
use crate::error::{AppError, ErrorBody};
use crate::extractors::{extract_json, extract_query, extract_validated_json, Validate};
use crate::state::AppState;

/// Largest batch accepted by the import endpoint.
pub const MAX_IMPORT_ROWS: usize = 1000;

// ── Request / response types ────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LinkRequest {
    /// `lead`, `risk`, `task` or `store`.
    pub entity_type: String,
    pub entity_id: String,
    #[serde(default)]
    pub label: Option<String>,
}

impl LinkRequest {
    fn to_link(&self) -> Result<EntityLink, AppError> {
        let entity_type: LinkEntityType = self.entity_type.parse().map_err(AppError::Validation)?;
        if self.entity_id.trim().is_empty() {
            return Err(AppError::Validation("entity_id must not be empty".into()));
        }
        Ok(EntityLink {
            entity_type,
            entity_id: self.entity_id.trim().to_string(),
            label: self.label.clone(),
        })
    }
}

impl Validate for LinkRequest {
    fn validate(&self) -> Result<(), String> {
        self.to_link().map(|_| ()).map_err(|e| match e {
            AppError::Validation(msg) => msg,
            other => other.to_string(),
        })
    }
}

/// Intake form.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateEvidenceRequest {
    pub file_name: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    /// `PHOTO`, `VIDEO`, `AUDIO`, `DOC`, `PDF` or `OTHER`; derived from the
    /// MIME type when absent.
    #[serde(default, rename = "type")]
    pub evidence_type: Option<String>,
    #[serde(default)]
    pub size_bytes: u64,
    pub address: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// RFC 3339.
    #[serde(default)]
    pub captured_at: Option<String>,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub ward: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub sensitivity: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub links: Vec<LinkRequest>,
    /// Submit for review instead of saving a draft.
    #[serde(default)]
    pub submit: bool,
}

impl CreateEvidenceRequest {
    fn into_intake(self) -> Result<IntakeRequest, AppError> {
        let evidence_type = self
            .evidence_type
            .as_deref()
            .map(str::parse::<EvidenceType>)
            .transpose()
            .map_err(AppError::Validation)?;
        let sensitivity = self
            .sensitivity
            .as_deref()
            .map(str::parse::<Sensitivity>)
            .transpose()
            .map_err(AppError::Validation)?;
        let captured_at = self
            .captured_at
            .as_deref()
            .map(Timestamp::parse_lenient)
            .transpose()?;
        let links = self
            .links
            .iter()
            .map(LinkRequest::to_link)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(IntakeRequest {
            file_name: self.file_name,
            mime_type: self.mime_type,
            evidence_type,
            size_bytes: self.size_bytes,
            address: self.address,
            latitude: self.latitude,
            longitude: self.longitude,
            captured_at,
            province: self.province,
            district: self.district,
            ward: self.ward,
            unit: self.unit,
            sensitivity,
            notes: self.notes,
            tags: self.tags,
            links,
            submit: self.submit,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ImportRequest {
    pub items: Vec<CreateEvidenceRequest>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ImportResponse {
    pub accepted: Vec<String>,
    #[schema(value_type = Vec<Object>)]
    pub rejected: Vec<ImportRejection>,
    /// One entry per processed row.
    #[schema(value_type = Vec<Object>)]
    pub progress: Vec<ImportProgress>,
}

/// Evidence record with display labels for the detail view.
#[derive(Debug, Serialize, ToSchema)]
pub struct EvidenceDetail {
    #[schema(value_type = Object)]
    pub evidence: EvidenceItem,
    pub type_label: String,
    pub status_label: String,
    pub status_tone: String,
    pub sensitivity_label: String,
    pub sensitivity_tone: String,
    pub scope_label: String,
    pub sha256: Option<String>,
    pub pending_review: bool,
}

impl From<EvidenceItem> for EvidenceDetail {
    fn from(evidence: EvidenceItem) -> Self {
        Self {
            type_label: evidence.evidence_type.label().to_string(),
            status_label: evidence.status.label().to_string(),
            status_tone: evidence.status.tone().to_string(),
            sensitivity_label: evidence.sensitivity.label().to_string(),
            sensitivity_tone: evidence.sensitivity.tone().to_string(),
            scope_label: evidence.scope.display_label().to_string(),
            sha256: evidence.sha256_hex(),
            pending_review: evidence.status.is_pending_review(),
            evidence,
        }
    }
}

/// Partial update. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateEvidenceRequest {
    /// Any status; transitions are not checked.
    pub status: Option<String>,
    pub sensitivity: Option<String>,
    pub file_name: Option<String>,
    pub notes: Option<String>,
    pub tags: Option<Vec<String>>,
    pub province: Option<String>,
    pub district: Option<String>,
    pub ward: Option<String>,
    pub address: Option<String>,
    pub captured_at: Option<String>,
}

impl Validate for UpdateEvidenceRequest {
    fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.file_name {
            if name.trim().is_empty() {
                return Err("file name must not be empty".into());
            }
        }
        if let Some(address) = &self.address {
            if address.trim().is_empty() {
                return Err("address must not be empty".into());
            }
        }
        if let Some(province) = &self.province {
            if province.trim().is_empty() {
                return Err("province must not be empty".into());
            }
        }
        Ok(())
    }
}

impl UpdateEvidenceRequest {
    /// Apply to `item`, returning the names of the changed fields.
    fn apply(&self, item: &mut EvidenceItem) -> Result<Vec<&'static str>, AppError> {
        let mut changed = Vec::new();
        if let Some(status) = &self.status {
            item.status = status.parse().map_err(AppError::Validation)?;
            changed.push("status");
        }
        if let Some(sensitivity) = &self.sensitivity {
            item.sensitivity = sensitivity.parse().map_err(AppError::Validation)?;
            changed.push("sensitivity");
        }
        if let Some(captured_at) = &self.captured_at {
            item.captured_at = Some(Timestamp::parse_lenient(captured_at)?);
            changed.push("captured_at");
        }
        if let Some(name) = &self.file_name {
            item.file.name = name.trim().to_string();
            changed.push("file_name");
        }
        if let Some(notes) = &self.notes {
            item.notes = Some(notes.clone()).filter(|n| !n.trim().is_empty());
            changed.push("notes");
        }
        if let Some(tags) = &self.tags {
            item.tags = tags.clone();
            changed.push("tags");
        }
        if let Some(province) = &self.province {
            item.scope.province = province.trim().to_string();
            changed.push("province");
        }
        if let Some(district) = &self.district {
            item.scope.district = Some(district.clone()).filter(|d| !d.trim().is_empty());
            changed.push("district");
        }
        if let Some(ward) = &self.ward {
            item.scope.ward = Some(ward.clone()).filter(|w| !w.trim().is_empty());
            changed.push("ward");
        }
        if let Some(address) = &self.address {
            match item.location.as_mut() {
                Some(location) => location.address = address.trim().to_string(),
                None => {
                    item.location = Some(evd_core::Location {
                        address: address.trim().to_string(),
                        latitude: None,
                        longitude: None,
                    })
                }
            }
            changed.push("address");
        }
        Ok(changed)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LinksResponse {
    pub evidence_id: String,
    #[schema(value_type = Vec<Object>)]
    pub links: Vec<EntityLink>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AppendCustodyRequest {
    /// One of the custody event types, e.g. `View` or `Transfer`.
    pub event_type: String,
    pub action: String,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub device: Option<String>,
}

impl Validate for AppendCustodyRequest {
    fn validate(&self) -> Result<(), String> {
        self.event_type.parse::<CustodyEventType>()?;
        if self.action.trim().is_empty() {
            return Err("action must not be empty".into());
        }
        Ok(())
    }
}

/// Custody event with its display icon.
#[derive(Debug, Serialize, ToSchema)]
pub struct CustodyEntry {
    #[schema(value_type = Object)]
    pub event: CustodyEvent,
    pub icon: String,
}

impl From<CustodyEvent> for CustodyEntry {
    fn from(event: CustodyEvent) -> Self {
        Self {
            icon: event.event_type.icon().to_string(),
            event,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DigestResponse {
    pub evidence_id: String,
    /// `sha256:<hex>`.
    #[schema(value_type = String)]
    pub sha256: ContentDigest,
    pub size_bytes: u64,
    pub valid: bool,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ScopedParam {
    /// Restrict the list to records visible to the caller's scope.
    #[serde(default)]
    pub scoped: bool,
}

// ── Router ──────────────────────────────────────────────────────────────────

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/evidence", get(list_evidence).post(create_evidence))
        .route("/v1/evidence/import", post(import_evidence))
        .route(
            "/v1/evidence/{id}",
            get(get_evidence).put(update_evidence).delete(delete_evidence),
        )
        .route("/v1/evidence/{id}/links", get(get_links).post(add_link))
        .route("/v1/evidence/{id}/custody", get(get_custody).post(append_custody))
        .route("/v1/evidence/{id}/content", post(upload_content))
        .route("/v1/evidence/{id}/verify", post(verify_content))
}

// ── Handlers ────────────────────────────────────────────────────────────────

/// GET /v1/evidence: Filtered, paginated list, newest upload first.
#[utoipa::path(
    get,
    path = "/v1/evidence",
    params(ListQuery, ScopedParam),
    responses(
        (status = 200, description = "Evidence page", body = EvidencePage),
        (status = 422, description = "Invalid filter or page size", body = ErrorBody),
    ),
    tag = "evidence"
)]
async fn list_evidence(
    State(state): State<AppState>,
    caller: CallerIdentity,
    query: Result<Query<ListQuery>, QueryRejection>,
    scoped: Result<Query<ScopedParam>, QueryRejection>,
) -> Result<Json<EvidencePage>, AppError> {
    let query = extract_query(query)?;
    let scoped = extract_query(scoped)?.scoped;
    let filter = query.filter()?;
    let page_size = query.page_size()?;

    let items = state.evidence.list();
    let mut matched: Vec<&EvidenceItem> = filter
        .apply(&items)
        .into_iter()
        .filter(|item| !scoped || state.visibility.is_visible(&caller.session, item))
        .collect();
    sort_items(&mut matched, SortState::default());
    let page = paginate(matched, query.page(), page_size)?;
    Ok(Json(page.into()))
}

/// POST /v1/evidence: Intake a new record.
#[utoipa::path(
    post,
    path = "/v1/evidence",
    request_body = CreateEvidenceRequest,
    responses(
        (status = 201, description = "Record created", body = EvidenceDetail),
        (status = 422, description = "Missing file name or address", body = ErrorBody),
    ),
    tag = "evidence"
)]
async fn create_evidence(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<CreateEvidenceRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<EvidenceDetail>), AppError> {
    require_role(&caller, Role::Officer)?;
    let intake = extract_json(body)?.into_intake()?;
    intake.validate()?;
    let now = Timestamp::now();
    let item = intake.into_item(state.next_evidence_id(now), &caller.name, now)?;
    tracing::info!(evidence_id = %item.id, actor = %caller.name, status = %item.status, "evidence created");
    state.evidence.insert(item.id.clone(), item.clone());
    Ok((StatusCode::CREATED, Json(item.into())))
}

/// POST /v1/evidence/import: Batch intake with per-row progress.
#[utoipa::path(
    post,
    path = "/v1/evidence/import",
    request_body = ImportRequest,
    responses(
        (status = 200, description = "Import report", body = ImportResponse),
        (status = 422, description = "Batch too large", body = ErrorBody),
    ),
    tag = "evidence"
)]
async fn import_evidence(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<ImportRequest>, JsonRejection>,
) -> Result<Json<ImportResponse>, AppError> {
    require_role(&caller, Role::Officer)?;
    let request = extract_json(body)?;
    if request.items.len() > MAX_IMPORT_ROWS {
        return Err(AppError::Validation(format!(
            "at most {MAX_IMPORT_ROWS} rows per import"
        )));
    }

    // Rows that fail conversion are rejected at their own index and still
    // count towards progress.
    let rows: Vec<ImportRow> = request
        .items
        .into_iter()
        .map(|row| row.into_intake().map_err(|e| e.to_string()))
        .collect();

    let now = Timestamp::now();
    let mut progress = Vec::new();
    let report = import_rows(
        rows,
        || state.next_evidence_id(now),
        &caller.name,
        now,
        |p| {
            tracing::debug!(processed = p.processed, total = p.total, percent = p.percent, "import progress");
            progress.push(p);
        },
    );
    let rejected = report.rejected;

    let accepted: Vec<String> = report.accepted.iter().map(|i| i.id.to_string()).collect();
    state.evidence.write(|map| {
        for item in report.accepted {
            map.insert(item.id.clone(), item);
        }
    });
    tracing::info!(accepted = accepted.len(), rejected = rejected.len(), actor = %caller.name, "evidence import finished");
    Ok(Json(ImportResponse {
        accepted,
        rejected,
        progress,
    }))
}

/// GET /v1/evidence/{id}: Record with display labels.
#[utoipa::path(
    get,
    path = "/v1/evidence/{id}",
    params(("id" = String, Path, description = "Evidence id, e.g. EVD-2026-000001")),
    responses(
        (status = 200, description = "Record", body = EvidenceDetail),
        (status = 404, description = "Unknown id", body = ErrorBody),
    ),
    tag = "evidence"
)]
async fn get_evidence(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EvidenceDetail>, AppError> {
    let id = parse_evidence_id(&id)?;
    Ok(Json(load_evidence(&state, &id)?.into()))
}

/// PUT /v1/evidence/{id}: Update metadata; logs an `Edit` custody event.
#[utoipa::path(
    put,
    path = "/v1/evidence/{id}",
    params(("id" = String, Path, description = "Evidence id")),
    request_body = UpdateEvidenceRequest,
    responses(
        (status = 200, description = "Updated record", body = EvidenceDetail),
        (status = 404, description = "Unknown id", body = ErrorBody),
        (status = 422, description = "Invalid field value", body = ErrorBody),
    ),
    tag = "evidence"
)]
async fn update_evidence(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<String>,
    body: Result<Json<UpdateEvidenceRequest>, JsonRejection>,
) -> Result<Json<EvidenceDetail>, AppError> {
    require_role(&caller, Role::Officer)?;
    let id = parse_evidence_id(&id)?;
    let request = extract_validated_json(body)?;
    let updated = state
        .evidence
        .try_update(&id, |item| {
            // Validate on a copy so a bad field leaves the record untouched.
            let mut draft = item.clone();
            let changed = request.apply(&mut draft)?;
            if !changed.is_empty() {
                draft.log_custody(
                    caller.name.as_str(),
                    CustodyEventType::Edit,
                    format!("Updated {}", changed.join(", ")),
                    Timestamp::now(),
                );
            }
            *item = draft;
            Ok::<_, AppError>(item.clone())
        })
        .ok_or_else(|| evidence_not_found(&id))??;
    tracing::info!(evidence_id = %id, actor = %caller.name, "evidence updated");
    Ok(Json(updated.into()))
}

/// DELETE /v1/evidence/{id}: Remove a record. Admin only. The custody chain
/// stays in the audit log.
#[utoipa::path(
    delete,
    path = "/v1/evidence/{id}",
    params(("id" = String, Path, description = "Evidence id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Admin role required", body = ErrorBody),
        (status = 404, description = "Unknown id", body = ErrorBody),
    ),
    tag = "evidence"
)]
async fn delete_evidence(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    require_role(&caller, Role::Admin)?;
    let id = parse_evidence_id(&id)?;
    state
        .delete_evidence(&id, caller.name.as_str(), Timestamp::now())
        .ok_or_else(|| evidence_not_found(&id))?;
    tracing::info!(evidence_id = %id, actor = %caller.name, "evidence deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/evidence/{id}/links: Linked entities.
#[utoipa::path(
    get,
    path = "/v1/evidence/{id}/links",
    params(("id" = String, Path, description = "Evidence id")),
    responses(
        (status = 200, description = "Links", body = LinksResponse),
        (status = 404, description = "Unknown id", body = ErrorBody),
    ),
    tag = "evidence"
)]
async fn get_links(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<LinksResponse>, AppError> {
    let id = parse_evidence_id(&id)?;
    let links = load_evidence(&state, &id)?.links;
    Ok(Json(LinksResponse {
        evidence_id: id.to_string(),
        links,
    }))
}

/// POST /v1/evidence/{id}/links: Add a link; logs a `Link` custody event.
#[utoipa::path(
    post,
    path = "/v1/evidence/{id}/links",
    params(("id" = String, Path, description = "Evidence id")),
    request_body = LinkRequest,
    responses(
        (status = 201, description = "Updated links", body = LinksResponse),
        (status = 404, description = "Unknown id", body = ErrorBody),
        (status = 409, description = "Link already present", body = ErrorBody),
    ),
    tag = "evidence"
)]
async fn add_link(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<String>,
    body: Result<Json<LinkRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LinksResponse>), AppError> {
    require_role(&caller, Role::Officer)?;
    let id = parse_evidence_id(&id)?;
    let link = extract_validated_json(body)?.to_link()?;
    let links = state
        .evidence
        .try_update(&id, |item| {
            if item
                .links
                .iter()
                .any(|l| l.entity_type == link.entity_type && l.entity_id == link.entity_id)
            {
                return Err(AppError::Conflict(format!(
                    "{id} is already linked to {}:{}",
                    link.entity_type, link.entity_id
                )));
            }
            item.log_custody(
                caller.name.as_str(),
                CustodyEventType::Link,
                format!("Linked to {}:{}", link.entity_type, link.entity_id),
                Timestamp::now(),
            );
            item.links.push(link.clone());
            Ok(item.links.clone())
        })
        .ok_or_else(|| evidence_not_found(&id))??;
    Ok((
        StatusCode::CREATED,
        Json(LinksResponse {
            evidence_id: id.to_string(),
            links,
        }),
    ))
}

/// GET /v1/evidence/{id}/custody: Chain of custody, oldest first.
#[utoipa::path(
    get,
    path = "/v1/evidence/{id}/custody",
    params(("id" = String, Path, description = "Evidence id")),
    responses(
        (status = 200, description = "Custody events", body = Vec<CustodyEntry>),
        (status = 404, description = "Unknown id", body = ErrorBody),
    ),
    tag = "evidence"
)]
async fn get_custody(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<CustodyEntry>>, AppError> {
    let id = parse_evidence_id(&id)?;
    let item = load_evidence(&state, &id)?;
    Ok(Json(item.custody.into_iter().map(CustodyEntry::from).collect()))
}

/// POST /v1/evidence/{id}/custody: Append a custody event as the caller.
#[utoipa::path(
    post,
    path = "/v1/evidence/{id}/custody",
    params(("id" = String, Path, description = "Evidence id")),
    request_body = AppendCustodyRequest,
    responses(
        (status = 201, description = "Event appended", body = CustodyEntry),
        (status = 404, description = "Unknown id", body = ErrorBody),
        (status = 422, description = "Unknown event type or empty action", body = ErrorBody),
    ),
    tag = "evidence"
)]
async fn append_custody(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<String>,
    body: Result<Json<AppendCustodyRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CustodyEntry>), AppError> {
    require_role(&caller, Role::Officer)?;
    let id = parse_evidence_id(&id)?;
    let request = extract_validated_json(body)?;
    let event_type: CustodyEventType = request.event_type.parse().map_err(AppError::Validation)?;
    let event = state
        .evidence
        .update(&id, |item| {
            item.log_custody(
                caller.name.as_str(),
                event_type,
                request.action.trim(),
                Timestamp::now(),
            );
            if let Some(last) = item.custody.last_mut() {
                last.ip = request.ip.clone();
                last.device = request.device.clone();
            }
        })
        .and_then(|item| item.custody.last().cloned())
        .ok_or_else(|| evidence_not_found(&id))?;
    Ok((StatusCode::CREATED, Json(event.into())))
}

/// POST /v1/evidence/{id}/content: Hash uploaded bytes into a new hash record.
#[utoipa::path(
    post,
    path = "/v1/evidence/{id}/content",
    params(("id" = String, Path, description = "Evidence id")),
    request_body(content = String, content_type = "application/octet-stream", description = "Raw file bytes"),
    responses(
        (status = 201, description = "Content hashed", body = DigestResponse),
        (status = 404, description = "Unknown id", body = ErrorBody),
        (status = 422, description = "Empty body", body = ErrorBody),
    ),
    tag = "evidence"
)]
async fn upload_content(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<String>,
    content: Bytes,
) -> Result<(StatusCode, Json<DigestResponse>), AppError> {
    require_role(&caller, Role::Officer)?;
    let id = parse_evidence_id(&id)?;
    if content.is_empty() {
        return Err(AppError::Validation("content must not be empty".into()));
    }
    let sha256 = state
        .evidence
        .update(&id, |item| {
            item.record_content(&content, &caller.name, Timestamp::now());
        })
        .and_then(|item| item.latest_hash().map(|h| h.digest.clone()))
        .ok_or_else(|| evidence_not_found(&id))?;
    tracing::info!(evidence_id = %id, sha256 = %sha256, size = content.len(), "content hashed");
    Ok((
        StatusCode::CREATED,
        Json(DigestResponse {
            evidence_id: id.to_string(),
            sha256,
            size_bytes: content.len() as u64,
            valid: true,
        }),
    ))
}

/// POST /v1/evidence/{id}/verify: Recompute the digest of the given bytes.
///
/// A `Verify` custody event is recorded whether or not the digests match.
#[utoipa::path(
    post,
    path = "/v1/evidence/{id}/verify",
    params(("id" = String, Path, description = "Evidence id")),
    request_body(content = String, content_type = "application/octet-stream", description = "Raw file bytes"),
    responses(
        (status = 200, description = "Digest matches", body = DigestResponse),
        (status = 404, description = "Unknown id", body = ErrorBody),
        (status = 409, description = "Digest mismatch or no recorded hash", body = ErrorBody),
    ),
    tag = "evidence"
)]
async fn verify_content(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<String>,
    content: Bytes,
) -> Result<Json<DigestResponse>, AppError> {
    let id = parse_evidence_id(&id)?;
    let outcome = state
        .evidence
        .try_update(&id, |item| {
            item.verify_integrity(&content, &caller.name, Timestamp::now())
        })
        .ok_or_else(|| evidence_not_found(&id))?;
    match outcome {
        Ok(sha256) => Ok(Json(DigestResponse {
            evidence_id: id.to_string(),
            sha256,
            size_bytes: content.len() as u64,
            valid: true,
        })),
        Err(e) => {
            tracing::warn!(evidence_id = %id, error = %e, "integrity verification failed");
            Err(e.into())
        }
    }
}
