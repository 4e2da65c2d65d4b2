//! # Evidence Packages
//!
//! Bundles of evidence records under a hash manifest. A package can be
//! re-verified against the current records at any time and sealed once;
//! sealing marks every member record `Sealed` and logs a `Seal` custody
//! event on each.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use evd_core::{
    CustodyEventType, EvidenceError, EvidenceId, EvidenceItem, EvidencePackage, EvidenceStatus,
    PackageId, PackageVerification, Timestamp,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::parse_evidence_id;
use crate::auth::{require_role, CallerIdentity, Role};
use crate::error::{AppError, ErrorBody};
use crate::extractors::{extract_validated_json, Validate};
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePackageRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub evidence_ids: Vec<String>,
}

impl Validate for CreatePackageRequest {
    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("package name must not be empty".into());
        }
        if self.evidence_ids.is_empty() {
            return Err("package must contain at least one evidence item".into());
        }
        Ok(())
    }
}

/// A package as returned by the API.
#[derive(Debug, Serialize, ToSchema)]
pub struct PackageResponse {
    #[schema(value_type = Object)]
    pub package: EvidencePackage,
    pub item_count: usize,
    /// `sha256:<hex>` of the sorted manifest.
    pub digest: String,
}

impl From<EvidencePackage> for PackageResponse {
    fn from(package: EvidencePackage) -> Self {
        Self {
            item_count: package.entries.len(),
            digest: package.digest.to_string(),
            package,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PackageListResponse {
    pub packages: Vec<PackageResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VerificationResponse {
    #[schema(value_type = Object)]
    pub verification: PackageVerification,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/packages", get(list_packages).post(create_package))
        .route("/v1/packages/{id}", get(get_package))
        .route("/v1/packages/{id}/verify", post(verify_package))
        .route("/v1/packages/{id}/seal", post(seal_package))
}

fn parse_package_id(raw: &str) -> Result<PackageId, AppError> {
    let raw = raw.trim();
    let raw = raw.strip_prefix("package:").unwrap_or(raw);
    Uuid::parse_str(raw)
        .map(PackageId::from_uuid)
        .map_err(|_| AppError::Validation(format!("invalid package id: {raw}")))
}

fn package_not_found(id: &PackageId) -> AppError {
    AppError::NotFound(format!("{id} not found"))
}

/// GET /v1/packages: All packages, newest first.
#[utoipa::path(
    get,
    path = "/v1/packages",
    responses(
        (status = 200, description = "Packages", body = PackageListResponse),
    ),
    tag = "packages"
)]
async fn list_packages(State(state): State<AppState>) -> Json<PackageListResponse> {
    let mut packages = state.packages.list();
    packages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Json(PackageListResponse {
        packages: packages.into_iter().map(PackageResponse::from).collect(),
    })
}

/// POST /v1/packages: Bundle existing records under a manifest.
#[utoipa::path(
    post,
    path = "/v1/packages",
    request_body = CreatePackageRequest,
    responses(
        (status = 201, description = "Package created", body = PackageResponse),
        (status = 422, description = "Empty name, no items, duplicate or unknown id", body = ErrorBody),
    ),
    tag = "packages"
)]
async fn create_package(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<CreatePackageRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PackageResponse>), AppError> {
    require_role(&caller, Role::Officer)?;
    let request = extract_validated_json(body)?;
    let ids = request
        .evidence_ids
        .iter()
        .map(|raw| parse_evidence_id(raw))
        .collect::<Result<Vec<EvidenceId>, _>>()?;

    // Manifest hashes are taken under one read lock.
    let package = state.evidence.read(|map| {
        let items = ids
            .iter()
            .map(|id| {
                map.get(id)
                    .ok_or_else(|| AppError::Validation(format!("evidence {id} not found")))
            })
            .collect::<Result<Vec<&EvidenceItem>, _>>()?;
        EvidencePackage::build(
            request.name.trim(),
            request.description.clone(),
            &items,
            caller.name.as_str(),
            Timestamp::now(),
        )
        .map_err(AppError::from)
    })?;

    tracing::info!(package_id = %package.id, items = package.entries.len(), actor = %caller.name, "package created");
    state.packages.insert(package.id, package.clone());
    Ok((StatusCode::CREATED, Json(package.into())))
}

/// GET /v1/packages/{id}
#[utoipa::path(
    get,
    path = "/v1/packages/{id}",
    params(("id" = String, Path, description = "Package UUID")),
    responses(
        (status = 200, description = "Package", body = PackageResponse),
        (status = 404, description = "Unknown package", body = ErrorBody),
    ),
    tag = "packages"
)]
async fn get_package(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PackageResponse>, AppError> {
    let id = parse_package_id(&id)?;
    let package = state.packages.get(&id).ok_or_else(|| package_not_found(&id))?;
    Ok(Json(package.into()))
}

/// POST /v1/packages/{id}/verify: Recompute the manifest from current records.
#[utoipa::path(
    post,
    path = "/v1/packages/{id}/verify",
    params(("id" = String, Path, description = "Package UUID")),
    responses(
        (status = 200, description = "Verification result; `valid` is false on any mismatch", body = VerificationResponse),
        (status = 404, description = "Unknown package", body = ErrorBody),
    ),
    tag = "packages"
)]
async fn verify_package(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<VerificationResponse>, AppError> {
    let id = parse_package_id(&id)?;
    let package = state.packages.get(&id).ok_or_else(|| package_not_found(&id))?;
    let verification = state
        .evidence
        .read(|map| package.verify(|evidence_id| map.get(evidence_id)))?;
    if !verification.valid {
        tracing::warn!(package_id = %id, mismatches = verification.mismatches.len(), "package verification failed");
    }
    Ok(Json(VerificationResponse { verification }))
}

/// POST /v1/packages/{id}/seal: Seal the package and its records. Admin only.
#[utoipa::path(
    post,
    path = "/v1/packages/{id}/seal",
    params(("id" = String, Path, description = "Package UUID")),
    responses(
        (status = 200, description = "Package sealed", body = PackageResponse),
        (status = 403, description = "Admin role required", body = ErrorBody),
        (status = 404, description = "Unknown package", body = ErrorBody),
        (status = 409, description = "Already sealed", body = ErrorBody),
    ),
    tag = "packages"
)]
async fn seal_package(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<String>,
) -> Result<Json<PackageResponse>, AppError> {
    require_role(&caller, Role::Admin)?;
    let id = parse_package_id(&id)?;
    let now = Timestamp::now();
    let package = state
        .packages
        .try_update(&id, |package| {
            package
                .seal(caller.name.as_str(), now)
                .map(|()| package.clone())
                .map_err(|e| match e {
                    EvidenceError::Validation(msg) => AppError::Conflict(msg),
                    other => other.into(),
                })
        })
        .ok_or_else(|| package_not_found(&id))??;

    // Members deleted since packaging are skipped; verification reports them.
    let sealed = state.evidence.write(|map| {
        let mut sealed = 0usize;
        for evidence_id in package.evidence_ids() {
            if let Some(item) = map.get_mut(evidence_id) {
                item.status = EvidenceStatus::Sealed;
                item.log_custody(
                    caller.name.as_str(),
                    CustodyEventType::Seal,
                    format!("Sealed in {}", package.name),
                    now,
                );
                sealed += 1;
            }
        }
        sealed
    });
    tracing::info!(package_id = %id, items = sealed, actor = %caller.name, "package sealed");
    Ok(Json(package.into()))
}
