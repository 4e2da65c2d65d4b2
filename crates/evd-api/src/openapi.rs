//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI 3.1 spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Evidence Management API",
        version = "0.1.0",
        description = "Evidence records, review queue, chain of custody, packages, exports, audit log and scope visibility."
    ),
    paths(
        // Evidence
        crate::routes::evidence::list_evidence,
        crate::routes::evidence::create_evidence,
        crate::routes::evidence::import_evidence,
        crate::routes::evidence::get_evidence,
        crate::routes::evidence::update_evidence,
        crate::routes::evidence::delete_evidence,
        crate::routes::evidence::get_links,
        crate::routes::evidence::add_link,
        crate::routes::evidence::get_custody,
        crate::routes::evidence::append_custody,
        crate::routes::evidence::upload_content,
        crate::routes::evidence::verify_content,
        // Review
        crate::routes::review::get_queue,
        crate::routes::review::get_review,
        crate::routes::review::assign_reviewer,
        crate::routes::review::record_decision,
        // Packages
        crate::routes::packages::list_packages,
        crate::routes::packages::create_package,
        crate::routes::packages::get_package,
        crate::routes::packages::verify_package,
        crate::routes::packages::seal_package,
        // Exports
        crate::routes::exports::list_exports,
        crate::routes::exports::create_export,
        // Audit, scope, options
        crate::routes::audit::get_audit,
        crate::routes::scope::get_visibility,
        crate::routes::options::get_options,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::auth::Role,
        crate::state::ExportRecord,
        crate::routes::EvidencePage,
        // Evidence DTOs
        crate::routes::evidence::CreateEvidenceRequest,
        crate::routes::evidence::LinkRequest,
        crate::routes::evidence::ImportRequest,
        crate::routes::evidence::ImportResponse,
        crate::routes::evidence::EvidenceDetail,
        crate::routes::evidence::UpdateEvidenceRequest,
        crate::routes::evidence::LinksResponse,
        crate::routes::evidence::AppendCustodyRequest,
        crate::routes::evidence::CustodyEntry,
        crate::routes::evidence::DigestResponse,
        // Review DTOs
        crate::routes::review::QueueResponse,
        crate::routes::review::ReviewDetail,
        crate::routes::review::AssignRequest,
        crate::routes::review::DecisionRequest,
        // Package DTOs
        crate::routes::packages::CreatePackageRequest,
        crate::routes::packages::PackageResponse,
        crate::routes::packages::PackageListResponse,
        crate::routes::packages::VerificationResponse,
        // Export DTOs
        crate::routes::exports::ExportRequest,
        crate::routes::exports::ExportHistoryResponse,
        // Audit, scope, options DTOs
        crate::routes::audit::AuditPage,
        crate::routes::scope::VisibilityResponse,
        crate::routes::options::OptionPageResponse,
    )),
    tags(
        (name = "evidence", description = "Evidence intake, records, links, custody and integrity"),
        (name = "review", description = "Review queue and decisions"),
        (name = "packages", description = "Evidence packages and sealing"),
        (name = "exports", description = "CSV, Excel and JSON exports"),
        (name = "audit", description = "Flattened custody log"),
        (name = "scope", description = "Session scope visibility"),
        (name = "options", description = "Paged select options"),
    )
)]
pub struct ApiDoc;

/// Serves the OpenAPI JSON spec at `/openapi.json`.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json: Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_lists_every_route_group() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in [
            "/v1/evidence",
            "/v1/evidence/{id}/verify",
            "/v1/review/{id}/decision",
            "/v1/packages/{id}/seal",
            "/v1/exports",
            "/v1/audit",
            "/v1/scope/visibility",
            "/v1/options/{kind}",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing {expected}"
            );
        }
    }
}
