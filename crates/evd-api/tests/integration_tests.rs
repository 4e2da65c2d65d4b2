//! # Integration Tests for evd-api
//!
//! Drives the assembled router with `oneshot` requests: listing and
//! filtering, intake and import, exports, integrity checks, review, packages,
//! scope visibility, authentication and the fallback.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use evd_api::auth::{AuthConfig, Role, UserConfig};
use evd_api::state::{AppConfig, AppState};
use evd_core::{
    EvidenceId, EvidenceItem, EvidenceStatus, EvidenceType, FileMetadata, Scope, Timestamp,
    UserLevel,
};

fn item(seq: u64, status: EvidenceStatus, province: &str, file_name: &str) -> EvidenceItem {
    let mut item = EvidenceItem::new(
        EvidenceId::generate(2026, seq),
        EvidenceType::Photo,
        FileMetadata {
            name: file_name.to_string(),
            mime_type: "image/jpeg".to_string(),
            size_bytes: 1024,
        },
        Scope::province(province),
        "Nguyễn Văn A",
        Timestamp::parse(&format!("2026-01-{:02}T08:00:00Z", seq)).unwrap(),
    );
    item.status = status;
    item
}

fn three_item_state() -> AppState {
    let state = AppState::new();
    state.seed(vec![
        item(1, EvidenceStatus::Draft, "Hà Nội", "IMG_0001.jpg"),
        item(2, EvidenceStatus::Submitted, "Hà Nội", "IMG_0002.jpg"),
        item(3, EvidenceStatus::Approved, "Đà Nẵng", "IMG_0003.jpg"),
    ])
    .unwrap();
    state
}

/// Helper: build the test app with auth disabled.
fn test_app() -> (axum::Router, AppState) {
    let state = three_item_state();
    (evd_api::app(state.clone()), state)
}

fn user(token: &str, name: &str, role: Role, level: UserLevel, province: Option<&str>) -> UserConfig {
    UserConfig {
        token: token.to_string(),
        name: name.to_string(),
        role,
        level,
        province: province.map(str::to_string),
        team: None,
    }
}

/// Helper: build the test app with an officer, a provincial reviewer and an
/// admin configured.
fn test_app_with_auth() -> axum::Router {
    let config = AppConfig {
        auth: AuthConfig::new(vec![
            user("officer-token", "Officer", Role::Officer, UserLevel::Doi, Some("Hà Nội")),
            user("hn-token", "Reviewer HN", Role::Reviewer, UserLevel::Chicuc, Some("Hà Nội")),
            user("admin-token", "Admin", Role::Admin, UserLevel::Cuc, None),
        ]),
        ..AppConfig::default()
    };
    let state = AppState::with_config(config);
    state.seed(three_item_state().evidence.list()).unwrap();
    evd_api::app(state)
}

async fn body_string(response: axum::http::Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: axum::http::Response<Body>) -> Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_bytes(uri: &str, bytes: &'static [u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .body(Body::from(bytes))
        .unwrap()
}

fn with_token(mut request: Request<Body>, token: &str) -> Request<Body> {
    request.headers_mut().insert(
        header::AUTHORIZATION,
        format!("Bearer {token}").parse().unwrap(),
    );
    request
}

// -- Health, metrics, OpenAPI -------------------------------------------------

#[tokio::test]
async fn test_health_probes() {
    let (app, _) = test_app();
    let response = app.clone().oneshot(get("/health/liveness")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");

    let response = app.oneshot(get("/health/readiness")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ready");
}

#[tokio::test]
async fn test_metrics_and_openapi_are_served() {
    let (app, _) = test_app();
    let response = app.clone().oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/openapi.json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let spec = body_json(response).await;
    assert!(spec["paths"]["/v1/evidence"].is_object());
}

#[tokio::test]
async fn test_unknown_path_is_structured_404() {
    let (app, _) = test_app();
    let response = app.oneshot(get("/evidence/legacy")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

// -- Listing ------------------------------------------------------------------

#[tokio::test]
async fn test_status_filter_end_to_end() {
    let (app, _) = test_app();
    let response = app
        .oneshot(get("/v1/evidence?status=Submitted&page_size=20"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_json(response).await;
    assert_eq!(page["total_items"], 1);
    assert_eq!(page["page"], 1);
    assert_eq!(page["total_pages"], 1);
    assert_eq!(page["items"][0]["id"], "EVD-2026-000002");
}

#[tokio::test]
async fn test_list_is_newest_first_and_paginated() {
    let (app, _) = test_app();
    let response = app
        .oneshot(get("/v1/evidence?page=2&page_size=2"))
        .await
        .unwrap();
    let page = body_json(response).await;
    assert_eq!(page["total_items"], 3);
    assert_eq!(page["total_pages"], 2);
    let items = page["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], "EVD-2026-000001");
}

#[tokio::test]
async fn test_unknown_status_is_422_and_bad_page_size_is_422() {
    let (app, _) = test_app();
    let response = app
        .clone()
        .oneshot(get("/v1/evidence?status=Archived"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = app.oneshot(get("/v1/evidence?page_size=0")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// -- Intake and import --------------------------------------------------------

#[tokio::test]
async fn test_create_then_fetch_evidence() {
    let (app, state) = test_app();
    let response = app
        .clone()
        .oneshot(post_json(
            "/v1/evidence",
            json!({
                "file_name": "VID_0042.mp4",
                "mime_type": "video/mp4",
                "address": "12 Lý Thái Tổ",
                "province": "Hà Nội",
                "district": "Hoàn Kiếm",
                "submit": true
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let id = created["evidence"]["id"].as_str().unwrap().to_string();
    assert!(id.ends_with("-000004"));
    assert_eq!(created["evidence"]["status"], "Submitted");
    assert_eq!(state.evidence.len(), 4);

    let response = app
        .oneshot(get(&format!("/v1/evidence/{id}/custody")))
        .await
        .unwrap();
    let custody = body_json(response).await;
    assert_eq!(custody[0]["event"]["event_type"], "Upload");
}

#[tokio::test]
async fn test_create_requires_address() {
    let (app, _) = test_app();
    let response = app
        .oneshot(post_json(
            "/v1/evidence",
            json!({ "file_name": "a.jpg", "address": "  ", "province": "Hà Nội" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_malformed_json_is_400() {
    let (app, _) = test_app();
    let request = Request::builder()
        .method("POST")
        .uri("/v1/evidence")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_import_reports_progress_and_rejections() {
    let (app, state) = test_app();
    let response = app
        .oneshot(post_json(
            "/v1/evidence/import",
            json!({ "items": [
                { "file_name": "a.jpg", "address": "1 Tràng Tiền", "province": "Hà Nội" },
                { "file_name": "", "address": "2 Tràng Tiền", "province": "Hà Nội" },
                { "file_name": "c.pdf", "address": "3 Tràng Tiền", "province": "Hà Nội" }
            ]}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let report = body_json(response).await;
    assert_eq!(report["accepted"].as_array().unwrap().len(), 2);
    assert_eq!(report["rejected"][0]["index"], 1);
    let percents: Vec<u64> = report["progress"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["percent"].as_u64().unwrap())
        .collect();
    assert_eq!(percents, vec![33, 66, 100]);
    assert_eq!(state.evidence.len(), 5);
}

#[tokio::test]
async fn test_import_progress_counts_unconvertible_rows() {
    let (app, state) = test_app();
    let response = app
        .oneshot(post_json(
            "/v1/evidence/import",
            json!({ "items": [
                { "file_name": "a.jpg", "address": "1 Tràng Tiền", "province": "Hà Nội" },
                { "file_name": "b.jpg", "address": "2 Tràng Tiền", "type": "HOLOGRAM" },
                { "file_name": "c.pdf", "address": "3 Tràng Tiền", "province": "Hà Nội" }
            ]}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let report = body_json(response).await;
    assert_eq!(report["accepted"].as_array().unwrap().len(), 2);
    assert_eq!(report["rejected"].as_array().unwrap().len(), 1);
    assert_eq!(report["rejected"][0]["index"], 1);
    let progress = report["progress"].as_array().unwrap();
    assert_eq!(progress.len(), 3);
    assert!(progress.iter().all(|p| p["total"] == 3));
    assert_eq!(progress[2]["processed"], 3);
    assert_eq!(progress[2]["percent"], 100);
    assert_eq!(state.evidence.len(), 5);
}

// -- Update and delete --------------------------------------------------------

#[tokio::test]
async fn test_update_logs_edit_event() {
    let (app, state) = test_app();
    let request = Request::builder()
        .method("PUT")
        .uri("/v1/evidence/EVD-2026-000001")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"sensitivity":"Restricted","tags":["night"]}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let id = EvidenceId::generate(2026, 1);
    let stored = state.evidence.get(&id).unwrap();
    assert_eq!(stored.tags, vec!["night".to_string()]);
    let last = stored.custody.last().unwrap();
    assert_eq!(last.event_type.as_str(), "Edit");
}

#[tokio::test]
async fn test_delete_unknown_is_404() {
    let (app, _) = test_app();
    let request = Request::builder()
        .method("DELETE")
        .uri("/v1/evidence/EVD-2026-999999")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleted_record_stays_in_audit_log() {
    let (app, state) = test_app();
    app.clone()
        .oneshot(post_json(
            "/v1/evidence/EVD-2026-000001/custody",
            json!({ "event_type": "View", "action": "Opened detail" }),
        ))
        .await
        .unwrap();
    let request = Request::builder()
        .method("DELETE")
        .uri("/v1/evidence/EVD-2026-000001")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(state.evidence.get(&EvidenceId::generate(2026, 1)).is_none());

    let response = app
        .oneshot(get("/v1/audit?evidence_id=EVD-2026-000001"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_json(response).await;
    assert_eq!(page["total_items"], 2);
    let types: Vec<&str> = page["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["event_type"].as_str().unwrap())
        .collect();
    assert!(types.contains(&"View"));
    assert!(types.contains(&"Delete"));
}

// -- Integrity ----------------------------------------------------------------

#[tokio::test]
async fn test_content_hash_and_verify() {
    let (app, state) = test_app();
    let response = app
        .clone()
        .oneshot(post_bytes("/v1/evidence/EVD-2026-000002/content", b"original bytes"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let digest = body_json(response).await;
    assert!(digest["sha256"].as_str().unwrap().starts_with("sha256:"));

    let response = app
        .clone()
        .oneshot(post_bytes("/v1/evidence/EVD-2026-000002/verify", b"original bytes"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(post_bytes("/v1/evidence/EVD-2026-000002/verify", b"tampered bytes"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "INTEGRITY_MISMATCH");

    let stored = state.evidence.get(&EvidenceId::generate(2026, 2)).unwrap();
    let verifies = stored
        .custody
        .iter()
        .filter(|e| e.event_type.as_str() == "Verify")
        .count();
    assert_eq!(verifies, 2);
}

#[tokio::test]
async fn test_verify_without_hash_is_409() {
    let (app, _) = test_app();
    let response = app
        .oneshot(post_bytes("/v1/evidence/EVD-2026-000001/verify", b"anything"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// -- Exports ------------------------------------------------------------------

#[tokio::test]
async fn test_csv_export_quotes_fields() {
    let state = AppState::new();
    state.seed(vec![item(
        7,
        EvidenceStatus::Submitted,
        "Hà Nội",
        r#"He said "hi", bye"#,
    )])
    .unwrap();
    let app = evd_api::app(state.clone());

    let response = app
        .clone()
        .oneshot(post_json(
            "/v1/exports",
            json!({ "format": "csv", "columns": ["evidenceId", "fileName"] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/csv"));
    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"evidence-export_"));
    assert_eq!(response.headers()["x-export-rows"], "1");

    let body = body_string(response).await;
    assert!(body.starts_with('\u{feff}'));
    assert!(body.contains(r#"EVD-2026-000007,"He said ""hi"", bye""#));

    let response = app.oneshot(get("/v1/exports")).await.unwrap();
    let history = body_json(response).await;
    assert_eq!(history["exports"].as_array().unwrap().len(), 1);
    assert_eq!(history["exports"][0]["format"], "csv");

    let stored = state.evidence.get(&EvidenceId::generate(2026, 7)).unwrap();
    assert!(stored.custody.iter().any(|e| e.event_type.as_str() == "Export"));
}

#[tokio::test]
async fn test_json_export_keeps_column_order() {
    let (app, _) = test_app();
    let response = app
        .oneshot(post_json(
            "/v1/exports",
            json!({
                "format": "json",
                "columns": ["status", "evidenceId"],
                "evidence_ids": ["EVD-2026-000003"]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    let status_at = body.find("\"status\"").unwrap();
    let id_at = body.find("\"evidenceId\"").unwrap();
    assert!(status_at < id_at);
    let rows: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(rows[0]["evidenceId"], "EVD-2026-000003");
}

#[tokio::test]
async fn test_export_drops_repeated_ids() {
    let (app, state) = test_app();
    let response = app
        .oneshot(post_json(
            "/v1/exports",
            json!({
                "format": "json",
                "columns": ["evidenceId"],
                "evidence_ids": ["EVD-2026-000002", "EVD-2026-000001", "EVD-2026-000002"]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-export-rows"], "2");
    let rows: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(rows.as_array().unwrap().len(), 2);
    assert_eq!(rows[0]["evidenceId"], "EVD-2026-000002");
    assert_eq!(rows[1]["evidenceId"], "EVD-2026-000001");

    let exported = state.evidence.get(&EvidenceId::generate(2026, 2)).unwrap();
    let export_events = exported
        .custody
        .iter()
        .filter(|e| e.event_type.as_str() == "Export")
        .count();
    assert_eq!(export_events, 1);
}

#[tokio::test]
async fn test_export_with_unknown_format_is_422() {
    let (app, _) = test_app();
    let response = app
        .oneshot(post_json("/v1/exports", json!({ "format": "pdf" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// -- Review -------------------------------------------------------------------

#[tokio::test]
async fn test_review_assign_and_approve() {
    let (app, state) = test_app();
    let response = app.clone().oneshot(get("/v1/review")).await.unwrap();
    let queue = body_json(response).await;
    assert_eq!(queue["summary"]["total"], 1);
    assert_eq!(queue["summary"]["unassigned"], 1);

    let response = app
        .clone()
        .oneshot(post_json(
            "/v1/review/EVD-2026-000002/assign",
            json!({ "reviewer": "Đỗ Thị Mai" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(post_json(
            "/v1/review/EVD-2026-000002/decision",
            json!({ "decision": "approve", "comment": "Clear image" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let detail = body_json(response).await;
    assert_eq!(detail["detail"]["evidence"]["status"], "Approved");
    assert_eq!(detail["history"].as_array().unwrap().len(), 2);

    let stored = state.evidence.get(&EvidenceId::generate(2026, 2)).unwrap();
    assert_eq!(stored.review.assigned_reviewer.as_deref(), Some("Đỗ Thị Mai"));
    assert_eq!(stored.review.comment.as_deref(), Some("Clear image"));
}

// -- Packages -----------------------------------------------------------------

#[tokio::test]
async fn test_package_create_verify_and_seal_once() {
    let (app, state) = test_app();
    let response = app
        .clone()
        .oneshot(post_json(
            "/v1/packages",
            json!({
                "name": "Case 12",
                "evidence_ids": ["EVD-2026-000001", "EVD-2026-000003"]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["item_count"], 2);
    let package_id = created["package"]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(post_json(&format!("/v1/packages/{package_id}/verify"), json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["verification"]["valid"], true);

    let seal = || post_json(&format!("/v1/packages/{package_id}/seal"), json!({}));
    let response = app.clone().oneshot(seal()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let response = app.oneshot(seal()).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let stored = state.evidence.get(&EvidenceId::generate(2026, 3)).unwrap();
    assert_eq!(stored.status, EvidenceStatus::Sealed);
}

#[tokio::test]
async fn test_package_with_unknown_member_is_422() {
    let (app, _) = test_app();
    let response = app
        .oneshot(post_json(
            "/v1/packages",
            json!({ "name": "Case 13", "evidence_ids": ["EVD-2026-000404"] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// -- Audit and options --------------------------------------------------------

#[tokio::test]
async fn test_audit_filters_by_event_type() {
    let (app, _) = test_app();
    app.clone()
        .oneshot(post_json(
            "/v1/evidence/EVD-2026-000001/custody",
            json!({ "event_type": "View", "action": "Opened detail" }),
        ))
        .await
        .unwrap();
    let response = app.oneshot(get("/v1/audit?event_type=View")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_json(response).await;
    assert_eq!(page["total_items"], 1);
    assert_eq!(page["items"][0]["actor"], "system");
}

#[tokio::test]
async fn test_option_pages() {
    let (app, _) = test_app();
    let response = app
        .clone()
        .oneshot(get("/v1/options/provinces?limit=2"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_json(response).await;
    assert_eq!(page["items"].as_array().unwrap().len(), 2);
    assert_eq!(page["has_more"], true);

    let response = app.oneshot(get("/v1/options/teams")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// -- Auth and scope -----------------------------------------------------------

#[tokio::test]
async fn test_missing_token_is_401() {
    let app = test_app_with_auth();
    let response = app.oneshot(get("/v1/evidence")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_needs_no_token() {
    let app = test_app_with_auth();
    let response = app.oneshot(get("/health/liveness")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_officer_cannot_delete_or_review() {
    let app = test_app_with_auth();
    let request = Request::builder()
        .method("DELETE")
        .uri("/v1/evidence/EVD-2026-000001")
        .body(Body::empty())
        .unwrap();
    let response = app
        .clone()
        .oneshot(with_token(request, "officer-token"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let request = post_json(
        "/v1/review/EVD-2026-000002/decision",
        json!({ "decision": "reject" }),
    );
    let response = app
        .oneshot(with_token(request, "officer-token"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_can_delete() {
    let app = test_app_with_auth();
    let request = Request::builder()
        .method("DELETE")
        .uri("/v1/evidence/EVD-2026-000001")
        .body(Body::empty())
        .unwrap();
    let response = app
        .oneshot(with_token(request, "admin-token"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_provincial_scope_partitions_by_province() {
    let app = test_app_with_auth();
    let response = app
        .clone()
        .oneshot(with_token(get("/v1/scope/visibility"), "hn-token"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let partition = body_json(response).await;
    assert_eq!(partition["visible_count"], 2);
    assert_eq!(partition["hidden_count"], 1);
    assert_eq!(partition["hidden"][0], "EVD-2026-000003");

    // Only admins may look through another scope.
    let response = app
        .clone()
        .oneshot(with_token(get("/v1/scope/visibility?level=cuc"), "hn-token"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(with_token(get("/v1/scope/visibility"), "admin-token"))
        .await
        .unwrap();
    let partition = body_json(response).await;
    assert_eq!(partition["visible_count"], 3);
    assert_eq!(partition["hidden_count"], 0);
}

#[tokio::test]
async fn test_scoped_list_hides_other_provinces() {
    let app = test_app_with_auth();
    let response = app
        .oneshot(with_token(get("/v1/evidence?scoped=true"), "hn-token"))
        .await
        .unwrap();
    let page = body_json(response).await;
    assert_eq!(page["total_items"], 2);
}
