//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps domain errors from `evd-core`, `evd-query` and `evd-export` to HTTP
//! status codes with a JSON body of error code, message and optional details.
//! Internal error messages are logged and never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use evd_core::EvidenceError;
use evd_export::ExportError;
use evd_query::QueryError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g. "NOT_FOUND", "VALIDATION_ERROR").
    pub code: String,
    pub message: String,
    /// Extra context for client errors only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorBody {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.to_string(),
                message: message.into(),
                details: None,
            },
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    /// 404.
    #[error("not found: {0}")]
    NotFound(String),

    /// 422.
    #[error("validation error: {0}")]
    Validation(String),

    /// Unparseable body or query (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Missing or invalid token (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Insufficient role (403).
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Conflict with current resource state (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Recomputed digest differs from the recorded one (409).
    #[error("integrity mismatch for {subject}")]
    Integrity {
        subject: String,
        expected: String,
        actual: String,
    },

    /// 500. The message is logged, not returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::Integrity { .. } => (StatusCode::CONFLICT, "INTEGRITY_MISMATCH"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            Self::Integrity {
                expected, actual, ..
            } => Some(serde_json::json!({ "expected": expected, "actual": actual })),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        if matches!(&self, Self::Internal(_)) {
            tracing::error!(error = %self, "internal server error");
        }

        let mut body = ErrorBody::new(code, message);
        body.error.details = self.details();

        (status, Json(body)).into_response()
    }
}

impl From<EvidenceError> for AppError {
    fn from(err: EvidenceError) -> Self {
        match err {
            EvidenceError::Integrity {
                subject,
                expected,
                actual,
            } => Self::Integrity {
                subject,
                expected,
                actual,
            },
            EvidenceError::MissingHash(_) => Self::Conflict(err.to_string()),
            EvidenceError::Validation(msg) => Self::Validation(msg),
            EvidenceError::Canonicalization(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<QueryError> for AppError {
    fn from(err: QueryError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::NoColumns => Self::Validation(err.to_string()),
            ExportError::Serialization(_) => Self::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn response_parts(err: AppError) -> (StatusCode, ErrorBody) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        (status, body)
    }

    #[tokio::test]
    async fn not_found_maps_to_404() {
        let (status, body) = response_parts(AppError::NotFound("EVD-2026-000001".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error.code, "NOT_FOUND");
        assert!(body.error.message.contains("EVD-2026-000001"));
    }

    #[tokio::test]
    async fn validation_maps_to_422() {
        let (status, body) = response_parts(AppError::Validation("address must not be empty".into())).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.error.code, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn internal_message_is_hidden() {
        let (status, body) = response_parts(AppError::Internal("lock poisoned at foo.rs".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error.message, "An internal error occurred");
        assert!(body.error.details.is_none());
    }

    #[tokio::test]
    async fn integrity_carries_both_digests() {
        let err: AppError = EvidenceError::Integrity {
            subject: "EVD-2026-000001".into(),
            expected: "aa".into(),
            actual: "bb".into(),
        }
        .into();
        let (status, body) = response_parts(err).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.error.code, "INTEGRITY_MISMATCH");
        let details = body.error.details.unwrap();
        assert_eq!(details["expected"], "aa");
        assert_eq!(details["actual"], "bb");
    }

    #[test]
    fn domain_errors_map_to_client_codes() {
        assert!(matches!(
            AppError::from(QueryError::InvalidPageSize(0)),
            AppError::Validation(_)
        ));
        assert!(matches!(
            AppError::from(ExportError::NoColumns),
            AppError::Validation(_)
        ));
        assert!(matches!(
            AppError::from(EvidenceError::MissingHash("x".into())),
            AppError::Conflict(_)
        ));
    }
}
