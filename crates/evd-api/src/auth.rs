//! # Authentication & Authorization Middleware
//!
//! Bearer-token middleware with role-based access control.
//!
//! Each configured [`UserConfig`] owns one token. A request's token is
//! compared in constant time against every configured user; the match
//! becomes a [`CallerIdentity`] in the request extensions, carrying the
//! user's role and their [`SessionScope`] for visibility checks.
//!
//! With no users configured, auth is disabled and every request acts as a
//! national-level `Admin`.

use axum::extract::Request;
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use evd_core::{SessionScope, UserLevel};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use utoipa::ToSchema;

use crate::error::{AppError, ErrorBody};

// ── Role ────────────────────────────────────────────────────────────────────

/// Roles ordered by privilege: `Officer < Reviewer < Admin`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Intake, listing and export.
    Officer,
    /// Review actions on top of officer rights.
    Reviewer,
    /// Delete, package sealing and everything else.
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Officer => "officer",
            Self::Reviewer => "reviewer",
            Self::Admin => "admin",
        }
    }
}

// ── CallerIdentity ──────────────────────────────────────────────────────────

/// The authenticated caller, available to handlers as an extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    /// Display name recorded as the actor on custody events.
    pub name: String,
    pub role: Role,
    pub session: SessionScope,
}

impl CallerIdentity {
    /// The identity used when auth is disabled.
    pub fn system_admin() -> Self {
        Self {
            name: "system".to_string(),
            role: Role::Admin,
            session: SessionScope::national(),
        }
    }

    pub fn has_role(&self, minimum: Role) -> bool {
        self.role >= minimum
    }
}

impl<S: Send + Sync> axum::extract::FromRequestParts<S> for CallerIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CallerIdentity>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("no caller identity in request context".into()))
    }
}

/// 403 unless the caller has at least `minimum`.
pub fn require_role(caller: &CallerIdentity, minimum: Role) -> Result<(), AppError> {
    if caller.has_role(minimum) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "role '{}' required, caller has '{}'",
            minimum.as_str(),
            caller.role.as_str()
        )))
    }
}

// ── Auth Configuration ──────────────────────────────────────────────────────

/// One user entry from the configuration file.
#[derive(Clone, Deserialize)]
pub struct UserConfig {
    pub token: String,
    pub name: String,
    pub role: Role,
    pub level: UserLevel,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
}

impl UserConfig {
    pub fn identity(&self) -> CallerIdentity {
        CallerIdentity {
            name: self.name.clone(),
            role: self.role,
            session: SessionScope {
                level: self.level,
                province: self.province.clone(),
                team: self.team.clone(),
            },
        }
    }
}

impl std::fmt::Debug for UserConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserConfig")
            .field("token", &"[REDACTED]")
            .field("name", &self.name)
            .field("role", &self.role)
            .field("level", &self.level)
            .field("province", &self.province)
            .field("team", &self.team)
            .finish()
    }
}

/// Auth configuration injected into request extensions.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    pub users: Vec<UserConfig>,
}

impl AuthConfig {
    pub fn new(users: Vec<UserConfig>) -> Self {
        Self { users }
    }

    pub fn is_enabled(&self) -> bool {
        !self.users.is_empty()
    }

    /// The user owning `provided`, checking every entry so timing does not
    /// depend on which one matches.
    pub fn authenticate(&self, provided: &str) -> Option<CallerIdentity> {
        let mut found = None;
        for user in &self.users {
            if constant_time_token_eq(provided, &user.token) && found.is_none() {
                found = Some(user.identity());
            }
        }
        found
    }
}

// ── Token Validation ────────────────────────────────────────────────────────

/// Constant-time comparison of bearer tokens.
///
/// On a length mismatch a dummy comparison still runs.
fn constant_time_token_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

// ── Middleware ───────────────────────────────────────────────────────────────

/// Validate the `Authorization: Bearer` header and inject the caller.
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let config = request
        .extensions()
        .get::<AuthConfig>()
        .cloned()
        .unwrap_or_default();

    if !config.is_enabled() {
        request.extensions_mut().insert(CallerIdentity::system_admin());
        return next.run(request).await;
    }

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match auth_header {
        Some(value) => match value.strip_prefix("Bearer ") {
            Some(provided) => match config.authenticate(provided) {
                Some(identity) => {
                    tracing::debug!(user = %identity.name, role = identity.role.as_str(), "authenticated");
                    request.extensions_mut().insert(identity);
                    next.run(request).await
                }
                None => {
                    tracing::warn!("authentication failed: invalid bearer token");
                    unauthorized_response("invalid bearer token")
                }
            },
            None => {
                tracing::warn!("authentication failed: non-Bearer authorization scheme");
                unauthorized_response("authorization header must use Bearer scheme")
            }
        },
        None => {
            tracing::warn!("authentication failed: missing authorization header");
            unauthorized_response("missing authorization header")
        }
    }
}

fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorBody::new("UNAUTHORIZED", message)),
    )
        .into_response()
}
