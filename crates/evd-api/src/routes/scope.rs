//! # Scope Visibility
//!
//! Partitions every record into visible and hidden sets for a session scope.
//! The scope is the caller's own unless an admin asks for another one through
//! the query string.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use evd_core::{SessionScope, UserLevel};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::auth::{require_role, CallerIdentity, Role};
use crate::error::{AppError, ErrorBody};
use crate::extractors::extract_query;
use crate::state::AppState;

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ScopeQuery {
    /// `cuc`, `chicuc` or `doi`. Setting any field requires the admin role.
    pub level: Option<String>,
    pub province: Option<String>,
    pub team: Option<String>,
}

impl ScopeQuery {
    fn is_override(&self) -> bool {
        self.level.is_some() || self.province.is_some() || self.team.is_some()
    }

    /// The requested session, with unset fields taken from `base`.
    fn session(&self, base: &SessionScope) -> Result<SessionScope, AppError> {
        let level = match self.level.as_deref() {
            Some(level) => level.parse::<UserLevel>().map_err(AppError::Validation)?,
            None => base.level,
        };
        Ok(SessionScope {
            level,
            province: self.province.clone().or_else(|| base.province.clone()),
            team: self.team.clone().or_else(|| base.team.clone()),
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VisibilityResponse {
    #[schema(value_type = Object)]
    pub session: SessionScope,
    /// District a team-level session is restricted to.
    pub district: Option<String>,
    pub visible_count: usize,
    pub hidden_count: usize,
    pub visible: Vec<String>,
    pub hidden: Vec<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/v1/scope/visibility", get(get_visibility))
}

/// GET /v1/scope/visibility: Visible/hidden partition for a session.
#[utoipa::path(
    get,
    path = "/v1/scope/visibility",
    params(ScopeQuery),
    responses(
        (status = 200, description = "Partition", body = VisibilityResponse),
        (status = 403, description = "Overriding the scope requires the admin role", body = ErrorBody),
        (status = 422, description = "Unknown level", body = ErrorBody),
    ),
    tag = "scope"
)]
async fn get_visibility(
    State(state): State<AppState>,
    caller: CallerIdentity,
    query: Result<Query<ScopeQuery>, QueryRejection>,
) -> Result<Json<VisibilityResponse>, AppError> {
    let query = extract_query(query)?;
    let session = if query.is_override() {
        require_role(&caller, Role::Admin)?;
        query.session(&caller.session)?
    } else {
        caller.session.clone()
    };

    let items = state.evidence.list();
    let (visible, hidden) = state.visibility.partition(&session, &items);
    let district = match (session.level, session.team.as_deref()) {
        (UserLevel::Doi, Some(team)) => Some(state.visibility.teams().resolve(team).to_string()),
        _ => None,
    };
    tracing::debug!(level = %session.level, visible = visible.len(), hidden = hidden.len(), "scope partition");
    Ok(Json(VisibilityResponse {
        district,
        visible_count: visible.len(),
        hidden_count: hidden.len(),
        visible: visible.iter().map(|i| i.id.to_string()).collect(),
        hidden: hidden.iter().map(|i| i.id.to_string()).collect(),
        session,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_fills_gaps_from_caller() {
        let base = SessionScope::provincial("Hà Nội");
        let query = ScopeQuery {
            level: Some("doi".into()),
            team: Some("Đội 1".into()),
            ..ScopeQuery::default()
        };
        let session = query.session(&base).unwrap();
        assert_eq!(session.level, UserLevel::Doi);
        assert_eq!(session.province.as_deref(), Some("Hà Nội"));
        assert_eq!(session.team.as_deref(), Some("Đội 1"));
    }

    #[test]
    fn unknown_level_is_rejected() {
        let query = ScopeQuery {
            level: Some("ministry".into()),
            ..ScopeQuery::default()
        };
        assert!(query.session(&SessionScope::national()).is_err());
        assert!(query.is_override());
        assert!(!ScopeQuery::default().is_override());
    }
}
