//! # Select Options
//!
//! Externally paged option lists for searchable selects. Each list is the
//! sorted union of the built-in reference data and the values found in the
//! current records, so newly imported names show up without a restart.

use std::collections::BTreeSet;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use evd_query::{page_options, OptionPage, SelectOption};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::auth::Role;
use crate::error::{AppError, ErrorBody};
use crate::extractors::extract_query;
use crate::state::AppState;

pub const DEFAULT_OPTION_LIMIT: usize = 20;
pub const MAX_OPTION_LIMIT: usize = 100;

/// Which option list to serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Reviewers,
    Provinces,
    Submitters,
}

impl std::str::FromStr for OptionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reviewers" => Ok(Self::Reviewers),
            "provinces" => Ok(Self::Provinces),
            "submitters" => Ok(Self::Submitters),
            other => Err(format!("unknown option list: {other}")),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OptionQuery {
    /// Case-insensitive label substring.
    pub search: Option<String>,
    pub offset: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OptionPageResponse {
    #[schema(value_type = Vec<Object>)]
    pub items: Vec<SelectOption>,
    pub offset: usize,
    pub total: usize,
    pub has_more: bool,
}

impl From<OptionPage> for OptionPageResponse {
    fn from(page: OptionPage) -> Self {
        Self {
            items: page.items,
            offset: page.offset,
            total: page.total,
            has_more: page.has_more,
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/v1/options/{kind}", get(get_options))
}

fn collect_options(state: &AppState, kind: OptionKind) -> Vec<SelectOption> {
    let mut values: BTreeSet<String> = BTreeSet::new();
    match kind {
        OptionKind::Reviewers => {
            values.extend(evd_mock::REVIEWERS.iter().map(|s| s.to_string()));
            values.extend(
                state
                    .config
                    .auth
                    .users
                    .iter()
                    .filter(|u| u.role >= Role::Reviewer)
                    .map(|u| u.name.clone()),
            );
            state.evidence.read(|map| {
                values.extend(
                    map.values()
                        .filter_map(|i| i.review.assigned_reviewer.clone()),
                );
            });
        }
        OptionKind::Provinces => {
            values.extend(evd_mock::PROVINCES.iter().map(|p| p.name.to_string()));
            state.evidence.read(|map| {
                values.extend(map.values().map(|i| i.scope.province.clone()));
            });
        }
        OptionKind::Submitters => {
            values.extend(evd_mock::SUBMITTERS.iter().map(|s| s.to_string()));
            state.evidence.read(|map| {
                values.extend(map.values().map(|i| i.submitted_by.clone()));
            });
        }
    }
    values
        .into_iter()
        .filter(|v| !v.trim().is_empty())
        .map(|v| SelectOption::new(v.clone(), v))
        .collect()
}

/// GET /v1/options/{kind}: One page of `reviewers`, `provinces` or `submitters`.
#[utoipa::path(
    get,
    path = "/v1/options/{kind}",
    params(
        ("kind" = String, Path, description = "reviewers, provinces or submitters"),
        OptionQuery,
    ),
    responses(
        (status = 200, description = "Option page", body = OptionPageResponse),
        (status = 404, description = "Unknown option list", body = ErrorBody),
        (status = 422, description = "Limit out of range", body = ErrorBody),
    ),
    tag = "options"
)]
async fn get_options(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    query: Result<Query<OptionQuery>, QueryRejection>,
) -> Result<Json<OptionPageResponse>, AppError> {
    let kind: OptionKind = kind.parse().map_err(AppError::NotFound)?;
    let query = extract_query(query)?;
    let limit = query.limit.unwrap_or(DEFAULT_OPTION_LIMIT);
    if limit == 0 || limit > MAX_OPTION_LIMIT {
        return Err(AppError::Validation(format!(
            "limit must be between 1 and {MAX_OPTION_LIMIT}"
        )));
    }
    let options = collect_options(&state, kind);
    let page = page_options(
        &options,
        query.search.as_deref().unwrap_or(""),
        query.offset.unwrap_or(0),
        limit,
    );
    Ok(Json(page.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_parse() {
        assert_eq!("reviewers".parse::<OptionKind>(), Ok(OptionKind::Reviewers));
        assert_eq!("provinces".parse::<OptionKind>(), Ok(OptionKind::Provinces));
        assert!("teams".parse::<OptionKind>().is_err());
    }

    #[test]
    fn provinces_include_reference_data_without_records() {
        let state = AppState::new();
        let options = collect_options(&state, OptionKind::Provinces);
        assert_eq!(options.len(), evd_mock::PROVINCES.len());
        let mut labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
        let sorted = {
            let mut s = labels.clone();
            s.sort_unstable();
            s
        };
        assert_eq!(labels, sorted);
        labels.dedup();
        assert_eq!(labels.len(), options.len());
    }

    #[test]
    fn submitters_include_record_values() {
        let state = AppState::new();
        state
            .seed(evd_mock::generate(&evd_mock::MockConfig::with_count(3)))
            .unwrap();
        let mut item = state.evidence.list().remove(0);
        item.submitted_by = "Zeta Officer".into();
        state.evidence.insert(item.id.clone(), item);
        let options = collect_options(&state, OptionKind::Submitters);
        assert!(options.iter().any(|o| o.value == "Zeta Officer"));
    }
}
