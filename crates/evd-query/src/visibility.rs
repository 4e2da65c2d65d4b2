//! # Scope Visibility
//!
//! Whether a caller may see a record is a pure function of their
//! [`SessionScope`] and the record's [`Scope`](evd_core::Scope):
//!
//! | Level    | Sees |
//! |----------|------|
//! | `cuc`    | every record |
//! | `chicuc` | records whose province equals the session province |
//! | `doi`    | province matches and district equals the team's district |
//!
//! A team name resolves to a district through [`TeamDistrictMap`]. Names
//! without a mapping are used as the district unchanged. Sessions missing the
//! province (or, for `doi`, the team) see nothing below `cuc`.

use evd_core::{EvidenceItem, SessionScope, UserLevel};
use serde::{Deserialize, Serialize};

/// One team → district mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamDistrict {
    pub team: String,
    pub district: String,
}

/// Ordered team → district lookup. First match wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamDistrictMap(Vec<TeamDistrict>);

impl Default for TeamDistrictMap {
    fn default() -> Self {
        Self::new([
            ("Đội 1", "Ba Đình"),
            ("Đội 2", "Hoàn Kiếm"),
            ("Đội 3", "Đống Đa"),
            ("Đội 4", "Hai Bà Trưng"),
            ("Đội 5", "Cầu Giấy"),
        ])
    }
}

impl TeamDistrictMap {
    pub fn new<I, T, D>(entries: I) -> Self
    where
        I: IntoIterator<Item = (T, D)>,
        T: Into<String>,
        D: Into<String>,
    {
        Self(
            entries
                .into_iter()
                .map(|(team, district)| TeamDistrict {
                    team: team.into(),
                    district: district.into(),
                })
                .collect(),
        )
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn entries(&self) -> &[TeamDistrict] {
        &self.0
    }

    /// District for `team`, or `team` itself if unmapped.
    pub fn resolve<'a>(&'a self, team: &'a str) -> &'a str {
        let team = team.trim();
        self.0
            .iter()
            .find(|entry| entry.team == team)
            .map_or(team, |entry| entry.district.as_str())
    }
}

/// Visibility rules with a configured team lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityPolicy {
    teams: TeamDistrictMap,
}

impl VisibilityPolicy {
    pub fn new(teams: TeamDistrictMap) -> Self {
        Self { teams }
    }

    pub fn teams(&self) -> &TeamDistrictMap {
        &self.teams
    }

    pub fn is_visible(&self, session: &SessionScope, item: &EvidenceItem) -> bool {
        match session.level {
            UserLevel::Cuc => true,
            UserLevel::Chicuc => session
                .province
                .as_deref()
                .is_some_and(|p| item.scope.province == p),
            UserLevel::Doi => {
                let (Some(province), Some(team)) =
                    (session.province.as_deref(), session.team.as_deref())
                else {
                    return false;
                };
                item.scope.province == province
                    && item.scope.district.as_deref() == Some(self.teams.resolve(team))
            }
        }
    }

    /// Split `items` into `(visible, hidden)`, each in input order.
    pub fn partition<'a>(
        &self,
        session: &SessionScope,
        items: &'a [EvidenceItem],
    ) -> (Vec<&'a EvidenceItem>, Vec<&'a EvidenceItem>) {
        items.iter().partition(|item| self.is_visible(session, item))
    }
}

/// [`VisibilityPolicy::is_visible`] with the default team lookup.
pub fn is_visible(session: &SessionScope, item: &EvidenceItem) -> bool {
    VisibilityPolicy::default().is_visible(session, item)
}

/// [`VisibilityPolicy::partition`] with the default team lookup.
pub fn partition<'a>(
    session: &SessionScope,
    items: &'a [EvidenceItem],
) -> (Vec<&'a EvidenceItem>, Vec<&'a EvidenceItem>) {
    VisibilityPolicy::default().partition(session, items)
}
