//! # Administrative Scope
//!
//! `Scope` is the geography a record belongs to. `SessionScope` is the
//! caller's position in the hierarchy, passed explicitly to visibility checks.

use serde::{Deserialize, Serialize};

/// Geographic scope of an evidence record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    pub province: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ward: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl Scope {
    /// Scope with only a province set.
    pub fn province(province: impl Into<String>) -> Self {
        Self {
            province: province.into(),
            ..Self::default()
        }
    }

    /// Most specific display label: the ward if set, otherwise the province.
    pub fn display_label(&self) -> &str {
        match self.ward.as_deref() {
            Some(ward) if !ward.is_empty() => ward,
            _ => &self.province,
        }
    }
}

/// Administrative level of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserLevel {
    /// National department; sees everything.
    Cuc,
    /// Provincial branch.
    Chicuc,
    /// District team.
    Doi,
}

impl UserLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cuc => "cuc",
            Self::Chicuc => "chicuc",
            Self::Doi => "doi",
        }
    }
}

impl std::fmt::Display for UserLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cuc" => Ok(Self::Cuc),
            "chicuc" => Ok(Self::Chicuc),
            "doi" => Ok(Self::Doi),
            other => Err(format!("unknown user level: {other:?}")),
        }
    }
}

/// The calling user's place in the administrative hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionScope {
    pub level: UserLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
}

impl SessionScope {
    /// A national-level session.
    pub fn national() -> Self {
        Self {
            level: UserLevel::Cuc,
            province: None,
            team: None,
        }
    }

    /// A provincial session.
    pub fn provincial(province: impl Into<String>) -> Self {
        Self {
            level: UserLevel::Chicuc,
            province: Some(province.into()),
            team: None,
        }
    }

    /// A district-team session.
    pub fn team(province: impl Into<String>, team: impl Into<String>) -> Self {
        Self {
            level: UserLevel::Doi,
            province: Some(province.into()),
            team: Some(team.into()),
        }
    }
}
