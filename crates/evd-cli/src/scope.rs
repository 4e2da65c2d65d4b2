//! # Scope Subcommand
//!
//! Shows which records a session at a given administrative level can see.
//! The team → district lookup can be replaced with a YAML file:
//!
//! ```yaml
//! - team: "Đội 1"
//!   district: "Ba Đình"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use evd_core::{SessionScope, UserLevel};
use evd_query::{TeamDistrictMap, VisibilityPolicy};

/// Arguments for `evd scope`.
#[derive(Args, Debug)]
pub struct ScopeArgs {
    /// cuc, chicuc or doi.
    #[arg(long, default_value = "cuc")]
    pub level: String,

    #[arg(long)]
    pub province: Option<String>,

    /// Team name, required for `doi`.
    #[arg(long)]
    pub team: Option<String>,

    /// YAML team → district mapping.
    #[arg(long)]
    pub teams: Option<PathBuf>,

    /// List the ids on each side of the partition.
    #[arg(long)]
    pub ids: bool,
}

pub fn run_scope(args: &ScopeArgs, data: Option<&Path>) -> Result<u8> {
    let items = crate::load_dataset(data)?;
    let session = session(args)?;
    let policy = VisibilityPolicy::new(load_teams(args.teams.as_deref())?);
    let (visible, hidden) = policy.partition(&session, &items);

    println!("Session: {}", describe(&session));
    if let Some(team) = session.team.as_deref() {
        println!("District: {}", policy.teams().resolve(team));
    }
    println!("Visible: {}  Hidden: {}", visible.len(), hidden.len());
    if args.ids {
        for item in &visible {
            println!("  + {}", item.id);
        }
        for item in &hidden {
            println!("  - {}", item.id);
        }
    }
    Ok(0)
}

fn session(args: &ScopeArgs) -> Result<SessionScope> {
    let level: UserLevel = args.level.parse().map_err(anyhow::Error::msg)?;
    if level != UserLevel::Cuc && args.province.is_none() {
        bail!("--province is required for level {level}");
    }
    if level == UserLevel::Doi && args.team.is_none() {
        bail!("--team is required for level doi");
    }
    Ok(SessionScope {
        level,
        province: args.province.clone(),
        team: args.team.clone(),
    })
}

fn load_teams(path: Option<&Path>) -> Result<TeamDistrictMap> {
    let Some(path) = path else {
        return Ok(TeamDistrictMap::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read team map {}", path.display()))?;
    serde_yaml::from_str(&text)
        .with_context(|| format!("failed to parse team map {}", path.display()))
}

fn describe(session: &SessionScope) -> String {
    let mut parts = vec![session.level.to_string()];
    parts.extend(session.province.clone());
    parts.extend(session.team.clone());
    parts.join(" / ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(level: &str) -> ScopeArgs {
        ScopeArgs {
            level: level.to_string(),
            province: None,
            team: None,
            teams: None,
            ids: false,
        }
    }

    #[test]
    fn provincial_session_needs_province() {
        assert!(session(&args("chicuc")).is_err());
        let mut a = args("chicuc");
        a.province = Some("Hà Nội".into());
        assert_eq!(session(&a).unwrap(), SessionScope::provincial("Hà Nội"));
    }

    #[test]
    fn team_session_needs_team() {
        let mut a = args("doi");
        a.province = Some("Hà Nội".into());
        assert!(session(&a).is_err());
        a.team = Some("Đội 1".into());
        assert_eq!(session(&a).unwrap(), SessionScope::team("Hà Nội", "Đội 1"));
    }

    #[test]
    fn unknown_level_is_an_error() {
        assert!(session(&args("region")).is_err());
    }

    #[test]
    fn team_map_loads_from_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("teams.yaml");
        std::fs::write(&path, "- team: Alpha\n  district: Tây Hồ\n").unwrap();
        let map = load_teams(Some(&path)).unwrap();
        assert_eq!(map.resolve("Alpha"), "Tây Hồ");
        assert_eq!(map.resolve("Đội 1"), "Đội 1");
    }

    #[test]
    fn national_session_runs() {
        let mut a = args("cuc");
        a.ids = true;
        assert_eq!(run_scope(&a, None).unwrap(), 0);
    }

    #[test]
    fn describe_joins_parts() {
        assert_eq!(
            describe(&SessionScope::team("Hà Nội", "Đội 2")),
            "doi / Hà Nội / Đội 2"
        );
    }
}
