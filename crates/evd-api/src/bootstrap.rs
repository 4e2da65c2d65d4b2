//! # Startup Configuration
//!
//! Builds [`AppConfig`] from the environment and an optional YAML file,
//! then builds the [`AppState`] the server runs with.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `PORT` | `8080` | listen port |
//! | `EVD_CONFIG` | unset | YAML file with users, team districts and rate limit |
//! | `EVD_SEED_COUNT` | `60` | mock records generated at startup |
//! | `EVD_SEED` | `20260101` | mock generator seed |
//! | `EVD_METRICS_ENABLED` | `true` | install the Prometheus recorder |
//!
//! Unparseable numeric variables fail startup rather than silently falling
//! back.

use std::path::{Path, PathBuf};

use evd_mock::MockConfig;
use evd_query::TeamDistrictMap;
use serde::Deserialize;

use crate::auth::{AuthConfig, UserConfig};
use crate::middleware::rate_limit::RateLimitConfig;
use crate::state::{AppConfig, AppState};

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("config file not found: {path}")]
    ConfigNotFound { path: String },

    #[error("invalid config file {path}: {reason}")]
    InvalidConfig { path: String, reason: String },

    #[error("invalid value for {name}: {value:?}")]
    InvalidEnv { name: &'static str, value: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to load startup records: {0}")]
    Seed(String),
}

/// Contents of the `EVD_CONFIG` file. Every section is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub users: Vec<UserConfig>,
    pub team_districts: Option<TeamDistrictMap>,
    pub rate_limit: Option<RateLimitConfig>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self, BootstrapError> {
        if !path.exists() {
            return Err(BootstrapError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text).map_err(|reason| BootstrapError::InvalidConfig {
            path: path.display().to_string(),
            reason,
        })
    }

    pub fn parse(text: &str) -> Result<Self, String> {
        let file: Self = serde_yaml::from_str(text).map_err(|e| e.to_string())?;
        file.validate()?;
        Ok(file)
    }

    fn validate(&self) -> Result<(), String> {
        let mut errors = Vec::new();
        for (i, user) in self.users.iter().enumerate() {
            if user.token.trim().is_empty() {
                errors.push(format!("users[{i}]: token must not be empty"));
            }
            if user.name.trim().is_empty() {
                errors.push(format!("users[{i}]: name must not be empty"));
            }
        }
        if let Some(limit) = &self.rate_limit {
            if limit.window_secs == 0 {
                errors.push("rate_limit.window_secs must be at least 1".to_string());
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors.join("; "))
        }
    }

    fn apply(self, config: &mut AppConfig) {
        config.auth = AuthConfig::new(self.users);
        if let Some(teams) = self.team_districts {
            config.team_districts = teams;
        }
        if let Some(limit) = self.rate_limit {
            config.rate_limit = limit;
        }
    }
}

fn env_parse<T: std::str::FromStr>(
    name: &'static str,
    default: T,
) -> Result<T, BootstrapError> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| BootstrapError::InvalidEnv { name, value }),
        Err(_) => Ok(default),
    }
}

impl AppConfig {
    /// Read the environment and the optional config file.
    pub fn from_env() -> Result<Self, BootstrapError> {
        let defaults = AppConfig::default();
        let mut config = AppConfig {
            port: env_parse("PORT", defaults.port)?,
            seed_count: env_parse("EVD_SEED_COUNT", defaults.seed_count)?,
            seed: env_parse("EVD_SEED", defaults.seed)?,
            metrics_enabled: env_parse("EVD_METRICS_ENABLED", defaults.metrics_enabled)?,
            ..defaults
        };
        if let Ok(path) = std::env::var("EVD_CONFIG") {
            let path = PathBuf::from(path);
            ConfigFile::load(&path)?.apply(&mut config);
            tracing::info!(path = %path.display(), "loaded config file");
        }
        Ok(config)
    }
}

/// Build the state and load startup mock data.
pub fn bootstrap(config: AppConfig) -> Result<AppState, BootstrapError> {
    let mock = MockConfig {
        count: config.seed_count,
        seed: config.seed,
        ..MockConfig::default()
    };
    log_banner(&config);
    let state = AppState::with_config(config);
    if mock.count > 0 {
        state
            .seed(evd_mock::generate(&mock))
            .map_err(|e| BootstrapError::Seed(e.to_string()))?;
    }
    tracing::info!(records = state.evidence.len(), "evidence store ready");
    Ok(state)
}

fn log_banner(config: &AppConfig) {
    tracing::info!(
        port = config.port,
        auth = if config.auth.is_enabled() { "enabled" } else { "disabled" },
        users = config.auth.users.len(),
        teams = config.team_districts.entries().len(),
        rate_limit = config.rate_limit.max_requests,
        rate_window_secs = config.rate_limit.window_secs,
        metrics = config.metrics_enabled,
        "evidence API configuration"
    );
}
