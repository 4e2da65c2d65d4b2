//! # evd-cli: CLI Tool for the Evidence Stack
//!
//! Provides the `evd` command-line interface over a JSON dataset of evidence
//! records. Without `--data` every command works on a freshly generated mock
//! dataset, so the tool is usable with nothing on disk.
//!
//! ## Subcommands
//!
//! - `evd generate`: Write a seeded mock dataset.
//! - `evd list`: Filtered, sorted, paginated listing.
//! - `evd review`: Review queue with per-status counts.
//! - `evd export`: CSV, Excel-compatible HTML or JSON export file.
//! - `evd scope`: Visible/hidden partition for a session scope.
//! - `evd import`: Batch intake of forms from a JSON file.
//!
//! ```bash
//! evd generate --count 200 --out evidence.json
//! evd --data evidence.json list --status Submitted
//! evd --data evidence.json export --format csv --columns evidenceId,fileName
//! ```

pub mod export;
pub mod generate;
pub mod import;
pub mod list;
pub mod review;
pub mod scope;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use evd_core::{EvidenceItem, EvidenceStatus, LinkEntityType};
use evd_query::{EvidenceFilter, SortDirection, SortKey, SortState};

/// Load the dataset at `path`, or generate the default mock dataset.
pub fn load_dataset(path: Option<&Path>) -> Result<Vec<EvidenceItem>> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read dataset {}", path.display()))?;
            let items: Vec<EvidenceItem> = serde_json::from_str(&text)
                .with_context(|| format!("failed to parse dataset {}", path.display()))?;
            tracing::debug!(path = %path.display(), records = items.len(), "dataset loaded");
            Ok(items)
        }
        None => {
            let items = evd_mock::generate(&evd_mock::MockConfig::default());
            tracing::debug!(records = items.len(), "using generated mock dataset");
            Ok(items)
        }
    }
}

/// Write `items` as pretty JSON.
pub fn save_dataset(path: &Path, items: &[EvidenceItem]) -> Result<()> {
    let json = serde_json::to_string_pretty(items).context("failed to serialize dataset")?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write dataset {}", path.display()))?;
    tracing::debug!(path = %path.display(), records = items.len(), "dataset written");
    Ok(())
}

/// Filter flags shared by `list`, `review` and `export`.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Case-insensitive substring of file name or evidence id.
    #[arg(long)]
    pub search: Option<String>,

    /// Exact province.
    #[arg(long)]
    pub province: Option<String>,

    /// Exact status (Draft, Submitted, InReview, NeedMoreInfo, Approved,
    /// Rejected, Sealed).
    #[arg(long)]
    pub status: Option<String>,

    /// Linked entity type (lead, risk, task, store).
    #[arg(long)]
    pub link_type: Option<String>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> Result<EvidenceFilter> {
        let status = self
            .status
            .as_deref()
            .map(str::parse::<EvidenceStatus>)
            .transpose()
            .map_err(anyhow::Error::msg)?;
        let link_type = self
            .link_type
            .as_deref()
            .map(str::parse::<LinkEntityType>)
            .transpose()
            .map_err(anyhow::Error::msg)?;
        Ok(EvidenceFilter {
            search: self.search.clone(),
            province: self.province.clone(),
            status,
            link_type,
        })
    }
}

/// Sort flags shared by `list`, `review` and `export`.
#[derive(Args, Debug, Clone, Default)]
pub struct SortArgs {
    /// Sort column: uploaded_at, evidence_id, status or province.
    #[arg(long)]
    pub sort: Option<String>,

    /// asc or desc. Defaults to desc for uploaded_at and asc otherwise.
    #[arg(long)]
    pub direction: Option<String>,
}

impl SortArgs {
    pub fn to_state(&self) -> Result<SortState> {
        let Some(key) = self.sort.as_deref() else {
            return match self.direction.as_deref() {
                Some(direction) => Ok(SortState::new(SortKey::UploadedAt, direction.parse()?)),
                None => Ok(SortState::default()),
            };
        };
        let key: SortKey = key.parse()?;
        let direction = match self.direction.as_deref() {
            Some(direction) => direction.parse()?,
            None if key == SortKey::UploadedAt => SortDirection::Desc,
            None => SortDirection::Asc,
        };
        Ok(SortState::new(key, direction))
    }
}

/// Next free sequence number after the highest `EVD-<year>-<seq>` code.
pub fn next_sequence(items: &[EvidenceItem]) -> u64 {
    items
        .iter()
        .filter_map(|item| item.id.as_str().rsplit('-').next()?.parse::<u64>().ok())
        .max()
        .map_or(1, |highest| highest + 1)
}

/// Truncate `s` to `width` characters for table output.
pub(crate) fn fit(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}
