//! # Export Subcommand
//!
//! Renders the filtered dataset (or an explicit id list) as CSV,
//! Excel-compatible HTML or JSON and writes it to a file named the way the
//! API names downloads.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use evd_core::{EvidenceId, EvidenceItem};
use evd_export::{ColumnKey, ExportFile, ExportFormat};
use evd_query::sort_items;

use crate::{FilterArgs, SortArgs};

/// Arguments for `evd export`.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// csv, excel or json.
    #[arg(long, default_value = "csv")]
    pub format: String,

    /// Comma-separated column keys, e.g. `evidenceId,fileName,status`.
    /// Unknown keys produce empty cells.
    #[arg(long, value_delimiter = ',')]
    pub columns: Vec<String>,

    /// Export exactly these evidence ids, in this order, ignoring filters.
    #[arg(long, value_delimiter = ',')]
    pub ids: Vec<String>,

    #[command(flatten)]
    pub filter: FilterArgs,

    #[command(flatten)]
    pub sort: SortArgs,

    /// Output directory for the generated file.
    #[arg(long, short, default_value = ".")]
    pub out: PathBuf,
}

pub fn run_export(args: &ExportArgs, data: Option<&Path>) -> Result<u8> {
    let items = crate::load_dataset(data)?;
    let file = render(&items, args)?;
    let path = args.out.join(&file.filename);
    std::fs::write(&path, file.bytes())
        .with_context(|| format!("failed to write export {}", path.display()))?;
    tracing::info!(format = %file.format, rows = file.row_count, "export written");
    println!("Exported {} rows to {}", file.row_count, path.display());
    Ok(0)
}

/// Select rows and render them without touching the filesystem.
pub fn render(items: &[EvidenceItem], args: &ExportArgs) -> Result<ExportFile> {
    let format: ExportFormat = args.format.parse().map_err(anyhow::Error::msg)?;
    let columns = columns(&args.columns);
    let rows = select_rows(items, args)?;
    Ok(evd_export::export(&rows, &columns, format, chrono::Utc::now())?)
}

fn columns(keys: &[String]) -> Vec<ColumnKey> {
    let columns: Vec<ColumnKey> = keys
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .map(ColumnKey::parse)
        .collect();
    if columns.is_empty() {
        ColumnKey::defaults()
    } else {
        columns
    }
}

fn select_rows<'a>(items: &'a [EvidenceItem], args: &ExportArgs) -> Result<Vec<&'a EvidenceItem>> {
    if args.ids.is_empty() {
        let filter = args.filter.to_filter()?;
        let mut rows = filter.apply(items);
        sort_items(&mut rows, args.sort.to_state()?);
        return Ok(rows);
    }
    let mut rows = Vec::with_capacity(args.ids.len());
    for raw in &args.ids {
        let id = EvidenceId::new(raw.as_str())?;
        match items.iter().find(|item| item.id == id) {
            Some(item) => rows.push(item),
            None => bail!("evidence {id} not found"),
        }
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(format: &str) -> ExportArgs {
        ExportArgs {
            format: format.to_string(),
            columns: Vec::new(),
            ids: Vec::new(),
            filter: FilterArgs::default(),
            sort: SortArgs::default(),
            out: PathBuf::from("."),
        }
    }

    fn dataset() -> Vec<EvidenceItem> {
        evd_mock::generate(&evd_mock::MockConfig::with_count(6))
    }

    #[test]
    fn csv_with_selected_columns() {
        let items = dataset();
        let mut a = args("csv");
        a.columns = vec!["evidenceId".into(), "fileName".into()];
        let file = render(&items, &a).unwrap();
        assert_eq!(file.row_count, 6);
        assert!(file.filename.ends_with(".csv"));
        assert!(file.content.starts_with('\u{feff}'));
        let header = file.content.trim_start_matches('\u{feff}').lines().next().unwrap();
        assert_eq!(header.split(',').count(), 2);
    }

    #[test]
    fn explicit_ids_keep_their_order() {
        let items = dataset();
        let mut a = args("json");
        a.columns = vec!["evidenceId".into()];
        a.ids = vec![items[4].id.to_string(), items[1].id.to_string()];
        let file = render(&items, &a).unwrap();
        assert_eq!(file.row_count, 2);
        let first = file.content.find(items[4].id.as_str()).unwrap();
        let second = file.content.find(items[1].id.as_str()).unwrap();
        assert!(first < second);
    }

    #[test]
    fn unknown_id_or_format_is_an_error() {
        let items = dataset();
        let mut a = args("csv");
        a.ids = vec!["EVD-1999-999999".into()];
        assert!(render(&items, &a).is_err());
        assert!(render(&items, &args("pdf")).is_err());
    }

    #[test]
    fn writes_file_into_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("evidence.json");
        crate::save_dataset(&data, &dataset()).unwrap();
        let mut a = args("excel");
        a.out = dir.path().to_path_buf();
        assert_eq!(run_export(&a, Some(&data)).unwrap(), 0);
        let written = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with("evidence-export_"))
            .count();
        assert_eq!(written, 1);
    }
}
