//! # Import Subcommand
//!
//! Runs a JSON array of intake forms through the same validation as the
//! API and appends the accepted records to the dataset. Each row is parsed
//! on its own, so a malformed row is rejected without stopping the rest.
//! Progress is printed after every row. Exits with code 1 when any row was
//! rejected.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use evd_core::{import_rows, EvidenceId, ImportRow, IntakeRequest, Timestamp};

/// Arguments for `evd import`.
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// JSON file holding an array of intake forms.
    pub file: PathBuf,

    /// Name recorded on each Upload custody event.
    #[arg(long, default_value = "cli")]
    pub actor: String,

    /// Where to write the merged dataset. Defaults to the `--data` file.
    #[arg(long, short)]
    pub out: Option<PathBuf>,
}

pub fn run_import(args: &ImportArgs, data: Option<&Path>) -> Result<u8> {
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let raw: Vec<serde_json::Value> = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse intake forms in {}", args.file.display()))?;
    let rows: Vec<ImportRow> = raw
        .into_iter()
        .map(|row| serde_json::from_value::<IntakeRequest>(row).map_err(|e| e.to_string()))
        .collect();

    let mut items = crate::load_dataset(data)?;
    let now = Timestamp::now();
    let mut seq = crate::next_sequence(&items);
    let report = import_rows(
        rows,
        || {
            let id = EvidenceId::generate(now.year(), seq);
            seq += 1;
            id
        },
        &args.actor,
        now,
        |p| println!("[{:>3}%] {}/{}", p.percent, p.processed, p.total),
    );

    for rejection in &report.rejected {
        println!("row {}: {}", rejection.index, rejection.reason);
    }
    let accepted = report.accepted.len();
    let rejected = report.rejected.len();
    tracing::info!(accepted, rejected, "import finished");
    items.extend(report.accepted);

    match args.out.as_deref().or(data) {
        Some(path) => {
            crate::save_dataset(path, &items)?;
            println!(
                "Imported {accepted} records ({rejected} rejected) into {}",
                path.display()
            );
        }
        None => println!("Imported {accepted} records ({rejected} rejected); dataset not saved"),
    }
    Ok(if rejected == 0 { 0 } else { 1 })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_forms(dir: &Path, json: &str) -> PathBuf {
        let path = dir.join("forms.json");
        std::fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn accepted_rows_extend_the_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("evidence.json");
        crate::save_dataset(&data, &evd_mock::generate(&evd_mock::MockConfig::with_count(3)))
            .unwrap();
        let forms = write_forms(
            dir.path(),
            r#"[
                {"file_name": "a.jpg", "mime_type": "image/jpeg", "address": "1 Lê Lợi", "province": "Hà Nội"},
                {"file_name": "b.mp4", "address": "2 Trần Phú", "province": "Đà Nẵng", "submit": true}
            ]"#,
        );
        let args = ImportArgs {
            file: forms,
            actor: "importer".into(),
            out: None,
        };
        assert_eq!(run_import(&args, Some(&data)).unwrap(), 0);

        let items = crate::load_dataset(Some(&data)).unwrap();
        assert_eq!(items.len(), 5);
        assert!(items[3].id.as_str().ends_with("-000004"));
        assert!(items[4].id.as_str().ends_with("-000005"));
        assert_eq!(items[4].submitted_by, "importer");
        assert_eq!(items[4].status, evd_core::EvidenceStatus::Submitted);
    }

    #[test]
    fn rejected_rows_exit_with_one() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("merged.json");
        let forms = write_forms(
            dir.path(),
            r#"[
                {"file_name": "ok.pdf", "address": "3 Nguyễn Trãi"},
                {"file_name": "", "address": "4 Phố Huế"}
            ]"#,
        );
        let args = ImportArgs {
            file: forms,
            actor: "cli".into(),
            out: Some(out.clone()),
        };
        assert_eq!(run_import(&args, None).unwrap(), 1);
        let items = crate::load_dataset(Some(&out)).unwrap();
        assert_eq!(items.len(), evd_mock::DEFAULT_COUNT + 1);
    }

    #[test]
    fn malformed_row_is_rejected_alone() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("merged.json");
        let forms = write_forms(
            dir.path(),
            r#"[
                {"file_name": "a.jpg", "address": "1 Lê Lợi"},
                {"file_name": "b.jpg", "address": "2 Lê Lợi", "type": "HOLOGRAM"},
                {"file_name": "c.jpg"},
                {"file_name": "d.jpg", "address": "4 Lê Lợi"}
            ]"#,
        );
        let args = ImportArgs {
            file: forms,
            actor: "cli".into(),
            out: Some(out.clone()),
        };
        assert_eq!(run_import(&args, None).unwrap(), 1);
        let items = crate::load_dataset(Some(&out)).unwrap();
        assert_eq!(items.len(), evd_mock::DEFAULT_COUNT + 2);
        let names: Vec<&str> = items[evd_mock::DEFAULT_COUNT..]
            .iter()
            .map(|i| i.file.name.as_str())
            .collect();
        assert_eq!(names, vec!["a.jpg", "d.jpg"]);
    }

    #[test]
    fn malformed_forms_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let forms = write_forms(dir.path(), r#"{"file_name": "x"}"#);
        let args = ImportArgs {
            file: forms,
            actor: "cli".into(),
            out: None,
        };
        let err = run_import(&args, None).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse intake forms"));
    }
}
