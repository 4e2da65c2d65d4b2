//! # evd-export: Evidence Export
//!
//! Turns a set of evidence records and a column selection into a
//! downloadable file:
//!
//! | Format | Content | MIME | Extension |
//! |--------|---------|------|-----------|
//! | CSV    | BOM + header + rows, `\n` separated | `text/csv;charset=utf-8` | `csv` |
//! | Excel  | HTML table in an Office HTML document | `application/vnd.ms-excel` | `xls` |
//! | JSON   | pretty array of objects keyed by column | `application/json` | `json` |
//!
//! Failures are logged through `tracing` and returned; nothing is retried
//! and no partial file is produced.

pub mod column;
pub mod csv;
pub mod error;
pub mod excel;
pub mod filename;
pub mod format;
pub mod json;

use chrono::{DateTime, Utc};
use evd_core::EvidenceItem;
use serde::Serialize;

pub use column::{dedup_columns, ColumnKey};
pub use csv::{csv_escape, to_csv};
pub use error::ExportError;
pub use excel::{html_escape, to_excel_html};
pub use filename::export_filename;
pub use format::ExportFormat;
pub use json::to_json;

/// A rendered export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportFile {
    pub filename: String,
    pub format: ExportFormat,
    pub mime_type: &'static str,
    pub row_count: usize,
    pub columns: Vec<ColumnKey>,
    #[serde(skip)]
    pub content: String,
}

impl ExportFile {
    pub fn bytes(&self) -> &[u8] {
        self.content.as_bytes()
    }
}

/// Render `records` with `columns` in `format`.
///
/// Repeated columns are collapsed to their first occurrence.
///
/// # Errors
///
/// - [`ExportError::NoColumns`] when `columns` is empty.
/// - [`ExportError::Serialization`] when JSON encoding fails.
pub fn export(
    records: &[&EvidenceItem],
    columns: &[ColumnKey],
    format: ExportFormat,
    generated_at: DateTime<Utc>,
) -> Result<ExportFile, ExportError> {
    let result = render(records, columns, format, generated_at);
    if let Err(e) = &result {
        tracing::error!(format = %format, rows = records.len(), error = %e, "export failed");
    }
    result
}

fn render(
    records: &[&EvidenceItem],
    columns: &[ColumnKey],
    format: ExportFormat,
    generated_at: DateTime<Utc>,
) -> Result<ExportFile, ExportError> {
    let columns = dedup_columns(columns);
    if columns.is_empty() {
        return Err(ExportError::NoColumns);
    }
    let content = match format {
        ExportFormat::Csv => to_csv(records, &columns),
        ExportFormat::Excel => to_excel_html(records, &columns),
        ExportFormat::Json => to_json(records, &columns)?,
    };
    tracing::debug!(format = %format, rows = records.len(), columns = columns.len(), "export rendered");
    Ok(ExportFile {
        filename: export_filename(format, generated_at),
        format,
        mime_type: format.mime_type(),
        row_count: records.len(),
        columns,
        content,
    })
}
