//! Export filenames: `evidence-export_<ISO 8601 instant>.<ext>` with `:`
//! and `.` in the instant replaced by `-`, so the name is safe on every
//! filesystem and still sorts chronologically.

use chrono::{DateTime, Utc};

use crate::format::ExportFormat;

pub const EXPORT_FILE_PREFIX: &str = "evidence-export";

pub fn export_filename(format: ExportFormat, at: DateTime<Utc>) -> String {
    format!(
        "{EXPORT_FILE_PREFIX}_{}.{}",
        at.format("%Y-%m-%dT%H-%M-%S-%3fZ"),
        format.file_extension()
    )
}
