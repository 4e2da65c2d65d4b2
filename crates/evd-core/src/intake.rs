//! # Intake
//!
//! Turns a submitted intake form into an [`EvidenceItem`], and runs batches
//! of forms through the same path with per-item progress.
//!
//! Validation is field presence only: the file name and the capture address
//! must be non-empty. Everything else is optional and copied through.

use serde::{Deserialize, Serialize};

use crate::custody::CustodyEventType;
use crate::error::EvidenceError;
use crate::evidence::{
    EntityLink, EvidenceItem, EvidenceStatus, EvidenceType, FileMetadata, Location, Sensitivity,
};
use crate::identity::EvidenceId;
use crate::scope::Scope;
use crate::temporal::Timestamp;

/// One intake form submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntakeRequest {
    pub file_name: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    /// Derived from the MIME type when absent.
    #[serde(default, rename = "type")]
    pub evidence_type: Option<EvidenceType>,
    #[serde(default)]
    pub size_bytes: u64,
    pub address: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub captured_at: Option<Timestamp>,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub ward: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub sensitivity: Option<Sensitivity>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub links: Vec<EntityLink>,
    /// Submit for review immediately instead of saving a draft.
    #[serde(default)]
    pub submit: bool,
}

impl IntakeRequest {
    /// # Errors
    ///
    /// [`EvidenceError::Validation`] naming the first empty required field.
    pub fn validate(&self) -> Result<(), EvidenceError> {
        if self.file_name.trim().is_empty() {
            return Err(EvidenceError::Validation(
                "file name must not be empty".to_string(),
            ));
        }
        if self.address.trim().is_empty() {
            return Err(EvidenceError::Validation(
                "address must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Validate and build the record. The first custody event is `Upload` by
    /// `actor`.
    pub fn into_item(
        self,
        id: EvidenceId,
        actor: &str,
        at: Timestamp,
    ) -> Result<EvidenceItem, EvidenceError> {
        self.validate()?;
        let mime_type = self
            .mime_type
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let evidence_type = self
            .evidence_type
            .unwrap_or_else(|| EvidenceType::from_mime(&mime_type));
        let scope = Scope {
            province: self.province.trim().to_string(),
            district: non_blank(self.district),
            ward: non_blank(self.ward),
            unit: non_blank(self.unit),
        };
        let file = FileMetadata {
            name: self.file_name.trim().to_string(),
            mime_type,
            size_bytes: self.size_bytes,
        };

        let mut item = EvidenceItem::new(id, evidence_type, file, scope, actor, at);
        item.captured_at = self.captured_at;
        item.location = Some(Location {
            address: self.address.trim().to_string(),
            latitude: self.latitude,
            longitude: self.longitude,
        });
        if let Some(sensitivity) = self.sensitivity {
            item.sensitivity = sensitivity;
        }
        item.notes = non_blank(self.notes);
        item.tags = self
            .tags
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        item.links = self.links;
        if self.submit {
            item.status = EvidenceStatus::Submitted;
        }
        let action = if self.submit {
            "Uploaded and submitted for review"
        } else {
            "Uploaded as draft"
        };
        item.log_custody(actor, CustodyEventType::Upload, action, at);
        Ok(item)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Progress after each processed row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportProgress {
    pub processed: usize,
    pub total: usize,
    pub percent: u8,
}

impl ImportProgress {
    fn new(processed: usize, total: usize) -> Self {
        let percent = if total == 0 {
            100
        } else {
            (processed.saturating_mul(100) / total).min(100) as u8
        };
        Self {
            processed,
            total,
            percent,
        }
    }
}

/// A row that did not become a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRejection {
    /// Zero-based position in the batch.
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportReport {
    pub accepted: Vec<EvidenceItem>,
    pub rejected: Vec<ImportRejection>,
}

/// A batch row: a parsed form, or why the raw row could not be parsed.
pub type ImportRow = Result<IntakeRequest, String>;

/// Run every row through [`IntakeRequest::into_item`].
///
/// `next_id` is called once per valid row. `on_progress` is called after
/// every row, valid or not, so the last report is always 100%. An empty
/// batch reports 100% once.
pub fn import_batch<I, F>(
    rows: Vec<IntakeRequest>,
    next_id: I,
    actor: &str,
    at: Timestamp,
    on_progress: F,
) -> ImportReport
where
    I: FnMut() -> EvidenceId,
    F: FnMut(ImportProgress),
{
    import_rows(rows.into_iter().map(Ok).collect(), next_id, actor, at, on_progress)
}

/// Like [`import_batch`], for rows that may have failed to parse upstream.
///
/// Unparsed rows are rejected with their own reason at their own index and
/// still count towards `total`.
pub fn import_rows<I, F>(
    rows: Vec<ImportRow>,
    mut next_id: I,
    actor: &str,
    at: Timestamp,
    mut on_progress: F,
) -> ImportReport
where
    I: FnMut() -> EvidenceId,
    F: FnMut(ImportProgress),
{
    let total = rows.len();
    let mut report = ImportReport::default();
    if total == 0 {
        on_progress(ImportProgress::new(0, 0));
        return report;
    }
    for (index, row) in rows.into_iter().enumerate() {
        let outcome = match row {
            Ok(row) => row
                .validate()
                .and_then(|()| row.into_item(next_id(), actor, at))
                .map_err(|e| e.to_string()),
            Err(reason) => Err(reason),
        };
        match outcome {
            Ok(item) => report.accepted.push(item),
            Err(reason) => report.rejected.push(ImportRejection { index, reason }),
        }
        on_progress(ImportProgress::new(index + 1, total));
    }
    report
}
