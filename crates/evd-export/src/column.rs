//! # Export Columns
//!
//! The fixed registry of exportable columns. Each key maps to one accessor on
//! [`EvidenceItem`]; keys not in the registry are kept as
//! [`ColumnKey::Unknown`] and always render as an empty string.

use evd_core::EvidenceItem;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnKey {
    EvidenceId,
    FileName,
    Type,
    Status,
    Sensitivity,
    Province,
    District,
    Ward,
    /// Ward if present, otherwise province.
    Scope,
    SubmittedBy,
    Reviewer,
    UploadedAt,
    CapturedAt,
    MimeType,
    Size,
    Sha256,
    Links,
    Tags,
    Notes,
    Unknown(String),
}

impl ColumnKey {
    /// Every known column, in registry order.
    pub const KNOWN: [ColumnKey; 19] = [
        Self::EvidenceId,
        Self::FileName,
        Self::Type,
        Self::Status,
        Self::Sensitivity,
        Self::Province,
        Self::District,
        Self::Ward,
        Self::Scope,
        Self::SubmittedBy,
        Self::Reviewer,
        Self::UploadedAt,
        Self::CapturedAt,
        Self::MimeType,
        Self::Size,
        Self::Sha256,
        Self::Links,
        Self::Tags,
        Self::Notes,
    ];

    /// Columns preselected in the export dialog.
    pub fn defaults() -> Vec<ColumnKey> {
        vec![
            Self::EvidenceId,
            Self::FileName,
            Self::Type,
            Self::Status,
            Self::Scope,
            Self::SubmittedBy,
            Self::UploadedAt,
        ]
    }

    pub fn parse(key: &str) -> Self {
        let key = key.trim();
        Self::KNOWN
            .iter()
            .find(|k| k.key() == key)
            .cloned()
            .unwrap_or_else(|| Self::Unknown(key.to_string()))
    }

    pub fn key(&self) -> &str {
        match self {
            Self::EvidenceId => "evidenceId",
            Self::FileName => "fileName",
            Self::Type => "type",
            Self::Status => "status",
            Self::Sensitivity => "sensitivity",
            Self::Province => "province",
            Self::District => "district",
            Self::Ward => "ward",
            Self::Scope => "scope",
            Self::SubmittedBy => "submittedBy",
            Self::Reviewer => "reviewer",
            Self::UploadedAt => "uploadedAt",
            Self::CapturedAt => "capturedAt",
            Self::MimeType => "mimeType",
            Self::Size => "size",
            Self::Sha256 => "sha256",
            Self::Links => "links",
            Self::Tags => "tags",
            Self::Notes => "notes",
            Self::Unknown(key) => key,
        }
    }

    /// Header text. Unknown keys use the key itself.
    pub fn label(&self) -> &str {
        match self {
            Self::EvidenceId => "Evidence ID",
            Self::FileName => "File name",
            Self::Type => "Type",
            Self::Status => "Status",
            Self::Sensitivity => "Sensitivity",
            Self::Province => "Province",
            Self::District => "District",
            Self::Ward => "Ward",
            Self::Scope => "Scope",
            Self::SubmittedBy => "Submitted by",
            Self::Reviewer => "Reviewer",
            Self::UploadedAt => "Uploaded at",
            Self::CapturedAt => "Captured at",
            Self::MimeType => "MIME type",
            Self::Size => "Size (bytes)",
            Self::Sha256 => "SHA-256",
            Self::Links => "Links",
            Self::Tags => "Tags",
            Self::Notes => "Notes",
            Self::Unknown(key) => key,
        }
    }

    /// Cell value for `item`.
    pub fn extract(&self, item: &EvidenceItem) -> String {
        match self {
            Self::EvidenceId => item.id.to_string(),
            Self::FileName => item.file.name.clone(),
            Self::Type => item.evidence_type.as_str().to_string(),
            Self::Status => item.status.as_str().to_string(),
            Self::Sensitivity => item.sensitivity.label().to_string(),
            Self::Province => item.scope.province.clone(),
            Self::District => item.scope.district.clone().unwrap_or_default(),
            Self::Ward => item.scope.ward.clone().unwrap_or_default(),
            Self::Scope => item.scope.display_label().to_string(),
            Self::SubmittedBy => item.submitted_by.clone(),
            Self::Reviewer => item.review.assigned_reviewer.clone().unwrap_or_default(),
            Self::UploadedAt => item.uploaded_at.to_iso8601(),
            Self::CapturedAt => item
                .captured_at
                .map(|t| t.to_iso8601())
                .unwrap_or_default(),
            Self::MimeType => item.file.mime_type.clone(),
            Self::Size => item.file.size_bytes.to_string(),
            Self::Sha256 => item.sha256_hex().unwrap_or_default(),
            Self::Links => item
                .links
                .iter()
                .map(|l| format!("{}:{}", l.entity_type, l.entity_id))
                .collect::<Vec<_>>()
                .join("; "),
            Self::Tags => item.tags.join(", "),
            Self::Notes => item.notes.clone().unwrap_or_default(),
            Self::Unknown(_) => String::new(),
        }
    }
}

impl std::fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl From<&str> for ColumnKey {
    fn from(key: &str) -> Self {
        Self::parse(key)
    }
}

impl Serialize for ColumnKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

impl<'de> Deserialize<'de> for ColumnKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}

/// Drop repeated keys, keeping the first occurrence.
pub fn dedup_columns(columns: &[ColumnKey]) -> Vec<ColumnKey> {
    let mut out: Vec<ColumnKey> = Vec::with_capacity(columns.len());
    for column in columns {
        if !out.contains(column) {
            out.push(column.clone());
        }
    }
    out
}
