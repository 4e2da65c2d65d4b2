//! # Evidence Records
//!
//! The `EvidenceItem` record and the closed enums that label it. Every
//! label lookup (display text, badge tone) is a `match` on the enum.
//!
//! Status changes are not validated: any status may be assigned to any
//! record. Links to other entities are referential only.

use serde::{Deserialize, Serialize};

use crate::custody::{CustodyEvent, CustodyEventType};
use crate::digest::{sha256_content, ContentDigest};
use crate::error::EvidenceError;
use crate::identity::EvidenceId;
use crate::scope::Scope;
use crate::temporal::Timestamp;

/// Media category of an evidence file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EvidenceType {
    Photo,
    Video,
    Audio,
    Doc,
    Pdf,
    Other,
}

impl EvidenceType {
    pub const ALL: [EvidenceType; 6] = [
        Self::Photo,
        Self::Video,
        Self::Audio,
        Self::Doc,
        Self::Pdf,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Photo => "PHOTO",
            Self::Video => "VIDEO",
            Self::Audio => "AUDIO",
            Self::Doc => "DOC",
            Self::Pdf => "PDF",
            Self::Other => "OTHER",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Photo => "Photo",
            Self::Video => "Video",
            Self::Audio => "Audio",
            Self::Doc => "Document",
            Self::Pdf => "PDF",
            Self::Other => "Other",
        }
    }

    /// Best-effort classification from a MIME type.
    pub fn from_mime(mime: &str) -> Self {
        let mime = mime.to_ascii_lowercase();
        if mime.starts_with("image/") {
            Self::Photo
        } else if mime.starts_with("video/") {
            Self::Video
        } else if mime.starts_with("audio/") {
            Self::Audio
        } else if mime == "application/pdf" {
            Self::Pdf
        } else if mime.contains("word") || mime.contains("document") || mime.starts_with("text/") {
            Self::Doc
        } else {
            Self::Other
        }
    }
}

impl std::fmt::Display for EvidenceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EvidenceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown evidence type: {s:?}"))
    }
}

/// Workflow status of an evidence record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EvidenceStatus {
    Draft,
    Submitted,
    InReview,
    NeedMoreInfo,
    Approved,
    Rejected,
    Sealed,
}

impl EvidenceStatus {
    pub const ALL: [EvidenceStatus; 7] = [
        Self::Draft,
        Self::Submitted,
        Self::InReview,
        Self::NeedMoreInfo,
        Self::Approved,
        Self::Rejected,
        Self::Sealed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Submitted => "Submitted",
            Self::InReview => "InReview",
            Self::NeedMoreInfo => "NeedMoreInfo",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Sealed => "Sealed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Submitted => "Submitted",
            Self::InReview => "In review",
            Self::NeedMoreInfo => "Need more info",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Sealed => "Sealed",
        }
    }

    /// Badge tone used when rendering the status.
    pub fn tone(&self) -> &'static str {
        match self {
            Self::Draft => "neutral",
            Self::Submitted | Self::InReview => "info",
            Self::NeedMoreInfo => "warning",
            Self::Approved | Self::Sealed => "success",
            Self::Rejected => "danger",
        }
    }

    /// Statuses that place a record in the review queue.
    pub fn is_pending_review(&self) -> bool {
        matches!(self, Self::Submitted | Self::InReview | Self::NeedMoreInfo)
    }
}

impl std::fmt::Display for EvidenceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EvidenceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown evidence status: {s:?}"))
    }
}

/// Handling classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sensitivity {
    Public,
    Internal,
    Restricted,
    #[serde(alias = "Secret-lite")]
    SecretLite,
}

impl Sensitivity {
    pub const ALL: [Sensitivity; 4] = [
        Self::Public,
        Self::Internal,
        Self::Restricted,
        Self::SecretLite,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "Public",
            Self::Internal => "Internal",
            Self::Restricted => "Restricted",
            Self::SecretLite => "SecretLite",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::SecretLite => "Secret-lite",
            other => other.as_str(),
        }
    }

    pub fn tone(&self) -> &'static str {
        match self {
            Self::Public => "success",
            Self::Internal => "info",
            Self::Restricted => "warning",
            Self::SecretLite => "danger",
        }
    }
}

impl std::fmt::Display for Sensitivity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Sensitivity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s) || t.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown sensitivity: {s:?}"))
    }
}

/// Kind of entity an evidence item can be linked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkEntityType {
    Lead,
    Risk,
    Task,
    Store,
}

impl LinkEntityType {
    pub const ALL: [LinkEntityType; 4] = [Self::Lead, Self::Risk, Self::Task, Self::Store];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lead => "lead",
            Self::Risk => "risk",
            Self::Task => "task",
            Self::Store => "store",
        }
    }
}

impl std::fmt::Display for LinkEntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LinkEntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown link type: {s:?}"))
    }
}

/// Outcome of a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Approve,
    Reject,
    NeedMoreInfo,
}

impl ReviewDecision {
    /// The record status a decision produces.
    pub fn resulting_status(&self) -> EvidenceStatus {
        match self {
            Self::Approve => EvidenceStatus::Approved,
            Self::Reject => EvidenceStatus::Rejected,
            Self::NeedMoreInfo => EvidenceStatus::NeedMoreInfo,
        }
    }

    /// Custody event type logged for the decision.
    pub fn custody_event(&self) -> CustodyEventType {
        match self {
            Self::Approve => CustodyEventType::Approve,
            Self::Reject => CustodyEventType::Reject,
            Self::NeedMoreInfo => CustodyEventType::Review,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    pub name: String,
    pub mime_type: String,
    pub size_bytes: u64,
}

/// Capture location entered at intake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_reviewer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision: Option<ReviewDecision>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<Timestamp>,
}

/// A computed content hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashRecord {
    pub digest: ContentDigest,
    pub computed_at: Timestamp,
    pub computed_by: String,
}

/// Reference from an evidence item to another entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityLink {
    pub entity_type: LinkEntityType,
    pub entity_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// One uploaded evidence file with its metadata and workflow state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceItem {
    pub id: EvidenceId,
    #[serde(rename = "type")]
    pub evidence_type: EvidenceType,
    pub status: EvidenceStatus,
    pub sensitivity: Sensitivity,
    pub file: FileMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured_at: Option<Timestamp>,
    pub uploaded_at: Timestamp,
    pub scope: Scope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    pub submitted_by: String,
    #[serde(default)]
    pub review: Review,
    #[serde(default)]
    pub hashes: Vec<HashRecord>,
    #[serde(default)]
    pub links: Vec<EntityLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub custody: Vec<CustodyEvent>,
}

impl EvidenceItem {
    /// Create a `Draft`, `Internal` record with empty review, hashes, links
    /// and custody.
    pub fn new(
        id: EvidenceId,
        evidence_type: EvidenceType,
        file: FileMetadata,
        scope: Scope,
        submitted_by: impl Into<String>,
        uploaded_at: Timestamp,
    ) -> Self {
        Self {
            id,
            evidence_type,
            status: EvidenceStatus::Draft,
            sensitivity: Sensitivity::Internal,
            file,
            captured_at: None,
            uploaded_at,
            scope,
            location: None,
            submitted_by: submitted_by.into(),
            review: Review::default(),
            hashes: Vec::new(),
            links: Vec::new(),
            notes: None,
            tags: Vec::new(),
            custody: Vec::new(),
        }
    }

    /// The most recently computed hash, if any.
    pub fn latest_hash(&self) -> Option<&HashRecord> {
        self.hashes.last()
    }

    /// Hex of the latest SHA-256, or `None` if the item was never hashed.
    pub fn sha256_hex(&self) -> Option<String> {
        self.latest_hash().map(|h| h.digest.to_hex())
    }

    pub fn has_link_type(&self, entity_type: LinkEntityType) -> bool {
        self.links.iter().any(|l| l.entity_type == entity_type)
    }

    /// Append a custody event for this item and return a reference to it.
    pub fn log_custody(
        &mut self,
        actor: impl Into<String>,
        event_type: CustodyEventType,
        action: impl Into<String>,
        at: Timestamp,
    ) -> &CustodyEvent {
        let event = CustodyEvent::new(self.id.clone(), actor, event_type, action, at);
        self.custody.push(event);
        &self.custody[self.custody.len() - 1]
    }

    /// Hash raw content, append a `HashRecord` and an `Upload` custody event.
    pub fn record_content(&mut self, content: &[u8], actor: &str, at: Timestamp) -> ContentDigest {
        let digest = sha256_content(content);
        self.file.size_bytes = content.len() as u64;
        self.hashes.push(HashRecord {
            digest: digest.clone(),
            computed_at: at,
            computed_by: actor.to_string(),
        });
        self.log_custody(
            actor,
            CustodyEventType::Upload,
            format!("Content uploaded ({} bytes), {}", content.len(), digest),
            at,
        );
        digest
    }

    /// Recompute the content digest and compare it with the latest record.
    ///
    /// A `Verify` custody event is appended whether or not the check passes.
    ///
    /// # Errors
    ///
    /// - [`EvidenceError::MissingHash`] if the item was never hashed.
    /// - [`EvidenceError::Integrity`] if the digests differ.
    pub fn verify_integrity(
        &mut self,
        content: &[u8],
        actor: &str,
        at: Timestamp,
    ) -> Result<ContentDigest, EvidenceError> {
        let expected = self
            .latest_hash()
            .map(|h| h.digest.clone())
            .ok_or_else(|| EvidenceError::MissingHash(self.id.to_string()))?;
        let actual = sha256_content(content);
        if actual == expected {
            self.log_custody(actor, CustodyEventType::Verify, "Integrity verified", at);
            Ok(actual)
        } else {
            self.log_custody(
                actor,
                CustodyEventType::Verify,
                format!("Integrity check failed: recomputed {actual}"),
                at,
            );
            Err(EvidenceError::Integrity {
                subject: self.id.to_string(),
                expected: expected.to_hex(),
                actual: actual.to_hex(),
            })
        }
    }
}
