//! # Chain of Custody
//!
//! Append-only record of who touched an evidence item, when, and how.
//! Events are never edited or removed; deleting an item records a `Delete`
//! event in the audit log before the item leaves the store.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::identity::EvidenceId;
use crate::temporal::Timestamp;

/// Kind of custody event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CustodyEventType {
    Upload,
    View,
    Download,
    Edit,
    Review,
    Approve,
    Reject,
    Seal,
    Export,
    Verify,
    Link,
    Transfer,
    Delete,
}

impl CustodyEventType {
    /// All event types, in display order.
    pub const ALL: [CustodyEventType; 13] = [
        Self::Upload,
        Self::View,
        Self::Download,
        Self::Edit,
        Self::Review,
        Self::Approve,
        Self::Reject,
        Self::Seal,
        Self::Export,
        Self::Verify,
        Self::Link,
        Self::Transfer,
        Self::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upload => "Upload",
            Self::View => "View",
            Self::Download => "Download",
            Self::Edit => "Edit",
            Self::Review => "Review",
            Self::Approve => "Approve",
            Self::Reject => "Reject",
            Self::Seal => "Seal",
            Self::Export => "Export",
            Self::Verify => "Verify",
            Self::Link => "Link",
            Self::Transfer => "Transfer",
            Self::Delete => "Delete",
        }
    }

    /// Timeline icon name for the event.
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::View => "eye",
            Self::Download => "download",
            Self::Edit => "edit",
            Self::Review => "clipboard",
            Self::Approve => "check-circle",
            Self::Reject => "x-circle",
            Self::Seal => "lock",
            Self::Export => "file-output",
            Self::Verify => "shield-check",
            Self::Link => "link",
            Self::Transfer => "arrow-right-left",
            Self::Delete => "trash",
        }
    }

    /// Whether the event changes the record rather than just reading it.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Self::View | Self::Download | Self::Export | Self::Verify)
    }
}

impl std::fmt::Display for CustodyEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CustodyEventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown custody event type: {s:?}"))
    }
}

/// One entry in an item's chain of custody.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustodyEvent {
    pub id: Uuid,
    pub evidence_id: EvidenceId,
    pub actor: String,
    pub event_type: CustodyEventType,
    pub at: Timestamp,
    /// Free-text description of what happened.
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
}

impl CustodyEvent {
    pub fn new(
        evidence_id: EvidenceId,
        actor: impl Into<String>,
        event_type: CustodyEventType,
        action: impl Into<String>,
        at: Timestamp,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            evidence_id,
            actor: actor.into(),
            event_type,
            at,
            action: action.into(),
            ip: None,
            device: None,
        }
    }

    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = Some(device.into());
        self
    }
}
