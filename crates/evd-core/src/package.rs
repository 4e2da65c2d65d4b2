//! # Evidence Packages
//!
//! A package bundles evidence items under a manifest of `(evidence id,
//! latest SHA-256)` pairs. The package digest is SHA-256 over the canonical
//! bytes of the sorted manifest entries joined with commas, so it is
//! independent of the order items were added.
//!
//! Verification recomputes the manifest from the current state of each
//! member and reports every entry whose hash moved or whose item vanished.

use serde::{Deserialize, Serialize};

use crate::canonical::CanonicalBytes;
use crate::digest::{sha256_digest, ContentDigest};
use crate::error::EvidenceError;
use crate::evidence::EvidenceItem;
use crate::identity::{EvidenceId, PackageId};
use crate::temporal::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PackageStatus {
    Open,
    Sealed,
}

impl PackageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Sealed => "Sealed",
        }
    }
}

/// One manifest line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageEntry {
    pub evidence_id: EvidenceId,
    /// Latest content digest at packaging time; `None` for unhashed items.
    pub sha256: Option<ContentDigest>,
}

impl PackageEntry {
    fn from_item(item: &EvidenceItem) -> Self {
        Self {
            evidence_id: item.id.clone(),
            sha256: item.latest_hash().map(|h| h.digest.clone()),
        }
    }

    fn manifest_line(&self) -> String {
        match &self.sha256 {
            Some(d) => format!("{}={}", self.evidence_id, d.to_hex()),
            None => format!("{}=-", self.evidence_id),
        }
    }
}

/// A manifest entry that no longer matches its item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageMismatch {
    pub evidence_id: EvidenceId,
    pub expected: Option<String>,
    /// `None` when the item is unhashed or no longer exists.
    pub actual: Option<String>,
    pub missing: bool,
}

/// Result of re-checking a package against current items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageVerification {
    pub package_id: PackageId,
    pub valid: bool,
    pub expected_digest: ContentDigest,
    pub actual_digest: ContentDigest,
    pub mismatches: Vec<PackageMismatch>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidencePackage {
    pub id: PackageId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: PackageStatus,
    pub entries: Vec<PackageEntry>,
    pub digest: ContentDigest,
    pub created_by: String,
    pub created_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sealed_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sealed_by: Option<String>,
}

impl EvidencePackage {
    /// Assemble an open package from member items.
    ///
    /// # Errors
    ///
    /// Returns [`EvidenceError::Validation`] for a blank name, no items, or a
    /// repeated evidence id.
    pub fn build(
        name: impl Into<String>,
        description: Option<String>,
        items: &[&EvidenceItem],
        created_by: impl Into<String>,
        at: Timestamp,
    ) -> Result<Self, EvidenceError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(EvidenceError::Validation(
                "package name must not be empty".to_string(),
            ));
        }
        if items.is_empty() {
            return Err(EvidenceError::Validation(
                "package must contain at least one evidence item".to_string(),
            ));
        }
        let mut seen = std::collections::BTreeSet::new();
        for item in items {
            if !seen.insert(&item.id) {
                return Err(EvidenceError::Validation(format!(
                    "evidence {} appears more than once",
                    item.id
                )));
            }
        }
        let entries: Vec<PackageEntry> = items.iter().map(|i| PackageEntry::from_item(i)).collect();
        let digest = compute_package_digest(&entries)?;
        Ok(Self {
            id: PackageId::new(),
            name,
            description,
            status: PackageStatus::Open,
            entries,
            digest,
            created_by: created_by.into(),
            created_at: at,
            sealed_at: None,
            sealed_by: None,
        })
    }

    pub fn evidence_ids(&self) -> impl Iterator<Item = &EvidenceId> {
        self.entries.iter().map(|e| &e.evidence_id)
    }

    pub fn is_sealed(&self) -> bool {
        self.status == PackageStatus::Sealed
    }

    /// Recompute the manifest from `lookup` and compare.
    pub fn verify<'a, F>(&self, lookup: F) -> Result<PackageVerification, EvidenceError>
    where
        F: Fn(&EvidenceId) -> Option<&'a EvidenceItem>,
    {
        let mut mismatches = Vec::new();
        let mut current = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let expected = entry.sha256.as_ref().map(ContentDigest::to_hex);
            match lookup(&entry.evidence_id) {
                Some(item) => {
                    let now = PackageEntry::from_item(item);
                    let actual = now.sha256.as_ref().map(ContentDigest::to_hex);
                    if actual != expected {
                        mismatches.push(PackageMismatch {
                            evidence_id: entry.evidence_id.clone(),
                            expected,
                            actual,
                            missing: false,
                        });
                    }
                    current.push(now);
                }
                None => {
                    mismatches.push(PackageMismatch {
                        evidence_id: entry.evidence_id.clone(),
                        expected,
                        actual: None,
                        missing: true,
                    });
                    current.push(PackageEntry {
                        evidence_id: entry.evidence_id.clone(),
                        sha256: None,
                    });
                }
            }
        }
        let actual_digest = compute_package_digest(&current)?;
        Ok(PackageVerification {
            package_id: self.id,
            valid: mismatches.is_empty() && actual_digest == self.digest,
            expected_digest: self.digest.clone(),
            actual_digest,
            mismatches,
        })
    }

    /// Mark the package sealed.
    ///
    /// # Errors
    ///
    /// Returns [`EvidenceError::Validation`] if it is already sealed.
    pub fn seal(&mut self, actor: impl Into<String>, at: Timestamp) -> Result<(), EvidenceError> {
        if self.is_sealed() {
            return Err(EvidenceError::Validation(format!(
                "{} is already sealed",
                self.id
            )));
        }
        self.status = PackageStatus::Sealed;
        self.sealed_at = Some(at);
        self.sealed_by = Some(actor.into());
        Ok(())
    }
}

fn compute_package_digest(entries: &[PackageEntry]) -> Result<ContentDigest, EvidenceError> {
    let mut lines: Vec<String> = entries.iter().map(PackageEntry::manifest_line).collect();
    lines.sort();
    let canonical = CanonicalBytes::new(&lines.join(","))?;
    Ok(sha256_digest(&canonical))
}
