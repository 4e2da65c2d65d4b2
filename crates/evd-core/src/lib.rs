//! # evd-core: Foundational Types for the Evidence Stack
//!
//! Defines the domain model shared by every other crate in the workspace:
//! evidence records, their chain of custody, the administrative scope used
//! to partition visibility, and evidence packages. It depends on nothing
//! internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype identifiers.** `EvidenceId` and `PackageId` cannot be swapped
//!    for one another or for a bare string.
//!
//! 2. **Closed enums for every label.** Evidence type, lifecycle status,
//!    sensitivity, link type and custody event type are exhaustive enums with
//!    `as_str()`/`label()` lookups instead of string-keyed tables.
//!
//! 3. **UTC-only timestamps.** `Timestamp` is UTC with seconds precision.
//!
//! 4. **Digests over canonical bytes.** Package digests are computed from
//!    `CanonicalBytes` (RFC 8785 JCS); file digests from raw content bytes.
//!
//! 5. **No lifecycle enforcement.** Any status may be set on any record; the
//!    workflow is advisory.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `evd-*` crates.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public record types derive `Debug`, `Clone`, `Serialize`, `Deserialize`.

pub mod canonical;
pub mod custody;
pub mod digest;
pub mod error;
pub mod evidence;
pub mod identity;
pub mod intake;
pub mod package;
pub mod scope;
pub mod temporal;

pub use canonical::CanonicalBytes;
pub use custody::{CustodyEvent, CustodyEventType};
pub use digest::{sha256_content, sha256_digest, ContentDigest, DigestAlgorithm};
pub use error::{CanonicalizationError, EvidenceError};
pub use evidence::{
    EntityLink, EvidenceItem, EvidenceStatus, EvidenceType, FileMetadata, HashRecord,
    LinkEntityType, Location, Review, ReviewDecision, Sensitivity,
};
pub use identity::{EvidenceId, PackageId};
pub use intake::{
    import_batch, import_rows, ImportProgress, ImportRejection, ImportReport, ImportRow,
    IntakeRequest,
};
pub use package::{
    EvidencePackage, PackageEntry, PackageMismatch, PackageStatus, PackageVerification,
};
pub use scope::{Scope, SessionScope, UserLevel};
pub use temporal::Timestamp;
