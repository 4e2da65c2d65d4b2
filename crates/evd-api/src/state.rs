//! # Application State
//!
//! Shared state for the Axum application: in-memory stores for evidence,
//! packages and the export history, plus configuration.
//!
//! Custody chains of deleted records move to a separate log so the audit
//! view keeps them. Nothing is persisted. Every store is a `parking_lot::RwLock` behind an
//! `Arc`; locks are never held across `.await` points.

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use evd_core::{
    CustodyEvent, CustodyEventType, EvidenceId, EvidenceItem, EvidencePackage, PackageId,
    Timestamp,
};
use evd_export::{ColumnKey, ExportFormat};
use evd_query::{TeamDistrictMap, VisibilityPolicy};
use parking_lot::RwLock;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::AuthConfig;
use crate::error::AppError;
use crate::middleware::rate_limit::RateLimitConfig;

/// Ordered in-memory store keyed by `K`.
///
/// Iteration follows key order, so listings are deterministic.
#[derive(Debug)]
pub struct Store<K: Ord + Clone, T: Clone + Send + Sync> {
    data: Arc<RwLock<BTreeMap<K, T>>>,
}

impl<K: Ord + Clone, T: Clone + Send + Sync> Clone for Store<K, T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<K: Ord + Clone, T: Clone + Send + Sync> Store<K, T> {
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Insert a record, returning the previous value if the key existed.
    pub fn insert(&self, id: K, value: T) -> Option<T> {
        self.data.write().insert(id, value)
    }

    pub fn get(&self, id: &K) -> Option<T> {
        self.data.read().get(id).cloned()
    }

    /// All records in key order.
    pub fn list(&self) -> Vec<T> {
        self.data.read().values().cloned().collect()
    }

    /// Update a record in place. Returns the updated record, or `None` if not found.
    pub fn update(&self, id: &K, f: impl FnOnce(&mut T)) -> Option<T> {
        let mut guard = self.data.write();
        guard.get_mut(id).map(|entry| {
            f(entry);
            entry.clone()
        })
    }

    /// Read-validate-update under a single write lock.
    ///
    /// `None` if the record doesn't exist, otherwise the closure's result.
    pub fn try_update<R, E>(
        &self,
        id: &K,
        f: impl FnOnce(&mut T) -> Result<R, E>,
    ) -> Option<Result<R, E>> {
        self.data.write().get_mut(id).map(f)
    }

    pub fn remove(&self, id: &K) -> Option<T> {
        self.data.write().remove(id)
    }

    pub fn contains(&self, id: &K) -> bool {
        self.data.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run `f` over a read-locked view of every record.
    pub fn read<R>(&self, f: impl FnOnce(&BTreeMap<K, T>) -> R) -> R {
        f(&self.data.read())
    }

    /// Run `f` with the whole map write-locked.
    pub fn write<R>(&self, f: impl FnOnce(&mut BTreeMap<K, T>) -> R) -> R {
        f(&mut self.data.write())
    }
}

impl<K: Ord + Clone, T: Clone + Send + Sync> Default for Store<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Oldest exports are dropped beyond this many.
pub const MAX_EXPORT_HISTORY: usize = 500;

/// One produced export, kept for the export history page.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ExportRecord {
    pub id: Uuid,
    pub filename: String,
    #[schema(value_type = String)]
    pub format: ExportFormat,
    pub row_count: usize,
    #[schema(value_type = Vec<String>)]
    pub columns: Vec<ColumnKey>,
    pub requested_by: String,
    pub created_at: DateTime<Utc>,
}

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// Mock records generated at startup.
    pub seed_count: usize,
    pub seed: u64,
    pub metrics_enabled: bool,
    pub auth: AuthConfig,
    pub team_districts: TeamDistrictMap,
    pub rate_limit: RateLimitConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            seed_count: evd_mock::DEFAULT_COUNT,
            seed: evd_mock::DEFAULT_SEED,
            metrics_enabled: true,
            auth: AuthConfig::default(),
            team_districts: TeamDistrictMap::default(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

/// Shared application state passed to all route handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub evidence: Store<EvidenceId, EvidenceItem>,
    pub packages: Store<PackageId, EvidencePackage>,
    pub exports: Arc<RwLock<VecDeque<ExportRecord>>>,
    /// Custody chains of deleted records, each ending in a `Delete` event.
    pub deleted_custody: Arc<RwLock<Vec<CustodyEvent>>>,
    pub visibility: VisibilityPolicy,
    pub config: Arc<AppConfig>,
    next_seq: Arc<AtomicU64>,
}

impl AppState {
    /// Empty stores with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Empty stores; no mock data is generated here.
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            evidence: Store::new(),
            packages: Store::new(),
            exports: Arc::new(RwLock::new(VecDeque::new())),
            deleted_custody: Arc::new(RwLock::new(Vec::new())),
            visibility: VisibilityPolicy::new(config.team_districts.clone()),
            config: Arc::new(config),
            next_seq: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Load records, keeping new ids above every loaded sequence number.
    ///
    /// # Errors
    ///
    /// [`AppError::Validation`] if a loaded id already uses the last
    /// sequence number. Nothing is loaded in that case.
    pub fn seed(&self, items: Vec<EvidenceItem>) -> Result<(), AppError> {
        let highest = items.iter().filter_map(|i| sequence_of(&i.id)).max().unwrap_or(0);
        let next = highest.checked_add(1).ok_or_else(|| {
            AppError::Validation(format!(
                "evidence sequence {highest} leaves no room for new ids"
            ))
        })?;
        self.next_seq.fetch_max(next, Ordering::SeqCst);
        self.evidence.write(|map| {
            for item in items {
                map.insert(item.id.clone(), item);
            }
        });
        Ok(())
    }

    /// Remove a record, closing its custody chain with a `Delete` event by
    /// `actor` and keeping the chain for the audit log.
    pub fn delete_evidence(
        &self,
        id: &EvidenceId,
        actor: &str,
        at: Timestamp,
    ) -> Option<EvidenceItem> {
        self.evidence.write(|map| {
            let mut item = map.remove(id)?;
            item.log_custody(actor, CustodyEventType::Delete, "Deleted", at);
            self.deleted_custody
                .write()
                .extend(item.custody.iter().cloned());
            Some(item)
        })
    }

    /// Custody events of live and deleted records matching `keep`.
    pub fn custody_events(&self, keep: impl Fn(&CustodyEvent) -> bool) -> Vec<CustodyEvent> {
        let mut events: Vec<CustodyEvent> = self.evidence.read(|map| {
            map.values()
                .flat_map(|item| item.custody.iter())
                .filter(|event| keep(event))
                .cloned()
                .collect()
        });
        events.extend(
            self.deleted_custody
                .read()
                .iter()
                .filter(|event| keep(event))
                .cloned(),
        );
        events
    }

    /// Allocate the next `EVD-<year>-<seq>` id.
    pub fn next_evidence_id(&self, at: Timestamp) -> EvidenceId {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        EvidenceId::generate(at.year(), seq)
    }

    pub fn record_export(&self, record: ExportRecord) {
        let mut exports = self.exports.write();
        exports.push_back(record);
        while exports.len() > MAX_EXPORT_HISTORY {
            exports.pop_front();
        }
    }

    /// Export history, newest first.
    pub fn export_history(&self) -> Vec<ExportRecord> {
        self.exports.read().iter().rev().cloned().collect()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Trailing sequence number of an `EVD-<year>-<seq>` id.
fn sequence_of(id: &EvidenceId) -> Option<u64> {
    id.as_str().rsplit('-').next().and_then(|s| s.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_lists_in_key_order() {
        let store: Store<String, u32> = Store::new();
        store.insert("b".into(), 2);
        store.insert("a".into(), 1);
        assert_eq!(store.list(), vec![1, 2]);
        assert_eq!(store.update(&"a".into(), |v| *v += 10), Some(11));
        assert!(store.update(&"z".into(), |v| *v += 1).is_none());
        assert_eq!(store.remove(&"b".into()), Some(2));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn try_update_reports_missing_and_errors() {
        let store: Store<u8, u32> = Store::new();
        store.insert(1, 5);
        let missing: Option<Result<(), String>> = store.try_update(&2, |_| Ok(()));
        assert!(missing.is_none());
        let failed = store.try_update(&1, |v| if *v > 3 { Err("too big") } else { Ok(()) });
        assert_eq!(failed, Some(Err("too big")));
    }

    #[test]
    fn new_ids_follow_seeded_ones() {
        let state = AppState::new();
        let items = evd_mock::generate(&evd_mock::MockConfig::with_count(5));
        state.seed(items).unwrap();
        let at = Timestamp::parse("2026-06-01T00:00:00Z").unwrap();
        assert_eq!(state.next_evidence_id(at).as_str(), "EVD-2026-000006");
        assert_eq!(state.next_evidence_id(at).as_str(), "EVD-2026-000007");
    }

    #[test]
    fn seeding_the_last_sequence_is_rejected() {
        let state = AppState::new();
        let at = Timestamp::parse("2026-06-01T00:00:00Z").unwrap();
        let mut items = evd_mock::generate(&evd_mock::MockConfig::with_count(1));
        items[0].id = EvidenceId::generate(2026, u64::MAX);
        assert!(matches!(state.seed(items), Err(AppError::Validation(_))));
        assert!(state.evidence.is_empty());
        assert_eq!(state.next_evidence_id(at).as_str(), "EVD-2026-000001");
    }

    #[test]
    fn deleted_custody_stays_in_the_log() {
        let state = AppState::new();
        state
            .seed(evd_mock::generate(&evd_mock::MockConfig::with_count(2)))
            .unwrap();
        let id = state.evidence.list()[0].id.clone();
        let before = state.custody_events(|e| e.evidence_id == id).len();
        let at = Timestamp::parse("2026-06-01T00:00:00Z").unwrap();

        let removed = state.delete_evidence(&id, "Admin", at).unwrap();
        assert!(!state.evidence.contains(&id));
        assert_eq!(removed.custody.last().map(|e| e.event_type), Some(CustodyEventType::Delete));

        let after = state.custody_events(|e| e.evidence_id == id);
        assert_eq!(after.len(), before + 1);
        assert!(after
            .iter()
            .any(|e| e.event_type == CustodyEventType::Delete && e.actor == "Admin"));
        assert!(state.delete_evidence(&id, "Admin", at).is_none());
    }

    #[test]
    fn export_history_is_capped_newest_first() {
        let state = AppState::new();
        for n in 0..MAX_EXPORT_HISTORY + 3 {
            state.record_export(ExportRecord {
                id: Uuid::new_v4(),
                filename: format!("export-{n}.csv"),
                format: ExportFormat::Csv,
                row_count: n,
                columns: ColumnKey::defaults(),
                requested_by: "Admin".into(),
                created_at: Utc::now(),
            });
        }
        let history = state.export_history();
        assert_eq!(history.len(), MAX_EXPORT_HISTORY);
        assert_eq!(history[0].row_count, MAX_EXPORT_HISTORY + 2);
        assert_eq!(history.last().map(|r| r.row_count), Some(3));
    }
}
