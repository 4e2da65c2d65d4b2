//! Review queue: records in `Submitted`, `InReview` or `NeedMoreInfo`,
//! narrowed by the usual filters and ordered by the active sort.

use evd_core::{EvidenceItem, EvidenceStatus};
use serde::{Deserialize, Serialize};

use crate::filter::EvidenceFilter;
use crate::sort::{sort_items, SortState};

/// Pending records matching `filter`, sorted by `sort`.
pub fn review_queue<'a>(
    items: &'a [EvidenceItem],
    filter: &EvidenceFilter,
    sort: SortState,
) -> Vec<&'a EvidenceItem> {
    let mut queue: Vec<&EvidenceItem> = filter
        .apply(items)
        .into_iter()
        .filter(|item| item.status.is_pending_review())
        .collect();
    sort_items(&mut queue, sort);
    queue
}

/// Per-status counts shown above the queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueSummary {
    pub submitted: usize,
    pub in_review: usize,
    pub need_more_info: usize,
    pub unassigned: usize,
    pub total: usize,
}

impl QueueSummary {
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a EvidenceItem>) -> Self {
        let mut summary = Self::default();
        for item in items {
            match item.status {
                EvidenceStatus::Submitted => summary.submitted += 1,
                EvidenceStatus::InReview => summary.in_review += 1,
                EvidenceStatus::NeedMoreInfo => summary.need_more_info += 1,
                _ => continue,
            }
            if item.review.assigned_reviewer.is_none() {
                summary.unassigned += 1;
            }
            summary.total += 1;
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::{SortDirection, SortKey};
    use evd_core::{EvidenceId, EvidenceType, FileMetadata, Scope, Timestamp};

    fn item(seq: u64, status: EvidenceStatus) -> EvidenceItem {
        let mut item = EvidenceItem::new(
            EvidenceId::generate(2026, seq),
            EvidenceType::Video,
            FileMetadata {
                name: format!("clip-{seq}.mp4"),
                mime_type: "video/mp4".to_string(),
                size_bytes: 1,
            },
            Scope::province("Hà Nội"),
            "officer",
            Timestamp::from_epoch_secs(1_767_225_600 + seq as i64).unwrap(),
        );
        item.status = status;
        item
    }

    fn all_statuses() -> Vec<EvidenceItem> {
        EvidenceStatus::ALL
            .iter()
            .enumerate()
            .map(|(i, s)| item(i as u64 + 1, *s))
            .collect()
    }

    #[test]
    fn only_pending_statuses_queue() {
        let items = all_statuses();
        let queue = review_queue(&items, &EvidenceFilter::default(), SortState::default());
        assert_eq!(queue.len(), 3);
        assert!(queue.iter().all(|i| i.status.is_pending_review()));
    }

    #[test]
    fn queue_respects_filter_and_sort() {
        let items = all_statuses();
        let filter = EvidenceFilter::default().with_status(EvidenceStatus::InReview);
        let queue = review_queue(&items, &filter, SortState::default());
        assert_eq!(queue.len(), 1);

        let asc = review_queue(
            &items,
            &EvidenceFilter::default(),
            SortState::new(SortKey::UploadedAt, SortDirection::Asc),
        );
        let statuses: Vec<_> = asc.iter().map(|i| i.status).collect();
        assert_eq!(
            statuses,
            [
                EvidenceStatus::Submitted,
                EvidenceStatus::InReview,
                EvidenceStatus::NeedMoreInfo
            ]
        );
    }

    #[test]
    fn summary_counts_pending_only() {
        let mut items = all_statuses();
        items[1].review.assigned_reviewer = Some("Lê Văn C".to_string());
        let summary = QueueSummary::from_items(&items);
        assert_eq!(
            summary,
            QueueSummary {
                submitted: 1,
                in_review: 1,
                need_more_info: 1,
                unassigned: 2,
                total: 3,
            }
        );
    }
}
